//! Request governor: the composition point around every outbound call.
//!
//! For each generation request the governor consults the
//! [`ResponseCache`], then the [`RateLimiter`], then walks an ordered
//! fallback chain of model candidates, recording every outcome in the
//! [`CallMonitor`] and populating the cache on success:
//!
//! ```text
//! request(prompt, namespace)
//!     │
//!     ▼
//! ┌──────────────┐  hit   ┌─────────────────────────────┐
//! │ ResponseCache │ ─────► │ record "cache" call, return │
//! └──────┬───────┘        └─────────────────────────────┘
//!        │ miss
//!        ▼
//! ┌──────────────┐ denied ┌─────────────────────────────┐
//! │ RateLimiter   │ ─────► │ Err(RateLimitExceeded)      │
//! └──────┬───────┘        └─────────────────────────────┘
//!        │ admitted
//!        ▼
//! ┌──────────────────────────┐  all failed  ┌───────────┐
//! │ candidate 1 → 2 → … → n  │ ───────────► │ Ok(None)  │
//! └──────────┬───────────────┘              └───────────┘
//!            │ first success
//!            ▼
//!   record call, cache value, Ok(Some(value))
//! ```
//!
//! The three leaf components each guard their own state; the governor
//! never locks them together. Concurrent misses for the same key are not
//! de-duplicated — both proceed and the last writer wins, which is
//! harmless for idempotent narrative payloads.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::cache::ResponseCache;
use crate::limiter::{Admission, RateLimiter};
use crate::monitor::CallMonitor;
use crate::providers::CompletionProvider;
use crate::telemetry;
use crate::types::CompletionOptions;
use crate::{Result, VerdandiError};

/// One entry in the ordered fallback chain: a model identity, its cost
/// rate, and the provider that serves it.
#[derive(Clone)]
pub struct Candidate {
    model: String,
    cost_per_1k: f64,
    provider: Arc<dyn CompletionProvider>,
}

impl Candidate {
    /// Create a candidate. `cost_per_1k` is USD per 1000 tokens and feeds
    /// the monitor's cost estimates.
    pub fn new(
        model: impl Into<String>,
        cost_per_1k: f64,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            model: model.into(),
            cost_per_1k,
            provider,
        }
    }

    /// Model identity this candidate is accounted under.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("model", &self.model)
            .field("cost_per_1k", &self.cost_per_1k)
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// Governs every outbound request with caching, admission control, and
/// provider fallback.
///
/// `V` is the parsed payload type; a provider response that is not valid
/// JSON for `V` counts as a failed attempt. Constructed once at startup
/// and shared by handle — there is no global instance.
pub struct RequestGovernor<V> {
    cache: ResponseCache<V>,
    limiter: RateLimiter,
    monitor: CallMonitor,
    candidates: Vec<Candidate>,
    options: CompletionOptions,
}

impl<V> RequestGovernor<V>
where
    V: Clone + DeserializeOwned + Send + Sync,
{
    /// Compose a governor from its parts.
    ///
    /// An empty candidate chain is legal: every request then resolves to
    /// `Ok(None)` (after cache and limiter checks) and the caller's local
    /// fallback carries the feature.
    pub fn new(
        candidates: Vec<Candidate>,
        options: CompletionOptions,
        limiter: RateLimiter,
        cache: ResponseCache<V>,
    ) -> Self {
        Self {
            cache,
            limiter,
            monitor: CallMonitor::new(),
            candidates,
            options,
        }
    }

    /// Run one governed request.
    ///
    /// - Cache hit: recorded as a zero-cost `"cache"` call; no rate-limit
    ///   check, no provider call.
    /// - Rate-limit denial: `Err(RateLimitExceeded { wait })`; no provider
    ///   is contacted and nothing is cached.
    /// - Chain walk: each failing candidate (network error, bad status,
    ///   non-JSON or mis-shaped payload) is recorded as an error and
    ///   skipped; the first success is recorded, cached, and returned.
    /// - `Ok(None)` when every candidate failed — the caller must fall
    ///   back to local generation.
    #[instrument(skip(self, prompt))]
    pub async fn request(&self, prompt: &str, namespace: &str) -> Result<Option<V>> {
        if let Some(value) = self.cache.get(prompt, namespace) {
            self.monitor.record_cache_hit();
            debug!("serving cached response");
            return Ok(Some(value));
        }

        if let Admission::Denied { wait } = self.limiter.can_make_request() {
            debug!(wait_secs = wait.as_secs_f64(), "request denied by rate limiter");
            return Err(VerdandiError::RateLimitExceeded { wait });
        }

        for candidate in &self.candidates {
            let start = Instant::now();
            match self.attempt(candidate, prompt).await {
                Ok((value, tokens)) => {
                    Self::record_request(&candidate.model, start, true);
                    let cost = tokens as f64 / 1000.0 * candidate.cost_per_1k;
                    self.monitor.record_call(&candidate.model, tokens, cost);
                    metrics::counter!(telemetry::TOKENS_TOTAL,
                        "model" => candidate.model.clone(),
                    )
                    .increment(tokens);
                    self.cache.set(prompt, namespace, value.clone());
                    return Ok(Some(value));
                }
                Err(e) => {
                    Self::record_request(&candidate.model, start, false);
                    self.monitor.record_error(&candidate.model);
                    warn!(
                        model = %candidate.model,
                        error = %e,
                        "candidate failed, advancing fallback chain"
                    );
                }
            }
        }

        Ok(None)
    }

    /// One candidate attempt: provider call plus payload parse.
    async fn attempt(&self, candidate: &Candidate, prompt: &str) -> Result<(V, u64)> {
        let completion = candidate
            .provider
            .complete(&candidate.model, prompt, &self.options)
            .await?;
        let value = serde_json::from_str(&completion.text)?;
        Ok((value, completion.tokens_used))
    }

    /// Record attempt outcome metrics (counter + histogram).
    fn record_request(model: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "model" => model.to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "model" => model.to_owned(),
        )
        .record(start.elapsed().as_secs_f64());
    }

    /// The response cache, for stats or manual invalidation.
    pub fn cache(&self) -> &ResponseCache<V> {
        &self.cache
    }

    /// The rate limiter, for status reporting.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// The call-accounting monitor.
    pub fn monitor(&self) -> &CallMonitor {
        &self.monitor
    }

    /// Model identities in fallback order.
    pub fn model_chain(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.model.as_str()).collect()
    }

    /// Completion options applied to every attempt.
    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }
}
