//! Builder for configuring engine instances

use std::sync::Arc;

use crate::cache::{CacheConfig, ResponseCache};
use crate::config::SimulatorConfig;
use crate::governor::{Candidate, RequestGovernor};
use crate::limiter::RateLimiter;
use crate::providers::{CompletionProvider, OpenRouterClient};
use crate::Result;

use super::SimulationEngine;

#[cfg(feature = "storage")]
use std::path::PathBuf;

/// Main entry point for creating engine instances.
pub struct Verdandi;

impl Verdandi {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> VerdandiBuilder {
        VerdandiBuilder::new()
    }
}

#[cfg(feature = "storage")]
enum StoreTarget {
    Path(PathBuf),
    InMemory,
}

/// Builder for configuring engine instances.
///
/// Building with neither an API key nor explicit candidates is legal: the
/// engine then has an empty fallback chain and every branch comes from the
/// procedural generator.
pub struct VerdandiBuilder {
    config: SimulatorConfig,
    api_key: Option<String>,
    candidates: Vec<Candidate>,
    rate_limit: Option<(u32, f64)>,
    cache: Option<CacheConfig>,
    #[cfg(feature = "storage")]
    store: Option<StoreTarget>,
}

impl VerdandiBuilder {
    pub fn new() -> Self {
        Self {
            config: SimulatorConfig::default(),
            api_key: None,
            candidates: Vec::new(),
            rate_limit: None,
            cache: None,
            #[cfg(feature = "storage")]
            store: None,
        }
    }

    /// Use a loaded configuration instead of the defaults.
    pub fn config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure the OpenRouter provider. The configured model chain is
    /// built against this key unless explicit candidates are supplied.
    pub fn openrouter(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Add an explicit fallback-chain candidate.
    ///
    /// When any candidates are supplied they replace the configured model
    /// chain entirely — useful for custom providers and tests.
    pub fn candidate(
        mut self,
        model: impl Into<String>,
        cost_per_1k: f64,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        self.candidates
            .push(Candidate::new(model, cost_per_1k, provider));
        self
    }

    /// Override the configured token bucket.
    pub fn rate_limit(mut self, capacity: u32, refill_rate: f64) -> Self {
        self.rate_limit = Some((capacity, refill_rate));
        self
    }

    /// Override the configured response cache.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = Some(config);
        self
    }

    /// Persist simulations to a sqlite file at `path`.
    #[cfg(feature = "storage")]
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = Some(StoreTarget::Path(path.into()));
        self
    }

    /// Persist simulations to an in-memory sqlite store (tests, ephemeral
    /// runs).
    #[cfg(feature = "storage")]
    pub fn in_memory_store(mut self) -> Self {
        self.store = Some(StoreTarget::InMemory);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<SimulationEngine> {
        let config = self.config;

        // Explicit candidates win; otherwise the configured chain is built
        // against the OpenRouter key, if any.
        let mut candidates = self.candidates;
        if candidates.is_empty() {
            if let Some(ref key) = self.api_key {
                let client = Arc::new(OpenRouterClient::with_base_url(
                    key.clone(),
                    config.llm.base_url.clone(),
                ));
                for model in &config.llm.models {
                    candidates.push(Candidate::new(
                        model.clone(),
                        config.cost_per_1k(model),
                        client.clone(),
                    ));
                }
            }
        }

        let (capacity, refill_rate) = self
            .rate_limit
            .unwrap_or((config.rate_limit.capacity, config.rate_limit.refill_rate));
        let limiter = RateLimiter::new(capacity, refill_rate);

        let cache_config = self.cache.unwrap_or_else(|| {
            CacheConfig::new()
                .max_entries(config.cache.max_entries)
                .ttl(config.cache.ttl())
        });
        let cache = ResponseCache::new(&cache_config);

        let governor =
            RequestGovernor::new(candidates, config.completion_options(), limiter, cache);

        #[cfg(feature = "storage")]
        let store = match self.store {
            Some(StoreTarget::Path(path)) => Some(crate::store::SimulationStore::open(path)?),
            Some(StoreTarget::InMemory) => Some(crate::store::SimulationStore::open_in_memory()?),
            None => None,
        };

        #[cfg(feature = "storage")]
        let engine = SimulationEngine::new(governor, config.security, store);
        #[cfg(not(feature = "storage"))]
        let engine = SimulationEngine::new(governor, config.security);

        Ok(engine)
    }
}

impl Default for VerdandiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
