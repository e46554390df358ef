//! Call accounting ledger, partitioned by provider/model identity.
//!
//! [`CallMonitor`] keeps monotonically non-decreasing counters of calls,
//! tokens, estimated cost, and errors per identity for the process
//! lifetime. Cache hits are recorded against the synthetic
//! [`CACHE_IDENTITY`] at zero cost so the stats panel can show how much
//! traffic never reached a provider.
//!
//! Recording is best-effort bookkeeping and never fails.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Ledger identity for responses served from the cache.
pub const CACHE_IDENTITY: &str = "cache";

/// Counters for a single identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityStats {
    /// Calls recorded (successes and errors alike).
    pub calls: u64,
    /// Tokens consumed.
    pub tokens: u64,
    /// Estimated cost in USD.
    pub cost: f64,
    /// Calls that ended in an error.
    pub errors: u64,
}

/// Aggregated usage across all identities ever recorded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageStats {
    pub total_calls: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub by_identity: HashMap<String, IdentityStats>,
}

/// Accounting ledger of attempted, succeeded, and failed calls.
///
/// Ledger entries are created lazily on first record for an identity and
/// never removed. All increments for one record happen under a single
/// mutex, so concurrent recorders for the same identity cannot lose
/// updates.
#[derive(Default)]
pub struct CallMonitor {
    ledger: Mutex<HashMap<String, IdentityStats>>,
}

impl CallMonitor {
    /// Create an empty monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed call with its token and cost totals.
    pub fn record_call(&self, identity: &str, tokens: u64, cost: f64) {
        let mut ledger = self.lock();
        let entry = ledger.entry(identity.to_string()).or_default();
        entry.calls += 1;
        entry.tokens += tokens;
        entry.cost += cost;
    }

    /// Record a failed call. Counts as a call and as an error.
    pub fn record_error(&self, identity: &str) {
        let mut ledger = self.lock();
        let entry = ledger.entry(identity.to_string()).or_default();
        entry.calls += 1;
        entry.errors += 1;
    }

    /// Record a response served from the cache (zero tokens, zero cost).
    pub fn record_cache_hit(&self) {
        self.record_call(CACHE_IDENTITY, 0, 0.0);
    }

    /// Aggregate usage across all identities.
    pub fn stats(&self) -> UsageStats {
        let ledger = self.lock();
        let mut stats = UsageStats::default();
        for (identity, entry) in ledger.iter() {
            stats.total_calls += entry.calls;
            stats.total_tokens += entry.tokens;
            stats.total_cost += entry.cost;
            stats.by_identity.insert(identity.clone(), entry.clone());
        }
        stats
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, IdentityStats>> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CallMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallMonitor")
            .field("identities", &self.lock().len())
            .finish()
    }
}
