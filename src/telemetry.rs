//! Telemetry metric name constants.
//!
//! Centralised metric names for verdandi operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `verdandi_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model` — candidate model identifier (e.g. "openai/gpt-4o")
//! - `status` — outcome: "ok" or "error"

/// Total provider attempts dispatched through the governor.
///
/// Labels: `model`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "verdandi_requests_total";

/// Provider attempt duration in seconds.
///
/// Labels: `model`.
pub const REQUEST_DURATION_SECONDS: &str = "verdandi_request_duration_seconds";

/// Total tokens consumed across successful provider calls.
///
/// Labels: `model`.
pub const TOKENS_TOTAL: &str = "verdandi_tokens_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "verdandi_cache_hits_total";

/// Total response cache misses.
pub const CACHE_MISSES_TOTAL: &str = "verdandi_cache_misses_total";

/// Total response cache evictions (capacity pressure, not TTL expiry).
pub const CACHE_EVICTIONS_TOTAL: &str = "verdandi_cache_evictions_total";

/// Total requests denied by the token bucket.
pub const RATE_LIMIT_DENIED_TOTAL: &str = "verdandi_rate_limit_denied_total";
