//! Caching subsystem.
//!
//! One cache: [`response::ResponseCache`], the LRU + TTL store the request
//! governor consults before touching the rate limiter or any provider.
//! See the [`response`] module docs for the eviction and expiry contract.

pub mod response;

pub use response::{CacheConfig, CacheStats, ResponseCache};
