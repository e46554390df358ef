//! Verdandi - life-path simulation engine with governed LLM access
//!
//! This crate generates narrative "alternate life path" branches for a
//! user-supplied decision. Every outbound LLM request runs through a
//! request governor — response cache, token-bucket rate limiter, and
//! call-accounting monitor — with an ordered model fallback chain behind
//! it, and degrades to deterministic procedural generation whenever the
//! call is refused or fails.
//!
//! # Example
//!
//! ```rust,no_run
//! use verdandi::{Mode, Verdandi};
//!
//! #[tokio::main]
//! async fn main() -> verdandi::Result<()> {
//!     let engine = Verdandi::builder()
//!         .openrouter("sk-or-your-key")
//!         .build()?;
//!
//!     let result = engine
//!         .simulate("What if I moved to Lisbon?", Mode::Realistic, 4)
//!         .await?;
//!
//!     for branch in &result.branches {
//!         println!("{}: {}", branch.title, branch.story);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Zero-provider operation
//!
//! Building without an API key is supported; the engine then serves every
//! branch from the procedural generator, so the feature stays available
//! (and fully deterministic) with no providers configured.

pub mod cache;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod governor;
pub mod limiter;
pub mod monitor;
pub mod prompt;
pub mod providers;
pub mod sanitize;
#[cfg(feature = "storage")]
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheStats, ResponseCache};
pub use config::SimulatorConfig;
pub use engine::{SimulationEngine, Verdandi, VerdandiBuilder};
pub use error::{Result, VerdandiError};
pub use governor::{Candidate, RequestGovernor};
pub use limiter::{Admission, LimiterStatus, RateLimiter};
pub use monitor::{CACHE_IDENTITY, CallMonitor, IdentityStats, UsageStats};
pub use providers::{CompletionProvider, OpenRouterClient};

// Re-export storage when the feature is enabled
#[cfg(feature = "storage")]
pub use store::SimulationStore;

// Re-export all types
pub use types::{
    BranchPayload, Completion, CompletionOptions, LifeBranch, Mode, SimulationResult,
    TimelineEvent,
};
