//! Provider trait for completion backends.
//!
//! Implementations perform one network call per invocation and report
//! failures through [`VerdandiError`](crate::VerdandiError); the governor
//! owns retry-free fallback across candidates, so providers should not
//! retry internally.

use async_trait::async_trait;

use crate::Result;
use crate::types::{Completion, CompletionOptions};

/// A backend capable of producing a text completion for a prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Run one completion against the given model.
    ///
    /// The call carries its own timeout (from `options`); a timeout is an
    /// ordinary error and moves the governor to the next candidate.
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<Completion>;
}
