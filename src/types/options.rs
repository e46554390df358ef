//! Options and response types for provider completion calls.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options applied to every provider completion attempt.
///
/// The model identifier is not part of the options: it comes from the
/// governor's candidate chain, so one set of options serves every
/// candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum number of tokens to generate.
    pub max_tokens: usize,

    /// Sampling temperature.
    pub temperature: f32,

    /// Per-request timeout. A timed-out attempt advances the fallback
    /// chain; it is never retried against the same candidate.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}

impl CompletionOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Raw result of a provider completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The model's text payload, expected to be a JSON document.
    pub text: String,
    /// Total tokens the provider reported for the call (0 when the
    /// provider reports no usage).
    pub tokens_used: u64,
}
