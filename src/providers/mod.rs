//! Provider integrations.
//!
//! A provider is anything that can turn a prompt into a completion. The
//! [`traits::CompletionProvider`] seam keeps the governor decoupled from
//! any one backend: the fallback chain holds `(model, provider)` pairs and
//! tries them in order.
//!
//! [`OpenRouterClient`] is the bundled implementation, speaking the
//! OpenAI-compatible chat-completions protocol that OpenRouter fronts for
//! many upstream models.

pub mod openrouter;
pub mod traits;

pub use openrouter::OpenRouterClient;
pub use traits::CompletionProvider;
