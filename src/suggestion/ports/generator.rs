//! Text generator port.

use async_trait::async_trait;
use thiserror::Error;

/// Result type for generator calls.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// External text generation contract.
///
/// The generator is an opaque, occasionally malformed, occasionally slow
/// text function. No retries happen behind this port; a failed call
/// surfaces to the caller, who may retry the whole operation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the identifier recorded with generated suggestions.
    fn model_id(&self) -> &str;

    /// Sends a prompt and returns the raw textual reply.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] on transport failure, a non-success
    /// response, or timeout.
    async fn complete(&self, prompt: &str) -> GeneratorResult<String>;
}

/// Errors returned by text generator implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// The request never completed.
    #[error("generator transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("generator returned status {code}: {body}")]
    Status {
        /// HTTP-like status code.
        code: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The request exceeded the configured time budget.
    #[error("generator call timed out")]
    Timeout,
}
