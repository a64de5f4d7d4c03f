//! crates/swipelearn_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the specific AI providers behind them.

use async_trait::async_trait;

use crate::domain::Transcription;
use crate::prompt::RenderedPrompt;

//=========================================================================================
// Generation Error and Result Types
//=========================================================================================

/// Every way a content-generation request can fail.
///
/// `InvalidInput` and `EmptyResult` are terminal and user-facing. Individual
/// records that fail validation are not an error at all; they are recorded as
/// [`SchemaViolation`] values and the batch continues.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A precondition on the request failed before any rendering occurred.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external provider returned a non-2xx status or the call failed
    /// outright. Never constructed by the core itself, but representable so
    /// adapters and handlers share one error type.
    #[error("Content provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider's completion text was not a JSON array.
    #[error("Provider response is not a JSON array: {0}")]
    MalformedResponse(String),

    /// Every record in the response failed validation.
    #[error("No valid records in provider response")]
    EmptyResult,
}

/// A convenience type alias for `Result<T, GenerationError>`.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// A record that failed field or enum validation and was dropped from the
/// batch. Recorded for observability, never raised as a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Position of the record in the provider's response array.
    pub index: usize,
    pub reason: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}", self.index, self.reason)
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends a rendered prompt to the chat-completion endpoint and returns
    /// the extracted text of the first choice. When the provider omits the
    /// content field the literal string `"[]"` is returned, which the
    /// interpreter turns into an empty batch.
    async fn complete(&self, prompt: &RenderedPrompt) -> GenerationResult<String>;

    /// Probes the provider with a minimal request using the supplied key.
    /// `Ok(false)` means the provider rejected the key; `Err` means the
    /// probe itself could not be made.
    async fn verify_api_key(&self, api_key: &str) -> GenerationResult<bool>;
}

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribes an uploaded audio file into timed text.
    async fn transcribe(&self, file_name: &str, audio: &[u8]) -> GenerationResult<Transcription>;
}
