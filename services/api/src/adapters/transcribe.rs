//! services/api/src/adapters/transcribe.rs
//!
//! This module contains the adapter for OpenAI's Speech-to-Text (Whisper) service.
//! It implements the `TranscriptionService` port from the `core` crate.
//! Perplexity has no audio endpoint, so this adapter only exists when an
//! OpenAI key is configured.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::audio::{AudioInput, AudioResponseFormat, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use swipelearn_core::{
    domain::{TranscriptSegment, Transcription},
    ports::{GenerationError, GenerationResult, TranscriptionService},
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TranscriptionService` port using the OpenAI Whisper API.
#[derive(Clone)]
pub struct WhisperTranscriptionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl WhisperTranscriptionAdapter {
    /// Creates a new `WhisperTranscriptionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `TranscriptionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranscriptionService for WhisperTranscriptionAdapter {
    /// Transcribes an uploaded audio file using the configured Whisper model.
    /// The verbose response carries per-segment timings alongside the text.
    async fn transcribe(&self, file_name: &str, audio: &[u8]) -> GenerationResult<Transcription> {
        let input = AudioInput::from_vec_u8(file_name.to_string(), audio.to_vec());

        let request = CreateTranscriptionRequest {
            file: input,
            model: self.model.clone(),
            language: Some("en".to_string()),
            response_format: Some(AudioResponseFormat::VerboseJson),
            temperature: Some(0.2),
            ..Default::default()
        };

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .audio()
            .transcription()
            .create_verbose_json(request)
            .await
            .map_err(|e: OpenAIError| GenerationError::ProviderUnavailable(e.to_string()))?;

        let segments = response
            .segments
            .unwrap_or_default()
            .into_iter()
            .map(|segment| TranscriptSegment {
                start: segment.start,
                end: segment.end,
                text: segment.text.trim().to_string(),
            })
            .collect();

        Ok(Transcription {
            transcript: response.text,
            segments,
            duration: response.duration,
            language: response.language,
        })
    }
}
