pub mod domain;
pub mod ports;
pub mod prompt;
pub mod response;

pub use domain::{
    CardCategory, CardDifficulty, ContentKind, Dialect, Difficulty, EstimatedTime,
    FlashcardRecord, GenerationRequest, GenerationSource, LearnerProfile, LearningModule,
    TranscriptSegment, Transcription,
};
pub use ports::{
    CompletionService, GenerationError, GenerationResult, SchemaViolation, TranscriptionService,
};
pub use prompt::{ProviderProfile, RenderedPrompt};
pub use response::Interpretation;
