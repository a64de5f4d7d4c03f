//! crates/swipelearn_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These are per-request value records; nothing here has identity or
//! outlives the request that created it.

use serde::{Deserialize, Serialize};

use crate::ports::GenerationError;

/// The two kinds of AI-generated study content the application produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Flashcards,
    LearningPath,
}

/// The instruction dialect a prompt is rendered in.
///
/// Selection is always an explicit input; it is never inferred from the
/// request payload or the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Mixed Vietnamese/English guidance for Vietnamese learners of English.
    BilingualViEn,
    EnglishOnly,
}

impl std::str::FromStr for Dialect {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bilingual" | "bilingual-vi-en" => Ok(Dialect::BilingualViEn),
            "english" | "en-only" => Ok(Dialect::EnglishOnly),
            other => Err(GenerationError::InvalidInput(format!(
                "'{}' is not a known prompt dialect",
                other
            ))),
        }
    }
}

/// Requested difficulty for generated content and learner levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(GenerationError::InvalidInput(format!(
                "'{}' is not a valid difficulty",
                other
            ))),
        }
    }
}

/// The learner profile a personalized learning path is generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerProfile {
    pub user_id: String,
    pub current_level: Difficulty,
    pub interests: Vec<String>,
    pub learning_goals: Vec<String>,
    /// Minutes the learner can spend per day.
    pub time_available_minutes: u32,
    pub preferred_difficulty: Difficulty,
}

/// The material a generation request works from.
///
/// The variant fixes the [`ContentKind`], so a transcript can never be paired
/// with a learning-path request or vice versa.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationSource {
    /// A video transcript, used to generate flashcards.
    Transcript(String),
    /// A learner profile, used to generate a 7-day learning path.
    Learner(LearnerProfile),
}

/// Everything the prompt builder needs to render one provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub source: GenerationSource,
    pub difficulty: Difficulty,
    /// Optional focus area; rendered into the prompt only when non-empty.
    pub topic: Option<String>,
    /// Optional free-text instructions; rendered only when non-empty.
    pub custom_instructions: Option<String>,
    pub dialect: Dialect,
}

impl GenerationRequest {
    pub fn kind(&self) -> ContentKind {
        match self.source {
            GenerationSource::Transcript(_) => ContentKind::Flashcards,
            GenerationSource::Learner(_) => ContentKind::LearningPath,
        }
    }
}

//=========================================================================================
// Generated Records (the wire shapes the provider is asked to produce)
//=========================================================================================

/// Difficulty of a single flashcard, as the provider reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardCategory {
    Vocabulary,
    Grammar,
    Pronunciation,
    Idioms,
}

/// One generated flashcard. Never mutated after creation; answered/correct
/// state lives in the consuming UI, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub question: String,
    pub answer: String,
    pub difficulty: CardDifficulty,
    pub category: CardCategory,
}

/// Skill dimension a learning module concentrates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    Vocabulary,
    Pronunciation,
    Grammar,
    Usage,
}

/// Providers answer `estimatedTime` as either a bare number of minutes or a
/// free-form string; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EstimatedTime {
    Minutes(u32),
    Text(String),
}

/// One day of a generated 7-day learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningModule {
    pub day: u8,
    pub title: String,
    pub description: String,
    pub topics: Vec<String>,
    pub difficulty: Difficulty,
    pub estimated_time: EstimatedTime,
    pub focus_areas: Vec<FocusArea>,
    pub key_skills: Vec<String>,
}

//=========================================================================================
// Transcription
//=========================================================================================

/// A timed slice of a transcription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

/// The result of transcribing an uploaded audio file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcription {
    pub transcript: String,
    pub segments: Vec<TranscriptSegment>,
    pub duration: f32,
    pub language: String,
}
