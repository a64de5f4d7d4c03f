//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swipelearn_core::{
    domain::{
        Difficulty, EstimatedTime, FlashcardRecord, FocusArea, GenerationRequest,
        GenerationSource, LearnerProfile, LearningModule, TranscriptSegment,
    },
    ports::GenerationError,
    prompt, response,
};
use tracing::{error, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_flashcards_handler,
        generate_learning_path_handler,
        get_learning_path_handler,
        test_api_key_handler,
        transcribe_handler,
    ),
    components(
        schemas(
            FlashcardsRequest,
            FlashcardsResponse,
            FlashcardsMetadata,
            LearningPathRequest,
            LearningPathResponse,
            LearningPathMetadata,
            KeyTestRequest,
            KeyTestResponse,
            TranscriptionResponse,
            ErrorBody
        )
    ),
    tags(
        (name = "SwipeLearn AI API", description = "AI content-generation endpoints for the vocabulary learning app.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// User-Facing Messages
//=========================================================================================

const MSG_TRANSCRIPT_REQUIRED: &str = "Transcript is required | Cần có transcript";
const MSG_FLASHCARDS_FAILED: &str = "Failed to generate flashcards | Không thể tạo flashcard";
const MSG_USER_ID_REQUIRED: &str = "User ID is required | Cần có User ID";
const MSG_PATH_FAILED: &str = "Failed to generate learning path | Không thể tạo lộ trình học";
const MSG_AUDIO_REQUIRED: &str = "Audio file is required | Cần có file âm thanh";
const MSG_AUDIO_TOO_LARGE: &str =
    "File too large. Maximum size is 25MB. | File quá lớn. Kích thước tối đa là 25MB.";
const MSG_TRANSCRIBE_UNAVAILABLE: &str = "Audio transcription not available with the configured provider. Please configure an OpenAI API key for Whisper. | Chuyển đổi âm thanh không khả dụng với nhà cung cấp được cấu hình. Vui lòng cấu hình OpenAI API key cho Whisper.";
const MSG_TRANSCRIBE_FAILED: &str = "Failed to transcribe audio | Không thể chuyển đổi âm thanh";

/// The hard upload cap for the transcription endpoint.
const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

//=========================================================================================
// API Request and Response Payload Structs
//=========================================================================================

/// JSON error body shared by every failure response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardsRequest {
    pub video_url: Option<String>,
    pub transcript: Option<String>,
    /// One of `beginner`, `intermediate` (default), `advanced`.
    pub difficulty: Option<String>,
    pub topic: Option<String>,
    pub custom_prompt: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct FlashcardsResponse {
    #[schema(value_type = Vec<Object>)]
    pub flashcards: Vec<FlashcardRecord>,
    pub metadata: FlashcardsMetadata,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardsMetadata {
    pub video_url: Option<String>,
    #[schema(value_type = String)]
    pub difficulty: Difficulty,
    pub topic: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub word_count: usize,
    pub provider: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathRequest {
    pub user_id: Option<String>,
    /// One of `beginner`, `intermediate` (default), `advanced`.
    pub current_level: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    /// Minutes per day; defaults to 30.
    pub time_available: Option<u32>,
    pub preferred_difficulty: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathResponse {
    pub path_id: String,
    pub user_id: String,
    #[schema(value_type = Vec<Object>)]
    pub learning_path: Vec<LearningModule>,
    pub metadata: LearningPathMetadata,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathMetadata {
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub current_level: Difficulty,
    pub interests: Vec<String>,
    pub learning_goals: Vec<String>,
    pub time_available: u32,
    #[schema(value_type = String)]
    pub preferred_difficulty: Difficulty,
    pub provider: String,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LearningPathQuery {
    pub user_id: Option<String>,
    pub path_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyTestRequest {
    pub api_key: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct KeyTestResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct TranscriptionResponse {
    pub transcript: String,
    #[schema(value_type = Vec<Object>)]
    pub segments: Vec<TranscriptSegment>,
    pub duration: f32,
    pub language: String,
}

//=========================================================================================
// Router
//=========================================================================================

/// Builds the API router. Shared by the server binary and the handler tests.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/flashcards", post(generate_flashcards_handler))
        .route(
            "/api/learning-path",
            post(generate_learning_path_handler).get(get_learning_path_handler),
        )
        .route("/api/test-key", post(test_api_key_handler))
        .route("/api/transcribe", post(transcribe_handler))
        .with_state(state)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate flashcards from a video transcript.
#[utoipa::path(
    post,
    path = "/api/flashcards",
    request_body = FlashcardsRequest,
    responses(
        (status = 200, description = "Flashcards generated successfully", body = FlashcardsResponse),
        (status = 400, description = "Missing or empty transcript", body = ErrorBody),
        (status = 500, description = "Provider error or malformed response", body = ErrorBody)
    )
)]
pub async fn generate_flashcards_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FlashcardsRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let difficulty = parse_difficulty(payload.difficulty.as_deref())?;
    let transcript = payload.transcript.unwrap_or_default();

    let request = GenerationRequest {
        source: GenerationSource::Transcript(transcript.clone()),
        difficulty,
        topic: payload.topic.clone(),
        custom_instructions: payload.custom_prompt,
        dialect: state.config.prompt_dialect,
    };

    let prompt = prompt::render(&request, &state.profile)
        .map_err(|e| generation_failure(e, MSG_TRANSCRIPT_REQUIRED, MSG_FLASHCARDS_FAILED))?;

    let raw = state
        .completion
        .complete(&prompt)
        .await
        .map_err(|e| generation_failure(e, MSG_TRANSCRIPT_REQUIRED, MSG_FLASHCARDS_FAILED))?;

    let interpretation = response::interpret_flashcards(&raw)
        .map_err(|e| generation_failure(e, MSG_TRANSCRIPT_REQUIRED, MSG_FLASHCARDS_FAILED))?;
    log_dropped("flashcard", &interpretation.dropped);

    let word_count = transcript.split_whitespace().count();
    Ok(Json(FlashcardsResponse {
        flashcards: interpretation.records,
        metadata: FlashcardsMetadata {
            video_url: payload.video_url,
            difficulty,
            topic: payload.topic,
            generated_at: Utc::now(),
            word_count,
            provider: state.config.provider_name.clone(),
        },
    }))
}

/// Generate a personalized 7-day learning path for a user.
#[utoipa::path(
    post,
    path = "/api/learning-path",
    request_body = LearningPathRequest,
    responses(
        (status = 200, description = "Learning path generated successfully", body = LearningPathResponse),
        (status = 400, description = "Missing user ID", body = ErrorBody),
        (status = 500, description = "Provider error or malformed response", body = ErrorBody)
    )
)]
pub async fn generate_learning_path_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LearningPathRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let current_level = parse_difficulty(payload.current_level.as_deref())?;
    let preferred_difficulty = parse_difficulty(payload.preferred_difficulty.as_deref())?;
    let user_id = payload.user_id.unwrap_or_default();
    let time_available = payload.time_available.unwrap_or(30);

    let learner = LearnerProfile {
        user_id: user_id.clone(),
        current_level,
        interests: payload.interests.clone(),
        learning_goals: payload.learning_goals.clone(),
        time_available_minutes: time_available,
        preferred_difficulty,
    };
    let request = GenerationRequest {
        source: GenerationSource::Learner(learner),
        difficulty: preferred_difficulty,
        topic: None,
        custom_instructions: None,
        dialect: state.config.prompt_dialect,
    };

    let prompt = prompt::render(&request, &state.profile)
        .map_err(|e| generation_failure(e, MSG_USER_ID_REQUIRED, MSG_PATH_FAILED))?;

    let raw = state
        .completion
        .complete(&prompt)
        .await
        .map_err(|e| generation_failure(e, MSG_USER_ID_REQUIRED, MSG_PATH_FAILED))?;

    let interpretation = response::interpret_learning_path(&raw)
        .map_err(|e| generation_failure(e, MSG_USER_ID_REQUIRED, MSG_PATH_FAILED))?;
    log_dropped("learning module", &interpretation.dropped);

    let path_id = format!("path_{}_{}", user_id, Utc::now().timestamp_millis());
    Ok(Json(LearningPathResponse {
        path_id,
        user_id,
        learning_path: interpretation.records,
        metadata: LearningPathMetadata {
            created_at: Utc::now(),
            current_level,
            interests: payload.interests,
            learning_goals: payload.learning_goals,
            time_available,
            preferred_difficulty,
            provider: state.config.provider_name.clone(),
        },
    }))
}

/// Fetch a previously generated learning path.
///
/// The application keeps no server-side storage, so this returns a
/// representative demo path for the requested user.
#[utoipa::path(
    get,
    path = "/api/learning-path",
    params(LearningPathQuery),
    responses(
        (status = 200, description = "Learning path for the user", body = LearningPathResponse),
        (status = 400, description = "Missing user ID", body = ErrorBody)
    )
)]
pub async fn get_learning_path_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LearningPathQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let user_id = match query.user_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: MSG_USER_ID_REQUIRED.to_string(),
                }),
            ))
        }
    };

    let path_id = query
        .path_id
        .unwrap_or_else(|| format!("path_{}_demo", user_id));

    Ok(Json(LearningPathResponse {
        path_id,
        user_id,
        learning_path: demo_learning_path(),
        metadata: LearningPathMetadata {
            created_at: Utc::now(),
            current_level: Difficulty::Intermediate,
            interests: vec!["business".to_string(), "technology".to_string()],
            learning_goals: vec![
                "professional communication".to_string(),
                "presentation skills".to_string(),
            ],
            time_available: 30,
            preferred_difficulty: Difficulty::Intermediate,
            provider: state.config.provider_name.clone(),
        },
    }))
}

/// Check whether a provider API key is accepted.
#[utoipa::path(
    post,
    path = "/api/test-key",
    request_body = KeyTestRequest,
    responses(
        (status = 200, description = "API key is valid", body = KeyTestResponse),
        (status = 400, description = "API key is missing or invalid", body = KeyTestResponse),
        (status = 500, description = "The probe could not be made", body = KeyTestResponse)
    )
)]
pub async fn test_api_key_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<KeyTestRequest>,
) -> Result<(StatusCode, Json<KeyTestResponse>), (StatusCode, Json<ErrorBody>)> {
    let api_key = match payload.api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => key,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "API key is required".to_string(),
                }),
            ))
        }
    };

    match state.completion.verify_api_key(&api_key).await {
        Ok(true) => Ok((
            StatusCode::OK,
            Json(KeyTestResponse {
                valid: true,
                message: "API key is valid".to_string(),
            }),
        )),
        Ok(false) => Ok((
            StatusCode::BAD_REQUEST,
            Json(KeyTestResponse {
                valid: false,
                message: "Invalid API key".to_string(),
            }),
        )),
        Err(e) => {
            error!("Failed to probe the provider with the supplied key: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(KeyTestResponse {
                    valid: false,
                    message: "Error testing API key".to_string(),
                }),
            ))
        }
    }
}

/// Transcribe an uploaded audio file.
///
/// Accepts a multipart/form-data request with an `audio` file part of at
/// most 25MB. Answers 501 when no transcription-capable provider is
/// configured (the generation provider has no audio endpoint).
#[utoipa::path(
    post,
    path = "/api/transcribe",
    request_body(content_type = "multipart/form-data", description = "The audio file to transcribe, in a part named `audio`."),
    responses(
        (status = 200, description = "Transcription with timed segments", body = TranscriptionResponse),
        (status = 400, description = "Missing or oversized audio file", body = ErrorBody),
        (status = 501, description = "No transcription-capable provider configured", body = ErrorBody),
        (status = 500, description = "Transcription failed", body = ErrorBody)
    )
)]
pub async fn transcribe_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let mut audio: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: format!("Failed to read multipart data: {}", e),
            }),
        )
    })? {
        if field.name() != Some("audio") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("audio.webm").to_string();
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: format!("Failed to read audio bytes: {}", e),
                }),
            )
        })?;
        audio = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, data) = audio.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: MSG_AUDIO_REQUIRED.to_string(),
            }),
        )
    })?;

    if data.len() > MAX_AUDIO_BYTES {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: MSG_AUDIO_TOO_LARGE.to_string(),
            }),
        ));
    }

    let adapter = state.transcription.as_ref().ok_or_else(|| {
        (
            StatusCode::NOT_IMPLEMENTED,
            Json(ErrorBody {
                error: MSG_TRANSCRIBE_UNAVAILABLE.to_string(),
            }),
        )
    })?;

    let transcription = adapter.transcribe(&file_name, &data).await.map_err(|e| {
        error!("Failed to transcribe '{}': {}", file_name, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: MSG_TRANSCRIBE_FAILED.to_string(),
            }),
        )
    })?;

    Ok(Json(TranscriptionResponse {
        transcript: transcription.transcript,
        segments: transcription.segments,
        duration: transcription.duration,
        language: transcription.language,
    }))
}

//=========================================================================================
// Helpers
//=========================================================================================

fn parse_difficulty(value: Option<&str>) -> Result<Difficulty, (StatusCode, Json<ErrorBody>)> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Difficulty::default()),
        Some(s) => s.parse::<Difficulty>().map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
        }),
    }
}

/// Maps a core generation failure onto the route's HTTP contract: invalid
/// input becomes 400 with the route's required-field message, everything
/// else becomes 500 with the route's failure message.
fn generation_failure(
    err: GenerationError,
    invalid_input_msg: &str,
    failure_msg: &str,
) -> (StatusCode, Json<ErrorBody>) {
    match err {
        GenerationError::InvalidInput(reason) => {
            warn!("Rejected generation request: {}", reason);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: invalid_input_msg.to_string(),
                }),
            )
        }
        other => {
            error!("Generation failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: failure_msg.to_string(),
                }),
            )
        }
    }
}

fn log_dropped(kind: &str, dropped: &[swipelearn_core::SchemaViolation]) {
    for violation in dropped {
        warn!(
            "Dropping {} record {} that failed validation: {}",
            kind, violation.index, violation.reason
        );
    }
}

/// The demo path served by GET /api/learning-path in place of real storage.
fn demo_learning_path() -> Vec<LearningModule> {
    vec![LearningModule {
        day: 1,
        title: "Tiếng Anh Thương mại Cơ bản | Business English Fundamentals".to_string(),
        description:
            "Từ vựng và cụm từ thiết yếu cho giao tiếp chuyên nghiệp | Essential vocabulary and phrases for professional communication"
                .to_string(),
        topics: vec![
            "Viết Email | Email Writing".to_string(),
            "Từ vựng Họp | Meeting Vocabulary".to_string(),
            "Chào hỏi Chuyên nghiệp | Professional Greetings".to_string(),
        ],
        difficulty: Difficulty::Intermediate,
        estimated_time: EstimatedTime::Text("30".to_string()),
        focus_areas: vec![FocusArea::Vocabulary, FocusArea::Usage],
        key_skills: vec![
            "giao tiếp trang trọng | formal communication".to_string(),
            "thuật ngữ kinh doanh | business terminology".to_string(),
            "phép lịch sự email | email etiquette".to_string(),
        ],
    }]
}

//=========================================================================================
// Tests
//=========================================================================================
