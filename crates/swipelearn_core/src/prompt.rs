//! crates/swipelearn_core/src/prompt.rs
//!
//! The content request builder: turns a [`GenerationRequest`] into the
//! (system instructions, user message) pair sent to a chat-completion
//! provider. Rendering is pure; identical inputs produce byte-identical
//! prompts.

use crate::domain::{ContentKind, Dialect, GenerationRequest, GenerationSource};
use crate::ports::{GenerationError, GenerationResult};

//=========================================================================================
// Dialect Templates
//=========================================================================================
// One template set per dialect. Adding a dialect means adding a template
// entry here, not new control flow in `render`. Both dialects must describe
// the same JSON field names and enum values.
//=========================================================================================

const FLASHCARD_SYSTEM_EN: &str = r#"You are an expert English language tutor specializing in creating effective flashcards for vocabulary learning.

Your task is to analyze the provided transcript and create engaging flashcards that help students learn English vocabulary, phrases, and concepts.

Guidelines:
- Create 5-8 flashcards per transcript
- Focus on vocabulary, phrases, idioms, and key concepts
- Make questions clear and educational
- Provide comprehensive answers with context and examples
- Adjust difficulty based on the specified level: {difficulty}
- Include pronunciation tips when relevant
- Add usage examples in different contexts

{focus_line}
{extra_line}

Format your response as a JSON array of flashcard objects with the following structure:
{
  "question": "What does [word/phrase] mean?",
  "answer": "Detailed explanation with examples and context",
  "difficulty": "easy|medium|hard",
  "category": "vocabulary|grammar|pronunciation|idioms"
}"#;

const FLASHCARD_USER_EN: &str = "Please create flashcards from this transcript:\n\n{transcript}";

const FLASHCARD_SYSTEM_VI: &str = r#"Bạn là một chuyên gia dạy tiếng Anh chuyên tạo flashcard hiệu quả để học từ vựng.

Nhiệm vụ của bạn là phân tích transcript được cung cấp và tạo ra các flashcard hấp dẫn giúp học sinh học từ vựng, cụm từ và khái niệm tiếng Anh.

Hướng dẫn:
- Tạo 5-8 flashcard cho mỗi transcript
- Tập trung vào từ vựng, cụm từ, thành ngữ và khái niệm chính
- Làm cho câu hỏi rõ ràng và có tính giáo dục
- Cung cấp câu trả lời toàn diện với ngữ cảnh và ví dụ
- Điều chỉnh độ khó dựa trên cấp độ được chỉ định: {difficulty}
- Bao gồm mẹo phát âm khi có liên quan
- Thêm ví dụ sử dụng trong các ngữ cảnh khác nhau
- Sử dụng song ngữ Việt-Anh để giúp người học Việt Nam hiểu rõ hơn

{focus_line}
{extra_line}

Định dạng phản hồi của bạn dưới dạng mảng JSON của các đối tượng flashcard với cấu trúc sau:
{
  "question": "Từ/cụm từ [word/phrase] có nghĩa là gì? | What does [word/phrase] mean?",
  "answer": "Giải thích chi tiết với ví dụ và ngữ cảnh bằng tiếng Việt và tiếng Anh | Detailed explanation with examples and context in Vietnamese and English",
  "difficulty": "easy|medium|hard",
  "category": "vocabulary|grammar|pronunciation|idioms"
}"#;

const FLASHCARD_USER_VI: &str = "Vui lòng tạo flashcard từ transcript này:\n\n{transcript}";

const PATH_SYSTEM_EN: &str = r#"You are an expert English language learning curriculum designer. Create a personalized 7-day learning path for an English learner.

User Profile:
- Current Level: {current_level}
- Interests: {interests}
- Learning Goals: {learning_goals}
- Available Time: {time_available} minutes per day
- Preferred Difficulty: {preferred_difficulty}

Create a 7-day learning path with daily modules. Each day should build upon the previous day's learning. Focus on practical vocabulary and phrases that align with the user's interests and goals.

{focus_line}
{extra_line}

Format your response as a JSON array of 7 learning modules with this structure:
{
  "day": 1,
  "title": "Module Title",
  "description": "Brief description of what will be learned",
  "topics": ["topic1", "topic2", "topic3"],
  "difficulty": "beginner|intermediate|advanced",
  "estimatedTime": "minutes",
  "focusAreas": ["vocabulary", "pronunciation", "grammar", "usage"],
  "keySkills": ["skill1", "skill2", "skill3"]
}"#;

const PATH_USER_EN: &str =
    "Please create a personalized 7-day English learning path based on my profile.";

const PATH_SYSTEM_VI: &str = r#"Bạn là một chuyên gia thiết kế chương trình học tiếng Anh. Tạo lộ trình học 7 ngày được cá nhân hóa cho người học tiếng Anh.

Hồ sơ người dùng:
- Cấp độ hiện tại: {current_level}
- Sở thích: {interests}
- Mục tiêu học tập: {learning_goals}
- Thời gian có sẵn: {time_available} phút mỗi ngày
- Độ khó ưa thích: {preferred_difficulty}

Tạo lộ trình học 7 ngày với các module hàng ngày. Mỗi ngày nên xây dựng dựa trên việc học của ngày trước. Tập trung vào từ vựng và cụm từ thực tế phù hợp với sở thích và mục tiêu của người dùng.

{focus_line}
{extra_line}

Định dạng phản hồi của bạn dưới dạng mảng JSON của 7 module học tập với cấu trúc này:
{
  "day": 1,
  "title": "Tiêu đề Module | Module Title",
  "description": "Mô tả ngắn gọn về những gì sẽ được học | Brief description of what will be learned",
  "topics": ["chủ đề1", "chủ đề2", "chủ đề3"],
  "difficulty": "beginner|intermediate|advanced",
  "estimatedTime": "phút",
  "focusAreas": ["vocabulary", "pronunciation", "grammar", "usage"],
  "keySkills": ["kỹ năng1", "kỹ năng2", "kỹ năng3"]
}"#;

const PATH_USER_VI: &str =
    "Vui lòng tạo lộ trình học tiếng Anh 7 ngày được cá nhân hóa dựa trên hồ sơ của tôi.";

/// The full set of template strings for one instruction dialect.
struct DialectTemplates {
    flashcard_system: &'static str,
    flashcard_user: &'static str,
    path_system: &'static str,
    path_user: &'static str,
    focus_prefix: &'static str,
    extra_prefix: &'static str,
}

static ENGLISH_ONLY: DialectTemplates = DialectTemplates {
    flashcard_system: FLASHCARD_SYSTEM_EN,
    flashcard_user: FLASHCARD_USER_EN,
    path_system: PATH_SYSTEM_EN,
    path_user: PATH_USER_EN,
    focus_prefix: "Special focus area: ",
    extra_prefix: "Additional instructions: ",
};

static BILINGUAL_VI_EN: DialectTemplates = DialectTemplates {
    flashcard_system: FLASHCARD_SYSTEM_VI,
    flashcard_user: FLASHCARD_USER_VI,
    path_system: PATH_SYSTEM_VI,
    path_user: PATH_USER_VI,
    focus_prefix: "Lĩnh vực trọng tâm: ",
    extra_prefix: "Hướng dẫn bổ sung: ",
};

fn templates(dialect: Dialect) -> &'static DialectTemplates {
    match dialect {
        Dialect::EnglishOnly => &ENGLISH_ONLY,
        Dialect::BilingualViEn => &BILINGUAL_VI_EN,
    }
}

//=========================================================================================
// Provider Profile and Rendered Output
//=========================================================================================

/// The provider a prompt is rendered for. OpenAI and Perplexity both speak
/// the chat-completion protocol with bearer auth, so one profile value
/// covers every supported provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub model_id: String,
    pub api_base: String,
}

/// Sampling parameters are fixed per content kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl ContentKind {
    pub fn sampling(self) -> SamplingParams {
        match self {
            ContentKind::Flashcards => SamplingParams {
                temperature: 0.7,
                max_output_tokens: 2000,
            },
            ContentKind::LearningPath => SamplingParams {
                temperature: 0.8,
                max_output_tokens: 2500,
            },
        }
    }
}

/// A fully rendered provider call: both message bodies plus the call
/// parameters an adapter needs to place the request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub system_instructions: String,
    pub user_message: String,
    pub model_id: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

//=========================================================================================
// Rendering
//=========================================================================================

/// Renders a generation request into a provider call.
///
/// Preconditions are checked before any template work: an empty transcript or
/// an empty learner id returns `InvalidInput` without rendering anything.
pub fn render(
    request: &GenerationRequest,
    profile: &ProviderProfile,
) -> GenerationResult<RenderedPrompt> {
    match &request.source {
        GenerationSource::Transcript(transcript) => {
            if transcript.trim().is_empty() {
                return Err(GenerationError::InvalidInput(
                    "transcript must not be empty".to_string(),
                ));
            }
        }
        GenerationSource::Learner(learner) => {
            if learner.user_id.trim().is_empty() {
                return Err(GenerationError::InvalidInput(
                    "user id must not be empty".to_string(),
                ));
            }
        }
    }

    let t = templates(request.dialect);
    let focus_line = optional_line(t.focus_prefix, request.topic.as_deref());
    let extra_line = optional_line(t.extra_prefix, request.custom_instructions.as_deref());

    let (system_instructions, user_message) = match &request.source {
        GenerationSource::Transcript(transcript) => {
            let system = t
                .flashcard_system
                .replace("{difficulty}", &request.difficulty.to_string())
                .replace("{focus_line}", &focus_line)
                .replace("{extra_line}", &extra_line);
            let user = t.flashcard_user.replace("{transcript}", transcript);
            (system, user)
        }
        GenerationSource::Learner(learner) => {
            let system = t
                .path_system
                .replace("{current_level}", &learner.current_level.to_string())
                .replace("{interests}", &learner.interests.join(", "))
                .replace("{learning_goals}", &learner.learning_goals.join(", "))
                .replace("{time_available}", &learner.time_available_minutes.to_string())
                .replace(
                    "{preferred_difficulty}",
                    &learner.preferred_difficulty.to_string(),
                )
                .replace("{focus_line}", &focus_line)
                .replace("{extra_line}", &extra_line);
            (system, t.path_user.to_string())
        }
    };

    let sampling = request.kind().sampling();
    Ok(RenderedPrompt {
        system_instructions,
        user_message,
        model_id: profile.model_id.clone(),
        temperature: sampling.temperature,
        max_output_tokens: sampling.max_output_tokens,
    })
}

/// Renders `prefix + value` when the value is non-empty, otherwise nothing.
/// Whitespace-only values count as empty.
fn optional_line(prefix: &str, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => format!("{}{}", prefix, v),
        None => String::new(),
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, LearnerProfile};

    fn profile() -> ProviderProfile {
        ProviderProfile {
            model_id: "llama-3.1-sonar-small-128k-online".to_string(),
            api_base: "https://api.perplexity.ai".to_string(),
        }
    }

    fn flashcard_request(dialect: Dialect) -> GenerationRequest {
        GenerationRequest {
            source: GenerationSource::Transcript(
                "Today we talk about supply and demand.".to_string(),
            ),
            difficulty: Difficulty::Advanced,
            topic: None,
            custom_instructions: None,
            dialect,
        }
    }

    fn learner() -> LearnerProfile {
        LearnerProfile {
            user_id: "user-42".to_string(),
            current_level: Difficulty::Intermediate,
            interests: vec!["business".to_string(), "technology".to_string()],
            learning_goals: vec!["presentation skills".to_string()],
            time_available_minutes: 30,
            preferred_difficulty: Difficulty::Advanced,
        }
    }

    fn path_request(dialect: Dialect) -> GenerationRequest {
        GenerationRequest {
            source: GenerationSource::Learner(learner()),
            difficulty: Difficulty::Advanced,
            topic: None,
            custom_instructions: None,
            dialect,
        }
    }

    #[test]
    fn difficulty_is_interpolated_verbatim() {
        for dialect in [Dialect::EnglishOnly, Dialect::BilingualViEn] {
            let prompt = render(&flashcard_request(dialect), &profile()).unwrap();
            assert!(prompt.system_instructions.contains("advanced"));
            assert!(!prompt.system_instructions.contains("{difficulty}"));
        }
    }

    #[test]
    fn focus_line_appears_only_with_topic() {
        let mut request = flashcard_request(Dialect::EnglishOnly);
        let without = render(&request, &profile()).unwrap();
        assert!(!without.system_instructions.contains("Special focus area"));

        request.topic = Some("business idioms".to_string());
        let with = render(&request, &profile()).unwrap();
        assert!(with
            .system_instructions
            .contains("Special focus area: business idioms"));
    }

    #[test]
    fn whitespace_topic_counts_as_absent() {
        let mut request = flashcard_request(Dialect::BilingualViEn);
        request.topic = Some("   ".to_string());
        let prompt = render(&request, &profile()).unwrap();
        assert!(!prompt.system_instructions.contains("Lĩnh vực trọng tâm"));
    }

    #[test]
    fn custom_instructions_line_appears_only_when_present() {
        let mut request = flashcard_request(Dialect::EnglishOnly);
        let without = render(&request, &profile()).unwrap();
        assert!(!without.system_instructions.contains("Additional instructions"));

        request.custom_instructions = Some("avoid slang".to_string());
        let with = render(&request, &profile()).unwrap();
        assert!(with
            .system_instructions
            .contains("Additional instructions: avoid slang"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut request = flashcard_request(Dialect::BilingualViEn);
        request.topic = Some("travel".to_string());
        let first = render(&request, &profile()).unwrap();
        let second = render(&request, &profile()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn transcript_is_embedded_in_user_message() {
        let prompt = render(&flashcard_request(Dialect::EnglishOnly), &profile()).unwrap();
        assert!(prompt
            .user_message
            .contains("Today we talk about supply and demand."));
    }

    #[test]
    fn empty_transcript_is_rejected_before_rendering() {
        for text in ["", "   \n\t"] {
            let request = GenerationRequest {
                source: GenerationSource::Transcript(text.to_string()),
                difficulty: Difficulty::default(),
                topic: None,
                custom_instructions: None,
                dialect: Dialect::EnglishOnly,
            };
            let err = render(&request, &profile()).unwrap_err();
            assert!(matches!(err, GenerationError::InvalidInput(_)));
        }
    }

    #[test]
    fn empty_user_id_is_rejected_before_rendering() {
        let mut bad = learner();
        bad.user_id = String::new();
        let request = GenerationRequest {
            source: GenerationSource::Learner(bad),
            difficulty: Difficulty::default(),
            topic: None,
            custom_instructions: None,
            dialect: Dialect::BilingualViEn,
        };
        let err = render(&request, &profile()).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInput(_)));
    }

    #[test]
    fn learner_profile_fields_are_interpolated() {
        let prompt = render(&path_request(Dialect::EnglishOnly), &profile()).unwrap();
        assert!(prompt.system_instructions.contains("business, technology"));
        assert!(prompt.system_instructions.contains("presentation skills"));
        assert!(prompt.system_instructions.contains("30 minutes per day"));
        assert!(prompt.system_instructions.contains("Preferred Difficulty: advanced"));
    }

    #[test]
    fn both_dialects_describe_the_same_field_names() {
        for (request, fields) in [
            (
                flashcard_request(Dialect::EnglishOnly),
                ["\"question\"", "\"answer\"", "\"difficulty\"", "\"category\""].as_slice(),
            ),
            (
                path_request(Dialect::EnglishOnly),
                [
                    "\"day\"",
                    "\"title\"",
                    "\"description\"",
                    "\"topics\"",
                    "\"estimatedTime\"",
                    "\"focusAreas\"",
                    "\"keySkills\"",
                ]
                .as_slice(),
            ),
        ] {
            for dialect in [Dialect::EnglishOnly, Dialect::BilingualViEn] {
                let mut request = request.clone();
                request.dialect = dialect;
                let prompt = render(&request, &profile()).unwrap();
                for field in fields {
                    assert!(
                        prompt.system_instructions.contains(field),
                        "{:?} is missing {}",
                        dialect,
                        field
                    );
                }
            }
        }
    }

    #[test]
    fn sampling_parameters_are_fixed_per_kind() {
        let cards = render(&flashcard_request(Dialect::EnglishOnly), &profile()).unwrap();
        assert_eq!(cards.temperature, 0.7);
        assert_eq!(cards.max_output_tokens, 2000);

        let path = render(&path_request(Dialect::EnglishOnly), &profile()).unwrap();
        assert_eq!(path.temperature, 0.8);
        assert_eq!(path.max_output_tokens, 2500);
    }

    #[test]
    fn model_id_comes_from_the_provider_profile() {
        let prompt = render(&flashcard_request(Dialect::EnglishOnly), &profile()).unwrap();
        assert_eq!(prompt.model_id, "llama-3.1-sonar-small-128k-online");
    }
}
