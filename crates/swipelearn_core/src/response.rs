//! crates/swipelearn_core/src/response.rs
//!
//! The content response interpreter: validates the raw completion text a
//! provider returned as a JSON array of flashcard or learning-module records.
//! A purely local transform over the supplied text; retry policy, if any,
//! belongs to the caller.

use serde_json::Value;

use crate::domain::{FlashcardRecord, LearningModule};
use crate::ports::{GenerationError, GenerationResult, SchemaViolation};

/// How much of a malformed response is echoed back in the error.
const SNIPPET_CHARS: usize = 120;

/// The outcome of interpreting one provider response: the records that
/// survived validation plus the ones that were dropped, in response order.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation<T> {
    pub records: Vec<T>,
    pub dropped: Vec<SchemaViolation>,
}

/// Interprets a completion as a batch of flashcards.
///
/// Records missing a field, carrying an out-of-enum value, or with an empty
/// question or answer are dropped individually; the batch fails only when
/// nothing survives.
pub fn interpret_flashcards(raw: &str) -> GenerationResult<Interpretation<FlashcardRecord>> {
    let items = parse_array(raw)?;
    let mut records = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match validate_flashcard(item) {
            Ok(record) => records.push(record),
            Err(reason) => dropped.push(SchemaViolation { index, reason }),
        }
    }

    finish(records, dropped)
}

/// Interprets a completion as a 7-day learning path.
///
/// Beyond per-field validation, `day` must fall in 1..=7 and be unique across
/// the batch; when two records claim the same day the first one wins and
/// later claimants are dropped.
pub fn interpret_learning_path(raw: &str) -> GenerationResult<Interpretation<LearningModule>> {
    let items = parse_array(raw)?;
    let mut records: Vec<LearningModule> = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();
    let mut seen_days = [false; 8];

    for (index, item) in items.into_iter().enumerate() {
        match validate_module(item) {
            Ok(module) => {
                if seen_days[module.day as usize] {
                    dropped.push(SchemaViolation {
                        index,
                        reason: format!("duplicate day {}", module.day),
                    });
                } else {
                    seen_days[module.day as usize] = true;
                    records.push(module);
                }
            }
            Err(reason) => dropped.push(SchemaViolation { index, reason }),
        }
    }

    finish(records, dropped)
}

//=========================================================================================
// Parsing and Validation Steps
//=========================================================================================

/// Step 2 of the interpretation contract: the text must parse as JSON, and
/// the parsed value must be an array. Anything else is a malformed response
/// carrying a bounded snippet of the offending text.
fn parse_array(raw: &str) -> GenerationResult<Vec<Value>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|_| GenerationError::MalformedResponse(snippet(raw)))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(GenerationError::MalformedResponse(snippet(raw))),
    }
}

fn validate_flashcard(item: Value) -> Result<FlashcardRecord, String> {
    let record: FlashcardRecord =
        serde_json::from_value(item).map_err(|e| e.to_string())?;
    if record.question.trim().is_empty() {
        return Err("question is empty".to_string());
    }
    if record.answer.trim().is_empty() {
        return Err("answer is empty".to_string());
    }
    Ok(record)
}

fn validate_module(item: Value) -> Result<LearningModule, String> {
    let module: LearningModule =
        serde_json::from_value(item).map_err(|e| e.to_string())?;
    if !(1..=7).contains(&module.day) {
        return Err(format!("day {} is outside 1..=7", module.day));
    }
    if module.title.trim().is_empty() {
        return Err("title is empty".to_string());
    }
    if module.description.trim().is_empty() {
        return Err("description is empty".to_string());
    }
    if module.topics.is_empty() {
        return Err("topics is empty".to_string());
    }
    Ok(module)
}

/// Step 4: a batch is a success as long as at least one record survived.
fn finish<T>(
    records: Vec<T>,
    dropped: Vec<SchemaViolation>,
) -> GenerationResult<Interpretation<T>> {
    if records.is_empty() {
        return Err(GenerationError::EmptyResult);
    }
    Ok(Interpretation { records, dropped })
}

fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_CHARS).collect()
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CardCategory, CardDifficulty, Difficulty, EstimatedTime, FocusArea};
    use serde_json::json;

    fn card(question: &str) -> Value {
        json!({
            "question": question,
            "answer": "An explanation with examples.",
            "difficulty": "medium",
            "category": "vocabulary"
        })
    }

    fn module(day: u8, title: &str) -> Value {
        json!({
            "day": day,
            "title": title,
            "description": "Essential vocabulary for professional communication",
            "topics": ["email writing", "meeting vocabulary"],
            "difficulty": "intermediate",
            "estimatedTime": "30",
            "focusAreas": ["vocabulary", "usage"],
            "keySkills": ["formal communication"]
        })
    }

    #[test]
    fn well_formed_flashcards_round_trip_verbatim() {
        let raw = json!([card("What does 'leverage' mean?"), card("What does 'pivot' mean?")])
            .to_string();
        let result = interpret_flashcards(&raw).unwrap();
        assert_eq!(result.records.len(), 2);
        assert!(result.dropped.is_empty());
        assert_eq!(result.records[0].question, "What does 'leverage' mean?");
        assert_eq!(result.records[0].answer, "An explanation with examples.");
        assert_eq!(result.records[0].difficulty, CardDifficulty::Medium);
        assert_eq!(result.records[0].category, CardCategory::Vocabulary);
    }

    #[test]
    fn malformed_records_are_dropped_not_fatal() {
        let raw = json!([
            card("q1"),
            card("q2"),
            { "question": "missing answer", "difficulty": "easy", "category": "idioms" },
            card("q3"),
            card("q4"),
            { "question": "bad enum", "answer": "a", "difficulty": "impossible", "category": "idioms" },
            card("q5"),
        ])
        .to_string();
        let result = interpret_flashcards(&raw).unwrap();
        assert_eq!(result.records.len(), 5);
        assert_eq!(result.dropped.len(), 2);
        assert_eq!(result.dropped[0].index, 2);
        assert_eq!(result.dropped[1].index, 5);
    }

    #[test]
    fn empty_question_or_answer_is_a_violation() {
        let raw = json!([card(""), card("ok")]).to_string();
        let result = interpret_flashcards(&raw).unwrap();
        assert_eq!(result.records.len(), 1);
        assert!(result.dropped[0].reason.contains("question"));
    }

    #[test]
    fn all_invalid_records_yield_empty_result() {
        let raw = json!([
            { "question": "no answer", "difficulty": "easy", "category": "idioms" },
            { "not": "a flashcard" },
        ])
        .to_string();
        let err = interpret_flashcards(&raw).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResult));
    }

    #[test]
    fn empty_array_yields_empty_result() {
        let err = interpret_flashcards("[]").unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResult));
    }

    #[test]
    fn non_json_text_is_malformed() {
        let err = interpret_flashcards("Sorry, I cannot help.").unwrap_err();
        match err {
            GenerationError::MalformedResponse(snippet) => {
                assert!(snippet.starts_with("Sorry"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn json_that_is_not_an_array_is_malformed() {
        let raw = json!({ "flashcards": [] }).to_string();
        let err = interpret_flashcards(&raw).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn malformed_snippet_is_bounded() {
        let long = "x".repeat(10_000);
        match interpret_flashcards(&long).unwrap_err() {
            GenerationError::MalformedResponse(snippet) => {
                assert_eq!(snippet.chars().count(), 120);
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn learning_path_round_trips() {
        let raw = json!([module(1, "Business English"), module(2, "Small Talk")]).to_string();
        let result = interpret_learning_path(&raw).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].day, 1);
        assert_eq!(result.records[0].difficulty, Difficulty::Intermediate);
        assert_eq!(
            result.records[0].estimated_time,
            EstimatedTime::Text("30".to_string())
        );
        assert_eq!(
            result.records[0].focus_areas,
            vec![FocusArea::Vocabulary, FocusArea::Usage]
        );
    }

    #[test]
    fn estimated_time_accepts_integers_too() {
        let mut item = module(1, "Day one");
        item["estimatedTime"] = json!(45);
        let raw = json!([item]).to_string();
        let result = interpret_learning_path(&raw).unwrap();
        assert_eq!(result.records[0].estimated_time, EstimatedTime::Minutes(45));
    }

    #[test]
    fn duplicate_day_keeps_the_first_record() {
        let raw = json!([
            module(3, "first claimant"),
            module(3, "second claimant"),
            module(4, "unrelated"),
        ])
        .to_string();
        let result = interpret_learning_path(&raw).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].title, "first claimant");
        assert_eq!(result.dropped.len(), 1);
        assert_eq!(result.dropped[0].index, 1);
        assert!(result.dropped[0].reason.contains("duplicate day 3"));
    }

    #[test]
    fn day_outside_range_is_dropped() {
        let raw = json!([module(8, "day eight"), module(1, "day one")]).to_string();
        let result = interpret_learning_path(&raw).unwrap();
        assert_eq!(result.records.len(), 1);
        assert!(result.dropped[0].reason.contains("outside"));
    }

    #[test]
    fn empty_topics_is_a_violation() {
        let mut item = module(1, "Day one");
        item["topics"] = json!([]);
        let raw = json!([item, module(2, "Day two")]).to_string();
        let result = interpret_learning_path(&raw).unwrap();
        assert_eq!(result.records.len(), 1);
        assert!(result.dropped[0].reason.contains("topics"));
    }

    #[test]
    fn unknown_focus_area_is_a_violation() {
        let mut item = module(1, "Day one");
        item["focusAreas"] = json!(["vocabulary", "swimming"]);
        let raw = json!([item, module(2, "Day two")]).to_string();
        let result = interpret_learning_path(&raw).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.dropped[0].index, 0);
    }
}
