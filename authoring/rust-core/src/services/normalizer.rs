use serde_json::Value;

use crate::models::item::{QuizContent, Slide, SlideContent};
use crate::models::keyword::Keyword;
use crate::models::lesson::{LessonDraft, LessonType};
use crate::models::InteractiveItem;

/// Structurally valid in-memory payload for one lesson type.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedContent {
    Keywords(Vec<Keyword>),
    Quiz(QuizContent),
    Slides(SlideContent),
    ContentUrl(String),
}

impl NormalizedContent {
    /// The JSON shape handed back to the persistence collaborator.
    pub fn to_value(&self) -> Value {
        match self {
            NormalizedContent::Keywords(keywords) => {
                serde_json::to_value(keywords).unwrap_or_default()
            }
            NormalizedContent::Quiz(quiz) => serde_json::to_value(quiz).unwrap_or_default(),
            NormalizedContent::Slides(slides) => serde_json::to_value(slides).unwrap_or_default(),
            NormalizedContent::ContentUrl(url) => Value::String(url.clone()),
        }
    }
}

/// Outcome of a lesson-type switch, so callers can layer a
/// confirmation UX over the intentional data loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSwitchReport {
    pub previous: LessonType,
    pub current: LessonType,
    /// True when the previous type had a non-empty payload that was
    /// discarded by the switch.
    pub discarded_previous: bool,
}

/// Produces a structurally valid payload for `lesson_type` from an
/// arbitrary JSON value. Never fails: malformed input degrades to the
/// type's empty default, and compatible existing data passes through.
///
/// Idempotent: `normalize(t, normalize(t, x).to_value())` deep-equals
/// `normalize(t, x)`.
pub fn normalize(lesson_type: LessonType, raw: &Value) -> NormalizedContent {
    match lesson_type {
        LessonType::Keywords => NormalizedContent::Keywords(match raw {
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }),
        LessonType::Quiz => {
            let questions = raw.get("questions").and_then(Value::as_array);
            NormalizedContent::Quiz(match questions {
                Some(entries) => QuizContent {
                    questions: collect_items(entries),
                    time_limit: raw
                        .get("timeLimit")
                        .and_then(Value::as_u64)
                        .map(|v| v as u32),
                },
                None => QuizContent::default(),
            })
        }
        LessonType::Slides => {
            let slides = raw.get("slides").and_then(Value::as_array);
            NormalizedContent::Slides(match slides {
                Some(entries) => SlideContent {
                    slides: entries
                        .iter()
                        .filter_map(|entry| serde_json::from_value::<Slide>(entry.clone()).ok())
                        .collect(),
                },
                None => SlideContent::default(),
            })
        }
        LessonType::Video | LessonType::Pdf => NormalizedContent::ContentUrl(match raw {
            Value::String(url) => url.clone(),
            _ => String::new(),
        }),
    }
}

fn collect_items(entries: &[Value]) -> Vec<InteractiveItem> {
    // Unrecognized discriminants survive as InteractiveItem::Unknown;
    // only entries that are not objects at all are dropped.
    entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect()
}

/// Runs on session open: forces the draft's active payload to match
/// its `lesson_type` without touching the inactive fields.
pub fn apply_to_draft(draft: &mut LessonDraft) {
    match draft.lesson_type {
        LessonType::Keywords => {
            // The keywords field is already typed; the opaque payload
            // is not meaningful for this type.
            draft.content_data = Value::Null;
        }
        LessonType::Quiz | LessonType::Slides => {
            draft.content_data = normalize(draft.lesson_type, &draft.content_data).to_value();
        }
        LessonType::Video | LessonType::Pdf => {
            draft.content_data = Value::Null;
        }
    }
}

/// Changes the lesson type, discarding the previous type's payload.
/// Switching away and back does NOT restore the old payload; the
/// report tells the caller whether anything was thrown away.
pub fn switch_lesson_type(draft: &mut LessonDraft, new_type: LessonType) -> TypeSwitchReport {
    let previous = draft.lesson_type;
    if previous == new_type {
        return TypeSwitchReport {
            previous,
            current: new_type,
            discarded_previous: false,
        };
    }

    let discarded_previous = has_payload(draft);
    if discarded_previous {
        tracing::info!(
            from = previous.as_str(),
            to = new_type.as_str(),
            "discarding lesson payload on type switch"
        );
    }

    draft.content_url.clear();
    draft.content_data = Value::Null;
    draft.keywords.clear();
    draft.lesson_type = new_type;
    apply_to_draft(draft);

    TypeSwitchReport {
        previous,
        current: new_type,
        discarded_previous,
    }
}

fn has_payload(draft: &LessonDraft) -> bool {
    match draft.lesson_type {
        LessonType::Keywords => !draft.keywords.is_empty(),
        LessonType::Quiz => match normalize(LessonType::Quiz, &draft.content_data) {
            NormalizedContent::Quiz(quiz) => {
                !quiz.questions.is_empty() || quiz.time_limit.is_some()
            }
            _ => false,
        },
        LessonType::Slides => match normalize(LessonType::Slides, &draft.content_data) {
            NormalizedContent::Slides(content) => !content.slides.is_empty(),
            _ => false,
        },
        LessonType::Video | LessonType::Pdf => !draft.content_url.trim().is_empty(),
    }
}
