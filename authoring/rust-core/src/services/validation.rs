use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use url::Url;
use validator::Validate;

use crate::models::lesson::{LessonDraft, LessonType};
use crate::services::normalizer::{normalize, NormalizedContent};

/// Field name -> message. Empty map means the lesson can be committed.
pub type ErrorMap = BTreeMap<String, String>;

lazy_static! {
    static ref VIDEO_EXT_REGEX: Regex =
        Regex::new(r"(?i)\.(mp4|webm|ogg|mov|m4v)$").expect("hardcoded regex should compile");
    static ref PDF_EXT_REGEX: Regex =
        Regex::new(r"(?i)\.pdf$").expect("hardcoded regex should compile");
}

/// Synchronous completeness/format checks over a lesson snapshot.
/// Accumulates every problem instead of short-circuiting and never
/// mutates the draft; errors block the commit action, not editing.
pub fn validate(draft: &LessonDraft) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if draft.title.trim().is_empty() {
        errors.insert("title".to_string(), "Title is required".to_string());
    }
    if draft.description.trim().is_empty() {
        errors.insert(
            "description".to_string(),
            "Description is required".to_string(),
        );
    }

    merge_payload_checks(draft, &mut errors);

    match draft.lesson_type {
        LessonType::Keywords => validate_keywords(draft, &mut errors),
        LessonType::Quiz => validate_quiz(draft, &mut errors),
        LessonType::Slides => validate_slides(draft, &mut errors),
        LessonType::Video => {
            validate_content_url(draft, &VIDEO_EXT_REGEX, ".mp4, .webm, .ogg, .mov or .m4v", &mut errors)
        }
        LessonType::Pdf => validate_content_url(draft, &PDF_EXT_REGEX, ".pdf", &mut errors),
    }

    errors
}

/// Missing audio on keywords is advisory, not blocking; a summary
/// collaborator surfaces these separately from the error map.
pub fn audio_warnings(draft: &LessonDraft) -> Vec<String> {
    if draft.lesson_type != LessonType::Keywords {
        return Vec::new();
    }
    draft
        .keywords
        .iter()
        .enumerate()
        .filter(|(_, kw)| kw.has_required_text() && kw.missing_audio())
        .map(|(i, kw)| format!("Keyword {} ({}) is missing audio", i + 1, kw.english_text))
        .collect()
}

fn merge_payload_checks(draft: &LessonDraft, errors: &mut ErrorMap) {
    // Flat range/length rules live on the payload via validator derive;
    // manual per-type checks take precedence on key collision.
    if let Err(failures) = draft.to_payload().validate() {
        for (field, field_errors) in failures.field_errors() {
            let key = match field.as_ref() {
                "passing_score" => "passingScore",
                "points_reward" => "pointsReward",
                other => other,
            };
            if errors.contains_key(key) {
                continue;
            }
            let message = field_errors
                .iter()
                .filter_map(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .next()
                .unwrap_or_else(|| format!("Invalid value for {}", key));
            errors.insert(key.to_string(), message);
        }
    }
}

fn validate_keywords(draft: &LessonDraft, errors: &mut ErrorMap) {
    if draft.keywords.is_empty() {
        errors.insert(
            "keywords".to_string(),
            "Add at least one keyword".to_string(),
        );
        return;
    }
    for (i, keyword) in draft.keywords.iter().enumerate() {
        if keyword.japanese_text.trim().is_empty() {
            errors.insert(
                format!("keywords[{}].japaneseText", i),
                "Japanese text is required".to_string(),
            );
        }
        if keyword.english_text.trim().is_empty() {
            errors.insert(
                format!("keywords[{}].englishText", i),
                "English text is required".to_string(),
            );
        }
    }
}

fn validate_quiz(draft: &LessonDraft, errors: &mut ErrorMap) {
    let quiz = match normalize(LessonType::Quiz, &draft.content_data) {
        NormalizedContent::Quiz(quiz) => quiz,
        _ => return,
    };
    if quiz.questions.is_empty() {
        errors.insert(
            "questions".to_string(),
            "Add at least one quiz question".to_string(),
        );
        return;
    }
    for (i, question) in quiz.questions.iter().enumerate() {
        let issues = question.completeness_issues();
        if !issues.is_empty() {
            errors.insert(format!("questions[{}]", i), issues.join("; "));
        }
    }
}

fn validate_slides(draft: &LessonDraft, errors: &mut ErrorMap) {
    let content = match normalize(LessonType::Slides, &draft.content_data) {
        NormalizedContent::Slides(content) => content,
        _ => return,
    };
    // Empty slides are allowed while authoring; only a lesson with no
    // slides at all is incomplete.
    if content.slides.is_empty() {
        errors.insert("slides".to_string(), "Add at least one slide".to_string());
    }
}

fn validate_content_url(
    draft: &LessonDraft,
    allowed: &Regex,
    expected: &str,
    errors: &mut ErrorMap,
) {
    let url = draft.content_url.trim();
    if url.is_empty() {
        errors.insert(
            "contentUrl".to_string(),
            "Content URL is required".to_string(),
        );
        return;
    }
    if !allowed.is_match(&path_without_query(url)) {
        errors.insert(
            "contentUrl".to_string(),
            format!("URL must point to a {} file", expected),
        );
    }
}

/// Extension matching ignores an optional query string and fragment.
fn path_without_query(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative paths don't parse as absolute URLs; strip manually.
        Err(_) => raw.split(['?', '#']).next().unwrap_or(raw).to_string(),
    }
}
