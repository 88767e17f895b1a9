use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use validator::Validate;

use crate::models::keyword::Keyword;

/// Discriminant selecting which content payload of a lesson is active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LessonType {
    Video,
    Pdf,
    Keywords,
    Quiz,
    Slides,
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonType::Video => "VIDEO",
            LessonType::Pdf => "PDF",
            LessonType::Keywords => "KEYWORDS",
            LessonType::Quiz => "QUIZ",
            LessonType::Slides => "SLIDES",
        }
    }

    /// True for the two types whose payload is a plain URL.
    pub fn uses_content_url(&self) -> bool {
        matches!(self, LessonType::Video | LessonType::Pdf)
    }
}

impl FromStr for LessonType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_uppercase().as_str() {
            "VIDEO" => Ok(LessonType::Video),
            "PDF" => Ok(LessonType::Pdf),
            "KEYWORDS" => Ok(LessonType::Keywords),
            "QUIZ" => Ok(LessonType::Quiz),
            "SLIDES" => Ok(LessonType::Slides),
            _ => Err(format!("Invalid lesson type: {}", value)),
        }
    }
}

/// Lesson as it appears in course listings. The heavy fields
/// (`content_data`, `keywords`, `passing_score`) only exist on
/// [`LessonDetail`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
    pub lesson_type: LessonType,
    #[serde(default)]
    pub content_url: String,
    #[serde(default)]
    pub points_reward: i32,
    #[serde(default)]
    pub requires_reflection: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full lesson record returned by the persistence collaborator's `get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail {
    #[serde(flatten)]
    pub lesson: Lesson,
    /// Opaque until the normalizer has run.
    #[serde(default)]
    pub content_data: Value,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default = "default_passing_score")]
    pub passing_score: i32,
}

pub fn default_passing_score() -> i32 {
    70
}

/// Write shape handed to the persistence collaborator on commit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LessonPayload {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
    pub lesson_type: LessonType,
    #[serde(default)]
    pub content_url: String,
    #[serde(default)]
    pub content_data: Value,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[validate(range(min = 0, max = 100, message = "Passing score must be between 0 and 100"))]
    pub passing_score: i32,
    #[validate(range(min = 0, message = "Points reward cannot be negative"))]
    pub points_reward: i32,
    #[serde(default)]
    pub requires_reflection: bool,
}

/// In-editor working copy of a lesson. Exactly one of `content_url`,
/// `content_data`, `keywords` is active, selected by `lesson_type`;
/// the normalizer enforces that invariant before the draft is used.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonDraft {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub order: i32,
    pub lesson_type: LessonType,
    pub content_url: String,
    pub content_data: Value,
    pub keywords: Vec<Keyword>,
    pub passing_score: i32,
    pub points_reward: i32,
    pub requires_reflection: bool,
}

impl LessonDraft {
    pub fn new(lesson_type: LessonType) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            order: 0,
            lesson_type,
            content_url: String::new(),
            content_data: Value::Null,
            keywords: Vec::new(),
            passing_score: default_passing_score(),
            points_reward: 0,
            requires_reflection: false,
        }
    }

    pub fn from_detail(detail: &LessonDetail) -> Self {
        Self {
            id: Some(detail.lesson.id.clone()),
            title: detail.lesson.title.clone(),
            description: detail.lesson.description.clone(),
            order: detail.lesson.order,
            lesson_type: detail.lesson.lesson_type,
            content_url: detail.lesson.content_url.clone(),
            content_data: detail.content_data.clone(),
            keywords: detail.keywords.clone(),
            passing_score: detail.passing_score,
            points_reward: detail.lesson.points_reward,
            requires_reflection: detail.lesson.requires_reflection,
        }
    }

    pub fn to_payload(&self) -> LessonPayload {
        LessonPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            order: self.order,
            lesson_type: self.lesson_type,
            content_url: self.content_url.clone(),
            content_data: self.content_data.clone(),
            keywords: self.keywords.clone(),
            passing_score: self.passing_score,
            points_reward: self.points_reward,
            requires_reflection: self.requires_reflection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LessonDetail, LessonType};
    use std::str::FromStr;

    #[test]
    fn lesson_type_round_trips_through_str() {
        for lt in [
            LessonType::Video,
            LessonType::Pdf,
            LessonType::Keywords,
            LessonType::Quiz,
            LessonType::Slides,
        ] {
            assert_eq!(LessonType::from_str(lt.as_str()).unwrap(), lt);
        }
        assert_eq!(LessonType::from_str("quiz").unwrap(), LessonType::Quiz);
        assert!(LessonType::from_str("PODCAST").is_err());
    }

    #[test]
    fn lesson_type_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&LessonType::Slides).unwrap(),
            "\"SLIDES\""
        );
    }

    #[test]
    fn detail_defaults_missing_fields() {
        let raw = serde_json::json!({
            "id": "l1",
            "courseId": "c1",
            "title": "Greetings",
            "lessonType": "QUIZ",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z",
        });
        let detail: LessonDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.passing_score, 70);
        assert!(detail.keywords.is_empty());
        assert!(detail.content_data.is_null());
    }
}
