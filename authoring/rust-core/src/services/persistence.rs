use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::lesson::{Lesson, LessonDetail, LessonPayload};

/// External persistence failure, surfaced verbatim to the caller. The
/// core never retries and never touches in-memory state on failure;
/// retry policy belongs to whoever owns the call site.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("lesson not found: {0}")]
    NotFound(String),
    #[error("save rejected: {0}")]
    Rejected(String),
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}

/// The persistence collaborator. Transport is someone else's problem;
/// this is the whole contract the authoring core relies on.
#[async_trait]
pub trait LessonStore: Send + Sync {
    async fn create(&self, course_id: &str, payload: &LessonPayload) -> Result<Lesson, StoreError>;
    async fn update(&self, lesson_id: &str, payload: &LessonPayload) -> Result<Lesson, StoreError>;
    async fn delete(&self, lesson_id: &str) -> Result<(), StoreError>;
    async fn get(&self, lesson_id: &str) -> Result<LessonDetail, StoreError>;
}

/// Reference store used by tests and the CLI. Keeps full detail
/// records behind an async lock.
#[derive(Default)]
pub struct InMemoryLessonStore {
    lessons: RwLock<HashMap<String, LessonDetail>>,
}

impl InMemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, detail: LessonDetail) {
        self.lessons
            .write()
            .await
            .insert(detail.lesson.id.clone(), detail);
    }

    pub async fn len(&self) -> usize {
        self.lessons.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lessons.read().await.is_empty()
    }

    fn detail_from_payload(
        id: String,
        course_id: String,
        payload: &LessonPayload,
        created_at: chrono::DateTime<Utc>,
    ) -> LessonDetail {
        LessonDetail {
            lesson: Lesson {
                id,
                course_id,
                title: payload.title.clone(),
                description: payload.description.clone(),
                order: payload.order,
                lesson_type: payload.lesson_type,
                content_url: payload.content_url.clone(),
                points_reward: payload.points_reward,
                requires_reflection: payload.requires_reflection,
                created_at,
                updated_at: Utc::now(),
            },
            content_data: payload.content_data.clone(),
            keywords: payload.keywords.clone(),
            passing_score: payload.passing_score,
        }
    }
}

#[async_trait]
impl LessonStore for InMemoryLessonStore {
    async fn create(&self, course_id: &str, payload: &LessonPayload) -> Result<Lesson, StoreError> {
        let id = Uuid::new_v4().to_string();
        let detail = Self::detail_from_payload(
            id.clone(),
            course_id.to_string(),
            payload,
            Utc::now(),
        );
        let lesson = detail.lesson.clone();
        self.lessons.write().await.insert(id, detail);
        Ok(lesson)
    }

    async fn update(&self, lesson_id: &str, payload: &LessonPayload) -> Result<Lesson, StoreError> {
        let mut lessons = self.lessons.write().await;
        let existing = lessons
            .get(lesson_id)
            .ok_or_else(|| StoreError::NotFound(lesson_id.to_string()))?;
        let detail = Self::detail_from_payload(
            lesson_id.to_string(),
            existing.lesson.course_id.clone(),
            payload,
            existing.lesson.created_at,
        );
        let lesson = detail.lesson.clone();
        lessons.insert(lesson_id.to_string(), detail);
        Ok(lesson)
    }

    async fn delete(&self, lesson_id: &str) -> Result<(), StoreError> {
        self.lessons
            .write()
            .await
            .remove(lesson_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(lesson_id.to_string()))
    }

    async fn get(&self, lesson_id: &str) -> Result<LessonDetail, StoreError> {
        self.lessons
            .read()
            .await
            .get(lesson_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(lesson_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryLessonStore, LessonStore, StoreError};
    use crate::models::lesson::{LessonPayload, LessonType};
    use serde_json::Value;

    fn payload(title: &str) -> LessonPayload {
        LessonPayload {
            title: title.to_string(),
            description: "desc".into(),
            order: 0,
            lesson_type: LessonType::Video,
            content_url: "https://cdn.example.com/a.mp4".into(),
            content_data: Value::Null,
            keywords: Vec::new(),
            passing_score: 70,
            points_reward: 10,
            requires_reflection: false,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = InMemoryLessonStore::new();
        let lesson = store.create("course-1", &payload("Intro")).await.unwrap();
        let detail = store.get(&lesson.id).await.unwrap();
        assert_eq!(detail.lesson.title, "Intro");
        assert_eq!(detail.lesson.course_id, "course-1");
        assert_eq!(detail.passing_score, 70);
    }

    #[tokio::test]
    async fn update_preserves_identity_and_creation_time() {
        let store = InMemoryLessonStore::new();
        let lesson = store.create("course-1", &payload("Intro")).await.unwrap();
        let updated = store
            .update(&lesson.id, &payload("Intro v2"))
            .await
            .unwrap();
        assert_eq!(updated.id, lesson.id);
        assert_eq!(updated.created_at, lesson.created_at);
        assert_eq!(updated.title, "Intro v2");
    }

    #[tokio::test]
    async fn missing_lessons_report_not_found() {
        let store = InMemoryLessonStore::new();
        assert!(matches!(
            store.get("nope").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.update("nope", &payload("x")).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.delete("nope").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = InMemoryLessonStore::new();
        let lesson = store.create("course-1", &payload("Intro")).await.unwrap();
        store.delete(&lesson.id).await.unwrap();
        assert!(store.is_empty().await);
    }
}
