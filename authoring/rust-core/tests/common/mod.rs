use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use lessonlab_core::config::Config;
use lessonlab_core::models::lesson::{Lesson, LessonDetail, LessonType};
use lessonlab_core::services::persistence::InMemoryLessonStore;
use lessonlab_core::services::AppState;

pub fn test_state() -> (AppState, Arc<InMemoryLessonStore>) {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(InMemoryLessonStore::new());
    let state = AppState::new(Config::default(), store.clone());
    (state, store)
}

pub async fn seed_lesson(
    store: &InMemoryLessonStore,
    id: &str,
    lesson_type: LessonType,
    content_data: Value,
) -> LessonDetail {
    let now = Utc::now();
    let detail = LessonDetail {
        lesson: Lesson {
            id: id.to_string(),
            course_id: "course-1".to_string(),
            title: "Greetings".to_string(),
            description: "Basic greetings".to_string(),
            order: 1,
            lesson_type,
            content_url: String::new(),
            points_reward: 10,
            requires_reflection: false,
            created_at: now,
            updated_at: now,
        },
        content_data,
        keywords: Vec::new(),
        passing_score: 70,
    };
    store.insert(detail.clone()).await;
    detail
}
