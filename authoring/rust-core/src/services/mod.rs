use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::models::lesson::{Lesson, LessonDraft, LessonType};

pub mod editor;
pub mod geometry;
pub mod keyword_import;
pub mod normalizer;
pub mod persistence;
pub mod validation;

use normalizer::TypeSwitchReport;
use persistence::{LessonStore, StoreError};
use validation::ErrorMap;

/// Shared application state handed to editing sessions.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn LessonStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn LessonStore>) -> Self {
        Self { config, store }
    }
}

#[derive(Debug, Error)]
pub enum CommitError {
    /// Field-scoped validation problems; block the commit, never the
    /// editing.
    #[error("lesson failed validation ({0:?})")]
    Invalid(ErrorMap),
    /// Store failure surfaced verbatim; the in-memory draft is left
    /// untouched so the user can retry the commit.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One single-shot edit buffer over a lesson: load, mutate, commit.
/// Dropping the session discards everything uncommitted.
pub struct EditorSession {
    store: Arc<dyn LessonStore>,
    course_id: String,
    draft: LessonDraft,
}

impl EditorSession {
    /// Starts a session for a brand-new lesson.
    pub fn create(state: &AppState, course_id: &str, lesson_type: LessonType) -> Self {
        let mut draft = LessonDraft::new(lesson_type);
        draft.passing_score = state.config.default_passing_score;
        draft.points_reward = state.config.default_points_reward;
        normalizer::apply_to_draft(&mut draft);
        Self {
            store: state.store.clone(),
            course_id: course_id.to_string(),
            draft,
        }
    }

    /// Loads an existing lesson and normalizes its payload before any
    /// editor sees it.
    pub async fn open(state: &AppState, lesson_id: &str) -> Result<Self, StoreError> {
        let detail = state.store.get(lesson_id).await?;
        let mut draft = LessonDraft::from_detail(&detail);
        normalizer::apply_to_draft(&mut draft);
        tracing::info!(
            lesson_id,
            lesson_type = draft.lesson_type.as_str(),
            "opened lesson for editing"
        );
        Ok(Self {
            store: state.store.clone(),
            course_id: detail.lesson.course_id,
            draft,
        })
    }

    pub fn draft(&self) -> &LessonDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut LessonDraft {
        &mut self.draft
    }

    /// Changes the lesson type, discarding the previous payload. The
    /// report lets the caller ask for confirmation first and undo by
    /// simply not committing.
    pub fn switch_type(&mut self, new_type: LessonType) -> TypeSwitchReport {
        normalizer::switch_lesson_type(&mut self.draft, new_type)
    }

    pub fn validate(&self) -> ErrorMap {
        validation::validate(&self.draft)
    }

    pub fn audio_warnings(&self) -> Vec<String> {
        validation::audio_warnings(&self.draft)
    }

    /// Validates and persists the draft. On any failure the draft is
    /// left exactly as it was, so the edit dialog can stay open and
    /// the user can retry.
    pub async fn commit(&mut self) -> Result<Lesson, CommitError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(CommitError::Invalid(errors));
        }

        // The store receives the normalized payload, never the raw
        // draft; the draft itself adopts it only once the save lands.
        let mut normalized = self.draft.clone();
        normalizer::apply_to_draft(&mut normalized);
        let payload = normalized.to_payload();
        let saved = match &self.draft.id {
            Some(id) => self.store.update(id, &payload).await?,
            None => self.store.create(&self.course_id, &payload).await?,
        };
        tracing::info!(lesson_id = %saved.id, "lesson committed");
        normalized.id = Some(saved.id.clone());
        self.draft = normalized;
        Ok(saved)
    }
}
