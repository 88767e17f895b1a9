pub mod item;
pub mod keyword;
pub mod lesson;

pub use item::{InteractiveItem, ItemKind, QuizContent, Slide, SlideContent};
pub use keyword::Keyword;
pub use lesson::{Lesson, LessonDetail, LessonDraft, LessonPayload, LessonType};
