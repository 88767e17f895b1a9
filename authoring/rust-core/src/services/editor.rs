//! Routes a generic "item + update" contract to the type-specific
//! editing surface. This is the polymorphism boundary: a new exercise
//! type needs one new variant, one new match arm here, and one new
//! surface builder, and nothing else changes.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::item::{InteractiveItem, ItemKind};
use crate::models::keyword::Keyword;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    AudioUrl,
    ImageUrl,
    Number,
    OptionList,
    PairList,
    WordList,
    EventList,
    RawJson,
}

/// One input in an editing surface; `name` matches the JSON field the
/// update patch writes back to.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: Value,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, kind: FieldKind, value: Value) -> Self {
        Self {
            name,
            label,
            kind,
            value,
        }
    }
}

/// The rendered editor for one item: its title and input fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSurface {
    /// `None` for the raw-text fallback editor.
    pub kind: Option<ItemKind>,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("an item's exercise type cannot be changed by an update")]
    TypeChange,
    #[error("update does not fit the item shape: {0}")]
    Shape(String),
}

/// Builds the type-specific editing surface for an item, switching
/// exhaustively on the discriminant. Unrecognized discriminants get a
/// raw-JSON fallback editor instead of failing, so content written by
/// a newer tool version stays editable.
pub fn dispatch(item: &InteractiveItem) -> EditorSurface {
    let text = |v: &str| Value::String(v.to_string());
    match item {
        InteractiveItem::DragDrop(it) => EditorSurface {
            kind: Some(ItemKind::DragDrop),
            title: "Drag & Drop",
            fields: vec![
                FieldSpec::new("prompt", "Prompt", FieldKind::Text, text(&it.prompt)),
                FieldSpec::new(
                    "pairs",
                    "Text / target pairs",
                    FieldKind::PairList,
                    serde_json::to_value(&it.pairs).unwrap_or_default(),
                ),
            ],
        },
        InteractiveItem::FillBlanks(it) => EditorSurface {
            kind: Some(ItemKind::FillBlanks),
            title: "Fill in the Blanks",
            fields: vec![
                FieldSpec::new(
                    "sentence",
                    "Sentence (mark blanks with ___)",
                    FieldKind::TextArea,
                    text(&it.sentence),
                ),
                FieldSpec::new(
                    "answers",
                    "Answers in order",
                    FieldKind::WordList,
                    serde_json::to_value(&it.answers).unwrap_or_default(),
                ),
                FieldSpec::new(
                    "hint",
                    "Hint",
                    FieldKind::Text,
                    it.hint.as_deref().map(text).unwrap_or(Value::Null),
                ),
            ],
        },
        InteractiveItem::Matching(it) => EditorSurface {
            kind: Some(ItemKind::Matching),
            title: "Matching",
            fields: vec![
                FieldSpec::new("prompt", "Prompt", FieldKind::Text, text(&it.prompt)),
                FieldSpec::new(
                    "pairs",
                    "Left / right pairs",
                    FieldKind::PairList,
                    serde_json::to_value(&it.pairs).unwrap_or_default(),
                ),
            ],
        },
        InteractiveItem::Sorting(it) => EditorSurface {
            kind: Some(ItemKind::Sorting),
            title: "Sorting",
            fields: vec![
                FieldSpec::new("prompt", "Prompt", FieldKind::Text, text(&it.prompt)),
                FieldSpec::new(
                    "items",
                    "Items in correct order",
                    FieldKind::WordList,
                    serde_json::to_value(&it.items).unwrap_or_default(),
                ),
            ],
        },
        InteractiveItem::Hotspot(it) => EditorSurface {
            kind: Some(ItemKind::Hotspot),
            title: "Hotspot",
            fields: vec![
                FieldSpec::new("imageUrl", "Image URL", FieldKind::ImageUrl, text(&it.image_url)),
                FieldSpec::new("label", "Marker label", FieldKind::Text, text(&it.label)),
                FieldSpec::new("x", "X (% of image)", FieldKind::Number, it.x.into()),
                FieldSpec::new("y", "Y (% of image)", FieldKind::Number, it.y.into()),
            ],
        },
        InteractiveItem::Timeline(it) => EditorSurface {
            kind: Some(ItemKind::Timeline),
            title: "Timeline",
            fields: vec![
                FieldSpec::new("prompt", "Prompt", FieldKind::Text, text(&it.prompt)),
                FieldSpec::new(
                    "events",
                    "Events",
                    FieldKind::EventList,
                    serde_json::to_value(&it.events).unwrap_or_default(),
                ),
            ],
        },
        InteractiveItem::Flashcard(it) => EditorSurface {
            kind: Some(ItemKind::Flashcard),
            title: "Flashcard",
            fields: vec![
                FieldSpec::new("front", "Front", FieldKind::TextArea, text(&it.front)),
                FieldSpec::new("back", "Back", FieldKind::TextArea, text(&it.back)),
                FieldSpec::new("audioUrl", "Audio URL", FieldKind::AudioUrl, text(&it.audio_url)),
            ],
        },
        InteractiveItem::Pronunciation(it) => EditorSurface {
            kind: Some(ItemKind::Pronunciation),
            title: "Pronunciation",
            fields: vec![
                FieldSpec::new("text", "Text to pronounce", FieldKind::Text, text(&it.text)),
                FieldSpec::new(
                    "audioUrl",
                    "Reference audio URL",
                    FieldKind::AudioUrl,
                    text(&it.audio_url),
                ),
                FieldSpec::new(
                    "reading",
                    "Reading (kana)",
                    FieldKind::Text,
                    it.reading.as_deref().map(text).unwrap_or(Value::Null),
                ),
            ],
        },
        InteractiveItem::Listening(it) => EditorSurface {
            kind: Some(ItemKind::Listening),
            title: "Listening",
            fields: vec![
                FieldSpec::new("audioUrl", "Audio URL", FieldKind::AudioUrl, text(&it.audio_url)),
                FieldSpec::new("question", "Question", FieldKind::Text, text(&it.question)),
                FieldSpec::new(
                    "options",
                    "Answer options",
                    FieldKind::OptionList,
                    serde_json::to_value(&it.options).unwrap_or_default(),
                ),
                FieldSpec::new(
                    "correct",
                    "Correct option",
                    FieldKind::Number,
                    (it.correct as u64).into(),
                ),
            ],
        },
        InteractiveItem::SentenceBuilder(it) => EditorSurface {
            kind: Some(ItemKind::SentenceBuilder),
            title: "Sentence Builder",
            fields: vec![
                FieldSpec::new(
                    "translation",
                    "Translation",
                    FieldKind::Text,
                    text(&it.translation),
                ),
                FieldSpec::new(
                    "words",
                    "Words in order",
                    FieldKind::WordList,
                    serde_json::to_value(&it.words).unwrap_or_default(),
                ),
                FieldSpec::new(
                    "distractors",
                    "Distractor words",
                    FieldKind::WordList,
                    serde_json::to_value(&it.distractors).unwrap_or_default(),
                ),
            ],
        },
        InteractiveItem::Unknown(raw) => EditorSurface {
            kind: None,
            title: "Unknown exercise",
            fields: vec![FieldSpec::new(
                "raw",
                "Raw item JSON",
                FieldKind::RawJson,
                Value::Object(raw.clone()),
            )],
        },
    }
}

/// Merges a partial update into the item. Only the fields present in
/// the patch change; the discriminant may never change (replacing the
/// item via [`replace_item`] is the type-change path).
pub fn apply_update(item: &mut InteractiveItem, patch: &Map<String, Value>) -> Result<(), UpdateError> {
    let current_tag = match &*item {
        InteractiveItem::Unknown(raw) => raw.get("type").cloned(),
        known => known
            .kind()
            .map(|kind| Value::String(kind.as_str().to_string())),
    };
    if let Some(patched_type) = patch.get("type") {
        if current_tag.as_ref() != Some(patched_type) {
            return Err(UpdateError::TypeChange);
        }
    }

    let mut merged = match serde_json::to_value(&*item) {
        Ok(Value::Object(map)) => map,
        Ok(other) => return Err(UpdateError::Shape(format!("item is not an object: {}", other))),
        Err(e) => return Err(UpdateError::Shape(e.to_string())),
    };
    for (key, value) in patch {
        if key == "type" {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }

    let updated: InteractiveItem = serde_json::from_value(Value::Object(merged))
        .map_err(|e| UpdateError::Shape(e.to_string()))?;
    // A patch with wrong field types would demote a known variant to
    // Unknown; treat that as a shape error instead of losing the type.
    if updated.kind() != item.kind() {
        return Err(UpdateError::Shape(
            "patched fields do not match the exercise shape".to_string(),
        ));
    }
    *item = updated;
    Ok(())
}

/// Replaces the item with a blank template of another kind. This is
/// the only sanctioned way to change an item's exercise type.
pub fn replace_item(slot: &mut InteractiveItem, kind: ItemKind) -> InteractiveItem {
    std::mem::replace(slot, InteractiveItem::blank(kind))
}

/// Scoped local buffer for a text input: keystrokes mutate the draft
/// only, and the shared state is written once, on blur or explicit
/// save. Avoids the feedback loop where a shared-state update
/// re-renders the input and fights the cursor.
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    committed: String,
    draft: String,
}

impl EditBuffer {
    pub fn new(initial: &str) -> Self {
        Self {
            committed: initial.to_string(),
            draft: initial.to_string(),
        }
    }

    /// Keystroke: replaces the uncommitted draft.
    pub fn input(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Blur or explicit save: returns the newly committed value only
    /// when it actually changed.
    pub fn commit(&mut self) -> Option<&str> {
        if self.draft == self.committed {
            return None;
        }
        self.committed = self.draft.clone();
        Some(&self.committed)
    }

    /// Closing the dialog discards the uncommitted draft.
    pub fn cancel(&mut self) {
        self.draft = self.committed.clone();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordField {
    EnglishText,
    JapaneseText,
    EnglishAudioUrl,
    JapaneseAudioUrl,
    EnglishSentence,
    JapaneseSentence,
    JapaneseSentenceAudioUrl,
}

/// Positional editing over a keyword list: add appends a blank
/// template, remove shifts subsequent indexes, and fields commit one
/// at a time (the blur side of an [`EditBuffer`]).
#[derive(Debug)]
pub struct KeywordListEditor<'a> {
    keywords: &'a mut Vec<Keyword>,
}

impl<'a> KeywordListEditor<'a> {
    pub fn new(keywords: &'a mut Vec<Keyword>) -> Self {
        Self { keywords }
    }

    /// Appends an empty template and returns its index.
    pub fn add(&mut self) -> usize {
        self.keywords.push(Keyword::blank());
        self.keywords.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<Keyword> {
        if index < self.keywords.len() {
            Some(self.keywords.remove(index))
        } else {
            None
        }
    }

    /// Commits a single field; out-of-range indexes are ignored
    /// (the row may have been removed while the input was focused).
    pub fn commit_field(&mut self, index: usize, field: KeywordField, value: &str) -> bool {
        let Some(keyword) = self.keywords.get_mut(index) else {
            return false;
        };
        let optional = |v: &str| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };
        match field {
            KeywordField::EnglishText => keyword.english_text = value.to_string(),
            KeywordField::JapaneseText => keyword.japanese_text = value.to_string(),
            KeywordField::EnglishAudioUrl => keyword.english_audio_url = value.to_string(),
            KeywordField::JapaneseAudioUrl => keyword.japanese_audio_url = value.to_string(),
            KeywordField::EnglishSentence => keyword.english_sentence = optional(value),
            KeywordField::JapaneseSentence => keyword.japanese_sentence = optional(value),
            KeywordField::JapaneseSentenceAudioUrl => {
                keyword.japanese_sentence_audio_url = optional(value)
            }
        }
        true
    }
}
