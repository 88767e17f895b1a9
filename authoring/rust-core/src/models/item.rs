use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// One interactive exercise unit inside a quiz question list or a slide.
///
/// Internally tagged on `type`. The trailing [`InteractiveItem::Unknown`]
/// variant captures items written by a newer version of the tool without
/// losing their payload, so round-tripping foreign content is lossless.
/// The discriminant never changes after creation; switching exercise type
/// replaces the item via [`InteractiveItem::blank`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InteractiveItem {
    #[serde(rename = "drag-drop")]
    DragDrop(DragDropItem),
    #[serde(rename = "fill-blanks")]
    FillBlanks(FillBlanksItem),
    #[serde(rename = "matching")]
    Matching(MatchingItem),
    #[serde(rename = "sorting")]
    Sorting(SortingItem),
    #[serde(rename = "hotspot")]
    Hotspot(HotspotItem),
    #[serde(rename = "timeline")]
    Timeline(TimelineItem),
    #[serde(rename = "flashcard")]
    Flashcard(FlashcardItem),
    #[serde(rename = "pronunciation")]
    Pronunciation(PronunciationItem),
    #[serde(rename = "listening")]
    Listening(ListeningItem),
    #[serde(rename = "sentence-builder")]
    SentenceBuilder(SentenceBuilderItem),
    /// Unrecognized discriminant, preserved as-is.
    #[serde(untagged)]
    Unknown(Map<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    DragDrop,
    FillBlanks,
    Matching,
    Sorting,
    Hotspot,
    Timeline,
    Flashcard,
    Pronunciation,
    Listening,
    SentenceBuilder,
}

impl ItemKind {
    pub const ALL: [ItemKind; 10] = [
        ItemKind::DragDrop,
        ItemKind::FillBlanks,
        ItemKind::Matching,
        ItemKind::Sorting,
        ItemKind::Hotspot,
        ItemKind::Timeline,
        ItemKind::Flashcard,
        ItemKind::Pronunciation,
        ItemKind::Listening,
        ItemKind::SentenceBuilder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::DragDrop => "drag-drop",
            ItemKind::FillBlanks => "fill-blanks",
            ItemKind::Matching => "matching",
            ItemKind::Sorting => "sorting",
            ItemKind::Hotspot => "hotspot",
            ItemKind::Timeline => "timeline",
            ItemKind::Flashcard => "flashcard",
            ItemKind::Pronunciation => "pronunciation",
            ItemKind::Listening => "listening",
            ItemKind::SentenceBuilder => "sentence-builder",
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("Invalid exercise type: {}", value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDropPair {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDropItem {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub pairs: Vec<DragDropPair>,
}

/// Cloze sentence; blanks are marked with `___` and answered in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlanksItem {
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingPair {
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: String,
    #[serde(default)]
    pub audio_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingItem {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub pairs: Vec<MatchingPair>,
}

/// Items are stored in their correct order; the player shuffles them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingItem {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Marker on an image. `x`/`y` are percentages of the rendered image
/// (not the container), clamped to `[0, 100]` with 0.1 resolution by
/// the geometry engine, which is the only writer during a drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotItem {
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "center_percent")]
    pub x: f64,
    #[serde(default = "center_percent")]
    pub y: f64,
    #[serde(default)]
    pub label: String,
}

fn center_percent() -> f64 {
    50.0
}

impl Default for HotspotItem {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            x: center_percent(),
            y: center_percent(),
            label: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardItem {
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
    #[serde(default)]
    pub audio_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningItem {
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceBuilderItem {
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub distractors: Vec<String>,
}

impl InteractiveItem {
    /// Empty template for a freshly added item of the given kind.
    pub fn blank(kind: ItemKind) -> Self {
        match kind {
            ItemKind::DragDrop => InteractiveItem::DragDrop(DragDropItem::default()),
            ItemKind::FillBlanks => InteractiveItem::FillBlanks(FillBlanksItem::default()),
            ItemKind::Matching => InteractiveItem::Matching(MatchingItem::default()),
            ItemKind::Sorting => InteractiveItem::Sorting(SortingItem::default()),
            ItemKind::Hotspot => InteractiveItem::Hotspot(HotspotItem::default()),
            ItemKind::Timeline => InteractiveItem::Timeline(TimelineItem::default()),
            ItemKind::Flashcard => InteractiveItem::Flashcard(FlashcardItem::default()),
            ItemKind::Pronunciation => {
                InteractiveItem::Pronunciation(PronunciationItem::default())
            }
            ItemKind::Listening => InteractiveItem::Listening(ListeningItem::default()),
            ItemKind::SentenceBuilder => {
                InteractiveItem::SentenceBuilder(SentenceBuilderItem::default())
            }
        }
    }

    pub fn kind(&self) -> Option<ItemKind> {
        match self {
            InteractiveItem::DragDrop(_) => Some(ItemKind::DragDrop),
            InteractiveItem::FillBlanks(_) => Some(ItemKind::FillBlanks),
            InteractiveItem::Matching(_) => Some(ItemKind::Matching),
            InteractiveItem::Sorting(_) => Some(ItemKind::Sorting),
            InteractiveItem::Hotspot(_) => Some(ItemKind::Hotspot),
            InteractiveItem::Timeline(_) => Some(ItemKind::Timeline),
            InteractiveItem::Flashcard(_) => Some(ItemKind::Flashcard),
            InteractiveItem::Pronunciation(_) => Some(ItemKind::Pronunciation),
            InteractiveItem::Listening(_) => Some(ItemKind::Listening),
            InteractiveItem::SentenceBuilder(_) => Some(ItemKind::SentenceBuilder),
            InteractiveItem::Unknown(_) => None,
        }
    }

    /// Human-readable completeness problems, empty when the item is
    /// ready to publish. Unknown items are never flagged: a newer tool
    /// version owns their rules.
    pub fn completeness_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        match self {
            InteractiveItem::DragDrop(item) => {
                if item.pairs.is_empty() {
                    issues.push("Add at least one text/target pair".to_string());
                }
                for (i, pair) in item.pairs.iter().enumerate() {
                    if pair.text.trim().is_empty() || pair.target.trim().is_empty() {
                        issues.push(format!("Pair {} needs both text and target", i + 1));
                    }
                }
            }
            InteractiveItem::FillBlanks(item) => {
                if item.sentence.trim().is_empty() {
                    issues.push("Sentence is required".to_string());
                }
                let blanks = item.sentence.matches("___").count();
                if blanks == 0 {
                    issues.push("Mark at least one blank with ___".to_string());
                } else if blanks != item.answers.len() {
                    issues.push(format!(
                        "Sentence has {} blank(s) but {} answer(s)",
                        blanks,
                        item.answers.len()
                    ));
                }
            }
            InteractiveItem::Matching(item) => {
                if item.pairs.is_empty() {
                    issues.push("Add at least one matching pair".to_string());
                }
                for (i, pair) in item.pairs.iter().enumerate() {
                    if pair.left.trim().is_empty() || pair.right.trim().is_empty() {
                        issues.push(format!("Pair {} needs both sides", i + 1));
                    }
                }
            }
            InteractiveItem::Sorting(item) => {
                if item.items.len() < 2 {
                    issues.push("Add at least two items to sort".to_string());
                }
            }
            InteractiveItem::Hotspot(item) => {
                if item.image_url.trim().is_empty() {
                    issues.push("Image URL is required".to_string());
                }
                if !(0.0..=100.0).contains(&item.x) || !(0.0..=100.0).contains(&item.y) {
                    issues.push("Marker position is out of range".to_string());
                }
            }
            InteractiveItem::Timeline(item) => {
                if item.events.is_empty() {
                    issues.push("Add at least one event".to_string());
                }
                for (i, event) in item.events.iter().enumerate() {
                    if event.date.trim().is_empty() || event.title.trim().is_empty() {
                        issues.push(format!("Event {} needs a date and a title", i + 1));
                    }
                }
            }
            InteractiveItem::Flashcard(item) => {
                if item.front.trim().is_empty() || item.back.trim().is_empty() {
                    issues.push("Front and back are both required".to_string());
                }
            }
            InteractiveItem::Pronunciation(item) => {
                if item.text.trim().is_empty() {
                    issues.push("Text to pronounce is required".to_string());
                }
                if item.audio_url.trim().is_empty() {
                    issues.push("Reference audio URL is required".to_string());
                }
            }
            InteractiveItem::Listening(item) => {
                if item.audio_url.trim().is_empty() {
                    issues.push("Audio URL is required".to_string());
                }
                if item.options.iter().filter(|o| !o.trim().is_empty()).count() < 2 {
                    issues.push("Provide at least two non-empty options".to_string());
                }
                if item.correct >= item.options.len() {
                    issues.push("Correct option index is out of range".to_string());
                }
            }
            InteractiveItem::SentenceBuilder(item) => {
                if item.words.is_empty() {
                    issues.push("Add the words of the sentence".to_string());
                }
            }
            InteractiveItem::Unknown(_) => {}
        }
        issues
    }
}

/// Payload of a QUIZ lesson. The sibling `passing_score` lives on the
/// lesson record, not in here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizContent {
    #[serde(default)]
    pub questions: Vec<InteractiveItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

/// Payload of a SLIDES lesson.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideContent {
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// One slide: its items plus a loosely typed settings bag. Valid keys
/// depend on the slide's dominant exercise type; unknown keys are
/// preserved so new exercise types need no schema migration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    #[serde(default)]
    pub items: Vec<InteractiveItem>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl Slide {
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn set_setting(&mut self, key: &str, value: Value) {
        self.settings.insert(key.to_string(), value);
    }

    /// Marker diameter in pixels for hotspot slides.
    pub fn hotspot_marker_size(&self) -> f64 {
        self.settings
            .get("hotspotMarkerSize")
            .and_then(Value::as_f64)
            .unwrap_or(32.0)
    }

    /// Whether item order is shuffled in the player.
    pub fn shuffle_items(&self) -> bool {
        self.settings
            .get("shuffleItems")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
