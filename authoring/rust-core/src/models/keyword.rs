use serde::{Deserialize, Serialize};

/// A vocabulary entry on a KEYWORDS lesson. Identity is positional:
/// keywords carry no id, and removing one shifts everything after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    #[serde(default)]
    pub english_text: String,
    #[serde(default)]
    pub japanese_text: String,
    #[serde(default)]
    pub english_audio_url: String,
    #[serde(default)]
    pub japanese_audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese_sentence_audio_url: Option<String>,
}

impl Keyword {
    /// Empty template appended by the "add" action.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn has_required_text(&self) -> bool {
        !self.japanese_text.trim().is_empty() && !self.english_text.trim().is_empty()
    }

    pub fn missing_audio(&self) -> bool {
        self.japanese_audio_url.trim().is_empty() || self.english_audio_url.trim().is_empty()
    }
}
