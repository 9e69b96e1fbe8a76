use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured record extracted from a model's description of an image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAnalysis {
    /// One-paragraph summary of the image
    #[serde(default)]
    pub description: String,
    /// Bullet-style findings, in the order the model gave them
    #[serde(default)]
    pub key_observations: Vec<String>,
    /// Detected subjects/objects
    #[serde(default)]
    pub objects: Vec<String>,
    /// Keyword labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// Confidence score (0-100); 0 when the model gave none
    #[serde(default)]
    pub confidence: i64,
    /// The exact text the record was built from
    #[serde(default)]
    pub raw_text: String,
    /// Keys from a structured response that have no slot above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedAnalysis {
    /// All-default record carrying only the original text
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Default::default()
        }
    }

    /// Whether anything beyond `raw_text` was extracted
    pub fn has_structure(&self) -> bool {
        !self.description.is_empty()
            || !self.key_observations.is_empty()
            || !self.objects.is_empty()
            || !self.tags.is_empty()
            || self.confidence != 0
            || !self.extra.is_empty()
    }
}
