//! Classified mentions of noun phrases and names.

use serde::{Deserialize, Serialize};

use super::{clamp_confidence, generate_id, Attributes, TextSpan};

/// Taxonomy assignment for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub class_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub metadata: Attributes,
}

impl Classification {
    /// Build a classification, clamping `confidence` into `[0, 1]`.
    pub fn new(class_type: impl Into<String>, confidence: f64, metadata: Attributes) -> Self {
        Self {
            class_type: class_type.into(),
            confidence: clamp_confidence(confidence),
            metadata,
        }
    }
}

/// A mention of something in the source text, with every place it occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    id: String,
    text: String,
    spans: Vec<TextSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
    #[serde(default)]
    attributes: Attributes,
}

impl Entity {
    /// Create an entity with a freshly generated id.
    pub fn new(text: impl Into<String>, spans: Vec<TextSpan>) -> Self {
        Self::with_id(generate_id("entity"), text, spans)
    }

    pub fn with_id(id: impl Into<String>, text: impl Into<String>, spans: Vec<TextSpan>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            spans,
            classification: None,
            attributes: Attributes::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    /// Classification type, if any.
    pub fn class_type(&self) -> Option<&str> {
        self.classification.as_ref().map(|c| c.class_type.as_str())
    }

    /// Assign a classification. The confidence is clamped into `[0, 1]`.
    pub fn set_classification(
        &mut self,
        class_type: impl Into<String>,
        confidence: f64,
        metadata: Attributes,
    ) {
        self.classification = Some(Classification::new(class_type, confidence, metadata));
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn first_span(&self) -> Option<&TextSpan> {
        self.spans.first()
    }

    /// Sum of the lengths of every span.
    pub fn total_length(&self) -> usize {
        self.spans.iter().map(TextSpan::len).sum()
    }
}
