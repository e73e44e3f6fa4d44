//! Directed, labeled, confidence-scored links between entities.

use serde::{Deserialize, Serialize};

use super::{clamp_confidence, generate_id, Attributes};

/// Threshold used by [`Relation::is_high_confidence`] callers that have no
/// opinion of their own.
pub const DEFAULT_HIGH_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    id: String,
    source_entity_id: String,
    target_entity_id: String,
    label: String,
    confidence: f64,
    #[serde(default)]
    metadata: Attributes,
}

impl Relation {
    /// Create a relation with a freshly generated id. Confidence is clamped.
    pub fn new(
        source_entity_id: impl Into<String>,
        target_entity_id: impl Into<String>,
        label: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self::with_id(
            generate_id("relation"),
            source_entity_id,
            target_entity_id,
            label,
            confidence,
        )
    }

    pub fn with_id(
        id: impl Into<String>,
        source_entity_id: impl Into<String>,
        target_entity_id: impl Into<String>,
        label: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source_entity_id: source_entity_id.into(),
            target_entity_id: target_entity_id.into(),
            label: label.into(),
            confidence: clamp_confidence(confidence),
            metadata: Attributes::new(),
        }
    }

    /// Builder-style metadata attachment.
    pub fn with_metadata(mut self, metadata: Attributes) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_entity_id(&self) -> &str {
        &self.source_entity_id
    }

    pub fn target_entity_id(&self) -> &str {
        &self.target_entity_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = clamp_confidence(confidence);
    }

    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn is_high_confidence(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped_on_every_write() {
        let mut relation = Relation::new("a", "b", "causes", 1.7);
        assert_eq!(relation.confidence(), 1.0);
        relation.set_confidence(-3.0);
        assert_eq!(relation.confidence(), 0.0);
        relation.set_confidence(0.55);
        assert_eq!(relation.confidence(), 0.55);
    }

    #[test]
    fn high_confidence_threshold() {
        let relation = Relation::new("a", "b", "causes", 0.8);
        assert!(relation.is_high_confidence(DEFAULT_HIGH_CONFIDENCE));
        assert!(!relation.is_high_confidence(0.9));
    }

    #[test]
    fn metadata_mutators() {
        let mut relation = Relation::new("a", "b", "supports", 0.7);
        relation.set_metadata("patternMatch", "supports");
        assert_eq!(
            relation.metadata_value("patternMatch"),
            Some(&serde_json::json!("supports"))
        );
        let json = serde_json::to_value(&relation).unwrap();
        assert_eq!(json["sourceEntityId"], "a");
        assert_eq!(json["targetEntityId"], "b");
    }
}
