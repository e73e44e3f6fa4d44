//! Domain model: spans, entities, relations, narratives and their ontology projection.
//!
//! All types are plain data holders with identity, accessors and a camelCase
//! JSON projection. Free-form metadata is carried in [`Attributes`] bags.

pub mod entity;
pub mod narrative;
pub mod ontology;
pub mod relation;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub use entity::{Classification, Entity};
pub use narrative::Narrative;
pub use ontology::{Ontology, OntologyEdge, OntologyMetadata, OntologyNode};
pub use relation::{Relation, DEFAULT_HIGH_CONFIDENCE};

/// Open, string-keyed bag of loosely-typed values.
///
/// Ordered so JSON projections are reproducible.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// A half-open byte range into the source text plus the substring it covers.
///
/// Offsets always fall on `char` boundaries, so `&source[start..end]` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TextSpan {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the covered range in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether this span lies wholly inside `[start, end)`.
    pub fn within(&self, start: usize, end: usize) -> bool {
        self.start >= start && self.end <= end
    }
}

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Generate a process-unique identifier of the form `<prefix>-<millis>-<seq>`.
pub fn generate_id(prefix: &str) -> String {
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{prefix}-{millis}-{seq}")
}

/// Clamp a confidence value into `[0, 1]`. NaN collapses to 0.
pub(crate) fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let a = generate_id("entity");
        let b = generate_id("entity");
        assert_ne!(a, b);
        assert!(a.starts_with("entity-"));
    }

    #[test]
    fn clamp_handles_out_of_range_and_nan() {
        assert_eq!(clamp_confidence(1.5), 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
        assert_eq!(clamp_confidence(0.42), 0.42);
    }

    #[test]
    fn span_containment() {
        let span = TextSpan::new(4, 9, "hello");
        assert!(span.within(0, 9));
        assert!(!span.within(5, 20));
        assert_eq!(span.len(), 5);
    }
}
