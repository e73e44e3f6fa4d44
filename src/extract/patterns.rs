//! Default linguistic cue patterns for relation inference.
//!
//! Order matters: patterns are evaluated top to bottom and each match yields
//! its own relation, so the table order is the relation emission order.

use super::relation::Direction;

/// `(regex body, label, base confidence, direction)`.
pub(crate) const DEFAULT_PATTERNS: &[(&str, &str, f64, Direction)] = &[
    // Temporal
    (r"\b(during|in|throughout)\b", "occurs_during", 0.8, Direction::Forward),
    (r"\b(after|following|subsequent to)\b", "follows", 0.7, Direction::Forward),
    (r"\b(before|prior to|preceding)\b", "precedes", 0.7, Direction::Forward),
    // Causal
    (r"\b(caused by|due to|because of|resulted from)\b", "caused_by", 0.8, Direction::Backward),
    (r"\b(led to|resulted in|caused|enabled)\b", "causes", 0.8, Direction::Forward),
    (r"\b(improve[sd]?|enhance[sd]?|increase[sd]?)\b", "improves", 0.6, Direction::Forward),
    // Organizational
    (r"\b(part of|member of|within|belongs to)\b", "part_of", 0.7, Direction::Forward),
    (r"\b(includes|contains|comprises)\b", "contains", 0.7, Direction::Forward),
    (r"\b(managed by|led by|under)\b", "managed_by", 0.8, Direction::Forward),
    // Dependency
    (r"\b(depends on|relies on|requires)\b", "depends_on", 0.8, Direction::Forward),
    (r"\b(supports|enables|facilitates)\b", "supports", 0.7, Direction::Forward),
    // Measurement
    (r"\b(measured by|tracked by|indicated by)\b", "measured_by", 0.8, Direction::Forward),
    (r"\b(measures|tracks|indicates)\b", "measures", 0.8, Direction::Backward),
    // Implementation
    (r"\b(implemented through|achieved via|using)\b", "implemented_through", 0.7, Direction::Forward),
    (r"\b(focuses on|targets|addresses)\b", "focuses_on", 0.6, Direction::Forward),
    // Weak association
    (r"\b(with|and|along with|together with)\b", "associated_with", 0.4, Direction::Bidirectional),
    (r"\b(related to|connected to|linked to)\b", "related_to", 0.5, Direction::Bidirectional),
];

/// Substrings of the between-text that boost a relation's confidence by 0.1.
pub(crate) const STRONG_CUES: &[&str] = &["because", "caused by", "resulted in", "led to", "due to"];

/// Confidence bonus when a strong cue is present.
pub(crate) const STRONG_CUE_BONUS: f64 = 0.1;

/// Trimmed between-texts longer than this (in chars) are penalised.
pub(crate) const DIFFUSE_CONTEXT_CHARS: usize = 50;

/// Multiplier applied to diffuse contexts.
pub(crate) const DIFFUSE_CONTEXT_PENALTY: f64 = 0.9;
