//! Pattern-based relation inference between co-occurring entities.
//!
//! For every sentence, every pair of entities with a span inside it, and every
//! pair of their spans within `max_distance` characters of each other, the text strictly
//! between the two spans is searched with each cue pattern. Every matching
//! pattern yields one relation; nothing is deduplicated.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ExtractError, ExtractResult};
use crate::model::{Attributes, Entity, Relation, TextSpan};
use crate::segment::{RuleSegmenter, Segmenter};

use super::patterns::{
    DEFAULT_PATTERNS, DIFFUSE_CONTEXT_CHARS, DIFFUSE_CONTEXT_PENALTY, STRONG_CUES,
    STRONG_CUE_BONUS,
};

/// Which way a matched cue points.
///
/// `Bidirectional` materializes a single forward edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Bidirectional,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
            Self::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

/// Serializable description of a cue pattern (config files, CLI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub pattern: String,
    pub label: String,
    pub confidence: f64,
    #[serde(default = "default_direction")]
    pub direction: Direction,
}

fn default_direction() -> Direction {
    Direction::Forward
}

/// A compiled cue pattern.
#[derive(Debug, Clone)]
pub struct RelationPattern {
    regex: Regex,
    label: String,
    confidence: f64,
    direction: Direction,
}

impl RelationPattern {
    /// Compile a case-insensitive cue pattern.
    pub fn new(
        pattern: &str,
        label: impl Into<String>,
        confidence: f64,
        direction: Direction,
    ) -> ExtractResult<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ExtractError::ConfidenceOutOfRange {
                confidence,
            });
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ExtractError::InvalidRelationPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            regex,
            label: label.into(),
            confidence,
            direction,
        })
    }

    pub fn from_spec(spec: &PatternSpec) -> ExtractResult<Self> {
        Self::new(&spec.pattern, spec.label.clone(), spec.confidence, spec.direction)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn to_spec(&self) -> PatternSpec {
        PatternSpec {
            pattern: self.pattern().to_string(),
            label: self.label.clone(),
            confidence: self.confidence,
            direction: self.direction,
        }
    }
}

/// Windowing and filtering for relation extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationOptions {
    /// Maximum distance in characters between the starts of two spans.
    pub max_distance: usize,
    /// Relations scoring below this are discarded.
    pub min_confidence: f64,
    /// Appended after the default patterns.
    pub custom_patterns: Vec<PatternSpec>,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            max_distance: 100,
            min_confidence: 0.3,
            custom_patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelationExtractor {
    segmenter: Arc<dyn Segmenter>,
    max_distance: usize,
    min_confidence: f64,
    patterns: Vec<RelationPattern>,
}

impl Default for RelationExtractor {
    fn default() -> Self {
        Self {
            segmenter: Arc::new(RuleSegmenter::new()),
            max_distance: RelationOptions::default().max_distance,
            min_confidence: RelationOptions::default().min_confidence,
            patterns: default_patterns(),
        }
    }
}

/// The default cue table, compiled.
pub fn default_patterns() -> Vec<RelationPattern> {
    DEFAULT_PATTERNS
        .iter()
        .map(|&(pattern, label, confidence, direction)| RelationPattern {
            regex: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("default relation patterns are valid"),
            label: label.to_string(),
            confidence,
            direction,
        })
        .collect()
}

impl RelationExtractor {
    /// Build an extractor with the default cue table plus `options.custom_patterns`.
    pub fn new(segmenter: Arc<dyn Segmenter>, options: RelationOptions) -> ExtractResult<Self> {
        let mut patterns = default_patterns();
        for spec in &options.custom_patterns {
            patterns.push(RelationPattern::from_spec(spec)?);
        }
        Ok(Self {
            segmenter,
            max_distance: options.max_distance,
            min_confidence: options.min_confidence,
            patterns,
        })
    }

    /// Append a pattern; it is evaluated after every existing one.
    pub fn add_custom_pattern(&mut self, pattern: RelationPattern) {
        self.patterns.push(pattern);
    }

    /// Defaults followed by custom patterns, in evaluation order.
    pub fn available_patterns(&self) -> &[RelationPattern] {
        &self.patterns
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Infer relations between `entities` within each sentence of `text`.
    pub fn extract_relations(&self, text: &str, entities: &[Entity]) -> ExtractResult<Vec<Relation>> {
        let mut relations = Vec::new();

        for sentence in self.segmenter.sentences(text)? {
            // Repeated sentences all anchor to the first occurrence.
            let Some(start) = text.find(sentence.as_str()) else {
                tracing::trace!(sentence = %sentence, "sentence not found in text, skipped");
                continue;
            };
            let end = start + sentence.len();

            // An entity takes part if any of its spans lies in the sentence;
            // all of its spans are then paired.
            let members: Vec<&Entity> = entities
                .iter()
                .filter(|entity| entity.spans().iter().any(|s| s.within(start, end)))
                .collect();
            if members.len() < 2 {
                continue;
            }

            for (i, e1) in members.iter().enumerate() {
                for e2 in &members[i + 1..] {
                    for s1 in e1.spans() {
                        for s2 in e2.spans() {
                            self.relate(text, (*e1, s1), (*e2, s2), &mut relations);
                        }
                    }
                }
            }
        }

        let found = relations.len();
        relations.retain(|r| r.confidence() >= self.min_confidence);
        tracing::debug!(
            candidates = found,
            relations = relations.len(),
            min_confidence = self.min_confidence,
            "extracted relations"
        );
        Ok(relations)
    }

    fn relate(
        &self,
        text: &str,
        a: (&Entity, &TextSpan),
        b: (&Entity, &TextSpan),
        out: &mut Vec<Relation>,
    ) {
        // Equal starts put the second entity first.
        let (first, second) = if a.1.start < b.1.start { (a, b) } else { (b, a) };
        if char_distance(text, first.1.start, second.1.start) > self.max_distance {
            return;
        }
        let between = if first.1.end <= second.1.start {
            &text[first.1.end..second.1.start]
        } else {
            ""
        };

        for pattern in &self.patterns {
            let Some(m) = pattern.regex.find(between) else {
                continue;
            };
            let (source, target) = match pattern.direction {
                Direction::Forward | Direction::Bidirectional => (first.0, second.0),
                Direction::Backward => (second.0, first.0),
            };
            let context = between.trim();
            let metadata: Attributes = [
                ("patternMatch".to_string(), json!(m.as_str())),
                ("context".to_string(), json!(context)),
                ("extractionMethod".to_string(), json!("linguistic_pattern")),
            ]
            .into_iter()
            .collect();
            out.push(
                Relation::new(
                    source.id(),
                    target.id(),
                    pattern.label.clone(),
                    score(pattern.confidence, between),
                )
                .with_metadata(metadata),
            );
        }
    }
}

/// Number of characters between two byte offsets (`from <= to`) on char boundaries.
fn char_distance(text: &str, from: usize, to: usize) -> usize {
    text.get(from..to).map_or(usize::MAX, |s| s.chars().count())
}

/// Base confidence adjusted for strong cues and diffuse context.
fn score(base: f64, between: &str) -> f64 {
    let lowered = between.to_lowercase();
    let mut confidence = base;
    if STRONG_CUES.iter().any(|cue| lowered.contains(cue)) {
        confidence = (confidence + STRONG_CUE_BONUS).min(1.0);
    }
    if between.trim().chars().count() > DIFFUSE_CONTEXT_CHARS {
        confidence *= DIFFUSE_CONTEXT_PENALTY;
    }
    confidence
}
