//! Entity extraction: segment, filter, locate, classify, deduplicate.

use std::collections::HashSet;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ExtractError, ExtractResult};
use crate::model::{Attributes, Entity, TextSpan};
use crate::segment::{RuleSegmenter, Segmenter};
use crate::taxonomy::Taxonomy;

/// Classification type assigned to people and organisations.
pub const STAKEHOLDER_TYPE: &str = "stakeholder";

const PERSON_CONFIDENCE: f64 = 0.9;
const ORGANIZATION_CONFIDENCE: f64 = 0.8;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

/// Filters and extra patterns for entity extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Minimum trimmed length in characters.
    pub min_entity_length: usize,
    /// Maximum trimmed length in characters.
    pub max_entity_length: usize,
    pub include_pronouns: bool,
    /// Regex bodies scanned case-insensitively over the whole text.
    pub custom_patterns: Vec<String>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            min_entity_length: 2,
            max_entity_length: 50,
            include_pronouns: false,
            custom_patterns: Vec::new(),
        }
    }
}

/// How a candidate group is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    NounPhrase,
    Person,
    Place,
    Organization,
}

/// Produces deduplicated, span-located, classified entities from raw text.
///
/// Options and custom patterns are fixed at construction, so one extractor can
/// be reused across any number of texts.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    taxonomy: Arc<Taxonomy>,
    segmenter: Arc<dyn Segmenter>,
    options: ExtractionOptions,
    custom_patterns: Vec<Regex>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self {
            taxonomy: Arc::new(Taxonomy::default()),
            segmenter: Arc::new(RuleSegmenter::new()),
            options: ExtractionOptions::default(),
            custom_patterns: Vec::new(),
        }
    }
}

impl EntityExtractor {
    /// Build an extractor. Fails if any custom pattern is not a valid regex.
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        segmenter: Arc<dyn Segmenter>,
        options: ExtractionOptions,
    ) -> ExtractResult<Self> {
        let custom_patterns = options
            .custom_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ExtractError::InvalidEntityPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<ExtractResult<Vec<_>>>()?;
        Ok(Self {
            taxonomy,
            segmenter,
            options,
            custom_patterns,
        })
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    /// Extract entities, longest surface form first.
    pub fn extract_entities(&self, text: &str) -> ExtractResult<Vec<Entity>> {
        let candidates = self.segmenter.candidates(text)?;
        let mut entities = Vec::new();

        let groups = [
            (&candidates.noun_phrases, Source::NounPhrase),
            (&candidates.people, Source::Person),
            (&candidates.places, Source::Place),
            (&candidates.organizations, Source::Organization),
        ];
        for (group, source) in groups {
            for candidate in group {
                if let Some(entity) = self.build_entity(text, candidate, source) {
                    entities.push(entity);
                }
            }
        }

        for pattern in &self.custom_patterns {
            for m in pattern.find_iter(text) {
                if m.is_empty() || !self.is_valid(m.as_str()) {
                    continue;
                }
                let mut entity = Entity::new(
                    m.as_str(),
                    vec![TextSpan::new(m.start(), m.end(), m.as_str())],
                );
                self.classify_with_taxonomy(&mut entity);
                entities.push(entity);
            }
        }

        let found = entities.len();
        let entities = deduplicate(entities);
        tracing::debug!(candidates = found, entities = entities.len(), "extracted entities");
        Ok(entities)
    }

    fn build_entity(&self, text: &str, candidate: &str, source: Source) -> Option<Entity> {
        let candidate = candidate.trim();
        if !self.is_valid(candidate) {
            return None;
        }
        let spans = find_spans(text, candidate);
        if spans.is_empty() {
            tracing::trace!(candidate, "candidate not found in text, dropped");
            return None;
        }

        let mut entity = Entity::new(candidate, spans);
        match source {
            Source::Person => entity.set_classification(
                STAKEHOLDER_TYPE,
                PERSON_CONFIDENCE,
                entity_type("person"),
            ),
            Source::Organization => entity.set_classification(
                STAKEHOLDER_TYPE,
                ORGANIZATION_CONFIDENCE,
                entity_type("organization"),
            ),
            Source::NounPhrase | Source::Place => self.classify_with_taxonomy(&mut entity),
        }
        Some(entity)
    }

    fn classify_with_taxonomy(&self, entity: &mut Entity) {
        if let Some(m) = self.taxonomy.classify_text(entity.text()) {
            let metadata: Attributes = [
                ("taxonomyClass".to_string(), json!(m.class.name)),
                ("description".to_string(), json!(m.class.description)),
            ]
            .into_iter()
            .collect();
            let class_id = m.class.id.clone();
            entity.set_classification(class_id, m.confidence, metadata);
        }
    }

    /// Length, stopword and pronoun filter on the trimmed candidate.
    fn is_valid(&self, candidate: &str) -> bool {
        let trimmed = candidate.trim();
        let len = trimmed.chars().count();
        if len < self.options.min_entity_length || len > self.options.max_entity_length {
            return false;
        }
        let lower = trimmed.to_lowercase();
        if STOPWORDS.contains(&lower.as_str()) {
            return false;
        }
        self.options.include_pronouns || !PRONOUNS.contains(&lower.as_str())
    }
}

fn entity_type(kind: &str) -> Attributes {
    [("entityType".to_string(), json!(kind))].into_iter().collect()
}

/// Every case-insensitive literal occurrence of `needle` in `text`.
fn find_spans(text: &str, needle: &str) -> Vec<TextSpan> {
    let Ok(re) = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };
    re.find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| TextSpan::new(m.start(), m.end(), m.as_str()))
        .collect()
}

/// Longest surface form first (stable), then first seen per lowercase key.
fn deduplicate(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_by_key(|e| std::cmp::Reverse(e.text().chars().count()));
    let mut seen = HashSet::new();
    entities.retain(|e| seen.insert(e.text().to_lowercase()));
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(options: ExtractionOptions) -> EntityExtractor {
        EntityExtractor::new(
            Arc::new(Taxonomy::default()),
            Arc::new(RuleSegmenter::new()),
            options,
        )
        .unwrap()
    }

    #[test]
    fn scenario_sentence() {
        let text = "Sarah Johnson led the engineering team to improve customer metrics in Q2 2024.";
        let entities = EntityExtractor::default().extract_entities(text).unwrap();
        let texts: Vec<_> = entities.iter().map(Entity::text).collect();
        assert_eq!(
            texts,
            ["engineering team", "customer metrics", "Sarah Johnson", "Q2 2024"]
        );

        let sarah = &entities[2];
        let class = sarah.classification().unwrap();
        assert_eq!(class.class_type, STAKEHOLDER_TYPE);
        assert_eq!(class.confidence, 0.9);
        assert_eq!(class.metadata["entityType"], "person");

        let q2 = &entities[3];
        assert_eq!(q2.class_type(), Some("time-period"));
        assert_eq!(
            q2.classification().unwrap().metadata["taxonomyClass"],
            "Time Period"
        );
        assert!(entities[0].classification().is_none());
    }

    #[test]
    fn organisations_get_lower_stakeholder_confidence() {
        let entities = EntityExtractor::default()
            .extract_entities("We partnered with Acme Corp last year.")
            .unwrap();
        let acme = entities.iter().find(|e| e.text() == "Acme Corp").unwrap();
        let class = acme.classification().unwrap();
        assert_eq!(class.confidence, 0.8);
        assert_eq!(class.metadata["entityType"], "organization");
    }

    #[test]
    fn spans_cover_every_occurrence_case_insensitively() {
        let text = "Churn is high. We reduce churn.";
        let entities = EntityExtractor::default().extract_entities(text).unwrap();
        let churn = entities
            .iter()
            .find(|e| e.text().eq_ignore_ascii_case("churn"))
            .unwrap();
        assert_eq!(churn.spans().len(), 2);
        for span in churn.spans() {
            assert_eq!(&text[span.start..span.end], span.text);
            assert!(span.text.eq_ignore_ascii_case("churn"));
        }
    }

    #[test]
    fn stopwords_yield_nothing() {
        let entities = EntityExtractor::default()
            .extract_entities("the and or but in on at to for of with by")
            .unwrap();
        assert!(entities.is_empty());
        assert!(EntityExtractor::default().extract_entities("").unwrap().is_empty());
    }

    #[test]
    fn custom_pattern_entities() {
        let ex = extractor(ExtractionOptions {
            custom_patterns: vec![r"\d+%".into()],
            ..Default::default()
        });
        let entities = ex.extract_entities("Performance improved by 25%.").unwrap();
        let pct = entities.iter().find(|e| e.text() == "25%").unwrap();
        assert_eq!(pct.spans(), [TextSpan::new(24, 27, "25%")]);
    }

    #[test]
    fn invalid_custom_pattern_fails_construction() {
        let err = EntityExtractor::new(
            Arc::new(Taxonomy::default()),
            Arc::new(RuleSegmenter::new()),
            ExtractionOptions {
                custom_patterns: vec!["(".into()],
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidEntityPattern { .. }));
    }

    #[test]
    fn length_filter_applies() {
        let ex = extractor(ExtractionOptions {
            max_entity_length: 10,
            ..Default::default()
        });
        let entities = ex
            .extract_entities("The engineering team shipped the tool.")
            .unwrap();
        assert!(entities.iter().all(|e| e.text().chars().count() <= 10));
        assert!(entities.iter().any(|e| e.text() == "tool"));
    }

    #[test]
    fn pronouns_are_filtered_unless_requested() {
        let ex = extractor(ExtractionOptions {
            custom_patterns: vec![r"\bthey\b".into()],
            ..Default::default()
        });
        assert!(ex.extract_entities("They grew.").unwrap().is_empty());

        let ex = extractor(ExtractionOptions {
            custom_patterns: vec![r"\bthey\b".into()],
            include_pronouns: true,
            ..Default::default()
        });
        let entities = ex.extract_entities("They grew.").unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text(), "They");
    }

    #[test]
    fn repeated_extraction_gives_the_same_entities() {
        let text = "Sarah Johnson and the design team launched the insights feature in Q3. \
                    The design team will target enterprise customers.";
        let ex = EntityExtractor::default();
        let keys = |entities: Vec<Entity>| -> HashSet<(String, Option<String>)> {
            entities
                .iter()
                .map(|e| (e.text().to_string(), e.class_type().map(str::to_string)))
                .collect()
        };
        let first = ex.extract_entities(text).unwrap();
        let count = first.len();
        let first = keys(first);
        assert_eq!(first.len(), count);
        assert_eq!(keys(ex.extract_entities(text).unwrap()), first);
    }

    #[test]
    fn dedup_prefers_longest_then_first_seen() {
        let entities = vec![
            Entity::new("team", vec![TextSpan::new(0, 4, "team")]),
            Entity::new("Team", vec![TextSpan::new(10, 14, "Team")]),
            Entity::new("engineering team", vec![TextSpan::new(20, 36, "engineering team")]),
        ];
        let first_team_id = entities[0].id().to_string();
        let out = deduplicate(entities);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text(), "engineering team");
        assert_eq!(out[1].id(), first_team_id);
    }
}
