//! Narrative processing pipeline.
//!
//! A [`NarrativeProcessor`] holds read-only configuration (taxonomy, segmenter,
//! extraction options) and runs each document through the same stages:
//!
//! 1. **Narrative**: wrap the text with an id
//! 2. **Entities**: extract, classify and append
//! 3. **Relations**: infer between co-occurring entities and append
//! 4. **Ontology**: project the narrative into a graph
//! 5. **Stats**: counts, wall-clock time and classification coverage
//!
//! Batches run strictly sequentially and abort at the first failing item.

pub mod stats;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::NarrativeResult;
use crate::extract::{EntityExtractor, ExtractionOptions, RelationExtractor, RelationOptions};
use crate::model::{Attributes, Narrative, Ontology};
use crate::segment::{RuleSegmenter, Segmenter};
use crate::taxonomy::Taxonomy;

pub use stats::{AggregateStats, ProcessingStats};

/// Everything produced for one narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub narrative: Narrative,
    pub ontology: Ontology,
    pub stats: ProcessingStats,
}

/// Construction options for [`NarrativeProcessor`].
#[derive(Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// Defaults to the bundled taxonomy.
    pub taxonomy: Option<Arc<Taxonomy>>,
    /// Defaults to [`RuleSegmenter`].
    pub segmenter: Option<Arc<dyn Segmenter>>,
    pub entities: ExtractionOptions,
    pub relations: RelationOptions,
}

/// Orchestrates extraction, narrative assembly and ontology projection.
#[derive(Debug, Clone)]
pub struct NarrativeProcessor {
    taxonomy: Arc<Taxonomy>,
    entity_extractor: EntityExtractor,
    relation_extractor: RelationExtractor,
}

impl Default for NarrativeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrativeProcessor {
    /// Processor with the default taxonomy, segmenter and options.
    pub fn new() -> Self {
        let entity_extractor = EntityExtractor::default();
        Self {
            taxonomy: Arc::clone(entity_extractor.taxonomy()),
            entity_extractor,
            relation_extractor: RelationExtractor::default(),
        }
    }

    /// Processor with custom configuration. Fails if a custom pattern is invalid.
    pub fn with_options(options: ProcessingOptions) -> NarrativeResult<Self> {
        let taxonomy = options
            .taxonomy
            .unwrap_or_else(|| Arc::new(Taxonomy::default()));
        let segmenter = options
            .segmenter
            .unwrap_or_else(|| Arc::new(RuleSegmenter::new()));
        let entity_extractor =
            EntityExtractor::new(Arc::clone(&taxonomy), Arc::clone(&segmenter), options.entities)?;
        let relation_extractor = RelationExtractor::new(segmenter, options.relations)?;
        Ok(Self {
            taxonomy,
            entity_extractor,
            relation_extractor,
        })
    }

    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    pub fn entity_extractor(&self) -> &EntityExtractor {
        &self.entity_extractor
    }

    pub fn relation_extractor(&self) -> &RelationExtractor {
        &self.relation_extractor
    }

    /// Process one narrative. A fresh id is generated when `id` is `None`.
    pub fn process_narrative(&self, text: &str, id: Option<&str>) -> NarrativeResult<ProcessingResult> {
        self.process_narrative_with_metadata(text, id, Attributes::new())
    }

    /// As [`Self::process_narrative`], attaching `metadata` to the narrative.
    pub fn process_narrative_with_metadata(
        &self,
        text: &str,
        id: Option<&str>,
        metadata: Attributes,
    ) -> NarrativeResult<ProcessingResult> {
        let started = Instant::now();
        let mut narrative = Narrative::new(text, id, metadata);

        for entity in self.entity_extractor.extract_entities(text)? {
            narrative.add_entity(entity);
        }
        let relations = self
            .relation_extractor
            .extract_relations(text, narrative.entities())?;
        for relation in relations {
            narrative.add_relation(relation);
        }

        let ontology = Ontology::from_narrative(&narrative);
        let processing_time = started.elapsed().as_secs_f64() * 1000.0;
        let stats = ProcessingStats::for_narrative(&narrative, processing_time);

        tracing::info!(
            narrative = %narrative.id(),
            entities = stats.entity_count,
            relations = stats.relation_count,
            coverage = stats.classification_coverage,
            elapsed_ms = processing_time,
            "processed narrative"
        );
        Ok(ProcessingResult {
            narrative,
            ontology,
            stats,
        })
    }

    /// Process texts in order with ids `narrative-1`, `narrative-2`, ...
    pub fn process_multiple_narratives<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> NarrativeResult<Vec<ProcessingResult>> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let id = format!("narrative-{}", i + 1);
                self.process_narrative(text.as_ref(), Some(&id))
            })
            .collect()
    }

    /// Process `(id, text)` pairs in order, keyed by id. A repeated id keeps the last result.
    pub fn process_batch<I, K, T>(&self, items: I) -> NarrativeResult<BTreeMap<String, ProcessingResult>>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: AsRef<str>,
    {
        let mut results = BTreeMap::new();
        for (id, text) in items {
            let id = id.into();
            let result = self.process_narrative(text.as_ref(), Some(&id))?;
            results.insert(id, result);
        }
        Ok(results)
    }

    /// Aggregate statistics over a set of results.
    pub fn processing_stats<'a>(
        &self,
        results: impl IntoIterator<Item = &'a ProcessingResult>,
    ) -> AggregateStats {
        AggregateStats::from_results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, NarrativeError};

    const SCENARIO: &str =
        "Sarah Johnson led the engineering team to improve customer metrics in Q2 2024.";

    #[test]
    fn scenario_end_to_end() {
        let result = NarrativeProcessor::new()
            .process_narrative(SCENARIO, Some("scenario"))
            .unwrap();
        assert_eq!(result.narrative.id(), "scenario");
        assert_eq!(result.stats.entity_count, 4);
        assert_eq!(result.stats.relation_count, result.narrative.relations().len());
        assert!((result.stats.classification_coverage - 0.75).abs() < 1e-9);
        assert!(result.stats.processing_time >= 0.0);
        assert_eq!(result.ontology.nodes().len(), 4);
    }

    #[test]
    fn empty_input() {
        let result = NarrativeProcessor::new().process_narrative("", None).unwrap();
        assert_eq!(result.stats.entity_count, 0);
        assert_eq!(result.stats.relation_count, 0);
        assert_eq!(result.stats.classification_coverage, 0.0);
        assert!(result.ontology.nodes().is_empty());
    }

    #[test]
    fn multiple_narratives_get_sequential_ids() {
        let results = NarrativeProcessor::new()
            .process_multiple_narratives(&["Churn fell.", "Growth rose."])
            .unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.narrative.id()).collect();
        assert_eq!(ids, ["narrative-1", "narrative-2"]);
    }

    #[test]
    fn batch_is_keyed_by_caller_ids() {
        let results = NarrativeProcessor::new()
            .process_batch([("q1", "Churn fell in Q1."), ("q2", SCENARIO)])
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results["q2"].narrative.id(), "q2");
    }

    #[test]
    fn invalid_custom_pattern_is_a_construction_error() {
        let err = NarrativeProcessor::with_options(ProcessingOptions {
            entities: ExtractionOptions {
                custom_patterns: vec!["[".into()],
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            NarrativeError::Extract(ExtractError::InvalidEntityPattern { .. })
        ));
    }

    #[derive(Debug)]
    struct FailingSegmenter;

    impl Segmenter for FailingSegmenter {
        fn sentences(&self, _text: &str) -> crate::error::ExtractResult<Vec<String>> {
            Err(ExtractError::Segmentation {
                message: "offline".into(),
            })
        }

        fn candidates(&self, _text: &str) -> crate::error::ExtractResult<crate::segment::Candidates> {
            Err(ExtractError::Segmentation {
                message: "offline".into(),
            })
        }
    }

    #[test]
    fn segmenter_failure_aborts_batch() {
        let processor = NarrativeProcessor::with_options(ProcessingOptions {
            segmenter: Some(Arc::new(FailingSegmenter)),
            ..Default::default()
        })
        .unwrap();
        let err = processor
            .process_multiple_narratives(&["one", "two"])
            .unwrap_err();
        assert!(matches!(
            err,
            NarrativeError::Extract(ExtractError::Segmentation { .. })
        ));
    }
}
