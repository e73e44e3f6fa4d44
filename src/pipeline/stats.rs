//! Per-narrative and aggregate processing statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::Narrative;

use super::ProcessingResult;

/// Frequency-table key for entities without a classification.
pub const UNCLASSIFIED_KEY: &str = "unclassified";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub entity_count: usize,
    pub relation_count: usize,
    /// Wall-clock milliseconds.
    pub processing_time: f64,
    /// Classified entities / entities, 0 when there are none.
    pub classification_coverage: f64,
}

impl ProcessingStats {
    pub fn for_narrative(narrative: &Narrative, processing_time: f64) -> Self {
        let entity_count = narrative.entities().len();
        let classified = narrative
            .entities()
            .iter()
            .filter(|e| e.classification().is_some())
            .count();
        Self {
            entity_count,
            relation_count: narrative.relations().len(),
            processing_time,
            classification_coverage: if entity_count == 0 {
                0.0
            } else {
                classified as f64 / entity_count as f64
            },
        }
    }
}

/// Totals, means and frequency tables across many results.
///
/// Means are NaN for an empty result set; check `total_narratives` first.
/// NaN serializes as JSON `null` and reads back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_narratives: usize,
    pub total_entities: usize,
    pub total_relations: usize,
    #[serde(deserialize_with = "null_as_nan")]
    pub average_processing_time: f64,
    #[serde(deserialize_with = "null_as_nan")]
    pub average_classification_coverage: f64,
    pub entities_by_type: BTreeMap<String, usize>,
    pub relations_by_label: BTreeMap<String, usize>,
}

impl AggregateStats {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ProcessingResult>) -> Self {
        let mut stats = Self {
            total_narratives: 0,
            total_entities: 0,
            total_relations: 0,
            average_processing_time: 0.0,
            average_classification_coverage: 0.0,
            entities_by_type: BTreeMap::new(),
            relations_by_label: BTreeMap::new(),
        };
        let mut time_sum = 0.0;
        let mut coverage_sum = 0.0;

        for result in results {
            stats.total_narratives += 1;
            stats.total_entities += result.stats.entity_count;
            stats.total_relations += result.stats.relation_count;
            time_sum += result.stats.processing_time;
            coverage_sum += result.stats.classification_coverage;

            for entity in result.narrative.entities() {
                let key = entity.class_type().unwrap_or(UNCLASSIFIED_KEY);
                *stats.entities_by_type.entry(key.to_string()).or_default() += 1;
            }
            for relation in result.narrative.relations() {
                *stats
                    .relations_by_label
                    .entry(relation.label().to_string())
                    .or_default() += 1;
            }
        }

        // 0 / 0 is NaN, which is the documented empty-set result.
        let n = stats.total_narratives as f64;
        stats.average_processing_time = time_sum / n;
        stats.average_classification_coverage = coverage_sum / n;
        stats
    }
}

/// Reads JSON `null` (how serde_json writes NaN) back as NaN.
fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::NarrativeProcessor;

    #[test]
    fn empty_set_yields_nan_means() {
        let stats = AggregateStats::from_results(std::iter::empty());
        assert_eq!(stats.total_narratives, 0);
        assert!(stats.average_processing_time.is_nan());
        assert!(stats.average_classification_coverage.is_nan());
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["averageProcessingTime"].is_null());
    }

    #[test]
    fn empty_stats_survive_a_json_round_trip() {
        let stats = AggregateStats::from_results(std::iter::empty());
        let json = serde_json::to_string(&stats).unwrap();
        let back: AggregateStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_narratives, 0);
        assert!(back.average_processing_time.is_nan());
        assert!(back.average_classification_coverage.is_nan());
        assert!(back.entities_by_type.is_empty());

        let full = AggregateStats {
            total_narratives: 1,
            total_entities: 2,
            total_relations: 0,
            average_processing_time: 1.5,
            average_classification_coverage: 0.5,
            entities_by_type: BTreeMap::new(),
            relations_by_label: BTreeMap::new(),
        };
        let back: AggregateStats =
            serde_json::from_str(&serde_json::to_string(&full).unwrap()).unwrap();
        assert_eq!(back, full);
    }

    #[test]
    fn aggregates_counts_and_tables() {
        let processor = NarrativeProcessor::new();
        let results = processor
            .process_multiple_narratives(&[
                "Sarah Johnson led the engineering team to improve customer metrics in Q2 2024.",
                "",
            ])
            .unwrap();
        let stats = processor.processing_stats(&results);
        assert_eq!(stats.total_narratives, 2);
        assert_eq!(stats.total_entities, 4);
        assert_eq!(stats.entities_by_type["stakeholder"], 1);
        assert_eq!(stats.entities_by_type[UNCLASSIFIED_KEY], 1);
        assert_eq!(stats.entities_by_type["time-period"], 1);
        assert!((stats.average_classification_coverage - 0.375).abs() < 1e-9);
        assert_eq!(
            stats.relations_by_label.values().sum::<usize>(),
            stats.total_relations
        );
    }
}
