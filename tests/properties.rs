//! Property tests over generated narratives.

use std::collections::HashSet;

use narrative_ontology::model::Relation;
use narrative_ontology::pipeline::NarrativeProcessor;
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "the", "team", "Sarah", "Johnson", "improved", "customer", "retention", "in", "Q3",
    "2024", "because", "of", "onboarding", "Acme", "Corp", "launched", "dashboard", "and",
    "led", "to", "revenue", "growth", "café", "naïve", "strategy", "within", "product",
];

fn arb_narrative() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        proptest::collection::vec(prop::sample::select(WORDS), 1..15)
            .prop_map(|words| format!("{}.", words.join(" "))),
        0..5,
    )
    .prop_map(|sentences| sentences.join(" "))
}

fn window_holds(
    text: &str,
    relation: &Relation,
    processor: &NarrativeProcessor,
    spans: &[(String, Vec<usize>)],
) -> bool {
    let max = processor.relation_extractor().max_distance();
    let starts = |id: &str| {
        spans
            .iter()
            .find(|(entity, _)| entity == id)
            .map(|(_, s)| s.clone())
            .unwrap_or_default()
    };
    // Distances are measured in characters.
    let distance = |a: usize, b: usize| text[a.min(b)..a.max(b)].chars().count();
    let source = starts(relation.source_entity_id());
    let target = starts(relation.target_entity_id());
    source
        .iter()
        .any(|s| target.iter().any(|t| distance(*s, *t) <= max))
}

proptest! {
    #[test]
    fn prop_spans_slice_the_source_text(text in arb_narrative()) {
        let result = NarrativeProcessor::new().process_narrative(&text, None).unwrap();
        for entity in result.narrative.entities() {
            prop_assert!(!entity.spans().is_empty());
            for span in entity.spans() {
                prop_assert!(span.start < span.end && span.end <= text.len());
                prop_assert!(text.is_char_boundary(span.start) && text.is_char_boundary(span.end));
                prop_assert_eq!(&text[span.start..span.end], span.text.as_str());
            }
        }
    }

    #[test]
    fn prop_confidences_stay_in_unit_range(text in arb_narrative()) {
        let result = NarrativeProcessor::new().process_narrative(&text, None).unwrap();
        for entity in result.narrative.entities() {
            if let Some(class) = entity.classification() {
                prop_assert!((0.0..=1.0).contains(&class.confidence));
            }
        }
        for relation in result.narrative.relations() {
            prop_assert!((0.0..=1.0).contains(&relation.confidence()));
            prop_assert!(relation.confidence() >= 0.3);
        }
        prop_assert!((0.0..=1.0).contains(&result.stats.classification_coverage));
    }

    #[test]
    fn prop_relations_stay_within_window(text in arb_narrative()) {
        let processor = NarrativeProcessor::new();
        let result = processor.process_narrative(&text, None).unwrap();
        let spans: Vec<(String, Vec<usize>)> = result
            .narrative
            .entities()
            .iter()
            .map(|e| (e.id().to_string(), e.spans().iter().map(|s| s.start).collect()))
            .collect();
        for relation in result.narrative.relations() {
            prop_assert!(window_holds(&text, relation, &processor, &spans));
        }
    }

    #[test]
    fn prop_entities_are_deduplicated(text in arb_narrative()) {
        let result = NarrativeProcessor::new().process_narrative(&text, None).unwrap();
        let mut seen = HashSet::new();
        for entity in result.narrative.entities() {
            prop_assert!(seen.insert(entity.text().to_lowercase()));
        }
        prop_assert!(result.ontology.dangling_edges().is_empty());
    }
}
