//! Node/edge graph projection of a [`Narrative`].
//!
//! The projection is a 1:1 structural mirror: one node per entity (node id =
//! entity id) and one edge per relation. Manual [`Ontology::add_edge`] calls
//! must keep every edge endpoint pointing at an existing node; use
//! [`Ontology::dangling_edges`] to check.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{generate_id, Attributes, Narrative};

/// Node type used for entities that carry no classification.
pub const UNCLASSIFIED_NODE_TYPE: &str = "Entity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Provenance of an ontology produced from a narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyMetadata {
    pub source_narrative_id: String,
    pub extracted_at: DateTime<Utc>,
    pub entity_count: usize,
    pub relation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ontology {
    id: String,
    nodes: Vec<OntologyNode>,
    edges: Vec<OntologyEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<OntologyMetadata>,
    created_at: DateTime<Utc>,
}

impl Default for Ontology {
    fn default() -> Self {
        Self::new()
    }
}

impl Ontology {
    pub fn new() -> Self {
        Self {
            id: generate_id("ontology"),
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata: None,
            created_at: Utc::now(),
        }
    }

    /// Project a narrative into a graph. Never drops or merges anything.
    pub fn from_narrative(narrative: &Narrative) -> Self {
        let mut ontology = Self::new();

        for entity in narrative.entities() {
            let mut attributes = entity.attributes().clone();
            attributes.insert("originalSpans".into(), json!(entity.spans()));
            attributes.insert(
                "confidence".into(),
                entity
                    .classification()
                    .map_or(serde_json::Value::Null, |c| json!(c.confidence)),
            );
            ontology.add_node(OntologyNode {
                id: entity.id().to_string(),
                label: entity.text().to_string(),
                node_type: entity
                    .class_type()
                    .unwrap_or(UNCLASSIFIED_NODE_TYPE)
                    .to_string(),
                attributes,
            });
        }

        for relation in narrative.relations() {
            let mut attributes = Attributes::new();
            attributes.insert("confidence".into(), json!(relation.confidence()));
            attributes.extend(relation.metadata().clone());
            ontology.add_edge(OntologyEdge {
                id: relation.id().to_string(),
                source: relation.source_entity_id().to_string(),
                target: relation.target_entity_id().to_string(),
                label: relation.label().to_string(),
                attributes,
            });
        }

        ontology.metadata = Some(OntologyMetadata {
            source_narrative_id: narrative.id().to_string(),
            extracted_at: Utc::now(),
            entity_count: narrative.entities().len(),
            relation_count: narrative.relations().len(),
        });
        ontology
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nodes(&self) -> &[OntologyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[OntologyEdge] {
        &self.edges
    }

    pub fn metadata(&self) -> Option<&OntologyMetadata> {
        self.metadata.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn add_node(&mut self, node: OntologyNode) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: OntologyEdge) {
        self.edges.push(edge);
    }

    pub fn get_node(&self, id: &str) -> Option<&OntologyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_edge(&self, id: &str) -> Option<&OntologyEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn nodes_by_type<'a>(&'a self, node_type: &'a str) -> impl Iterator<Item = &'a OntologyNode> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    pub fn edges_by_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a OntologyEdge> {
        self.edges.iter().filter(move |e| e.label == label)
    }

    /// Distinct nodes linked to `node_id` by an edge in either direction, in node order.
    pub fn connected_nodes(&self, node_id: &str) -> Vec<&OntologyNode> {
        let neighbours: HashSet<&str> = self
            .edges
            .iter()
            .filter_map(|edge| {
                if edge.source == node_id {
                    Some(edge.target.as_str())
                } else if edge.target == node_id {
                    Some(edge.source.as_str())
                } else {
                    None
                }
            })
            .collect();
        self.nodes
            .iter()
            .filter(|n| neighbours.contains(n.id.as_str()))
            .collect()
    }

    /// Edges whose source or target names no existing node.
    pub fn dangling_edges(&self) -> Vec<&OntologyEdge> {
        self.edges
            .iter()
            .filter(|e| self.get_node(&e.source).is_none() || self.get_node(&e.target).is_none())
            .collect()
    }

    /// Build a petgraph view of the ontology. Dangling edges are skipped.
    pub fn to_graph(&self) -> OntologyGraph<'_> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            // Duplicate node ids resolve to the first node.
            index
                .entry(node.id.as_str())
                .or_insert_with(|| graph.add_node(node));
        }
        for edge in &self.edges {
            if let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                graph.add_edge(s, t, edge);
            }
        }
        OntologyGraph { graph, index }
    }
}

/// Borrowed directed multigraph over an [`Ontology`].
pub struct OntologyGraph<'a> {
    graph: DiGraph<&'a OntologyNode, &'a OntologyEdge>,
    index: HashMap<&'a str, NodeIndex>,
}

impl<'a> OntologyGraph<'a> {
    pub fn graph(&self) -> &DiGraph<&'a OntologyNode, &'a OntologyEdge> {
        &self.graph
    }

    /// Total number of incident edges (in + out). Zero for unknown ids.
    pub fn degree(&self, node_id: &str) -> usize {
        self.index.get(node_id).map_or(0, |&idx| {
            self.graph.edges_directed(idx, Direction::Outgoing).count()
                + self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }

    /// Distinct successors of a node.
    pub fn successors(&self, node_id: &str) -> Vec<&'a OntologyNode> {
        let Some(&idx) = self.index.get(node_id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter(|n| seen.insert(*n))
            .map(|n| self.graph[n])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, Relation, TextSpan};

    fn narrative() -> Narrative {
        let mut narrative = Narrative::new("Q2 goal and team", Some("n-1"), Attributes::new());
        let mut q2 = Entity::new("Q2", vec![TextSpan::new(0, 2, "Q2")]);
        q2.set_classification("time-period", 0.25, Attributes::new());
        q2.set_attribute("confidence", "shadowed");
        let team = Entity::new("team", vec![TextSpan::new(12, 16, "team")]);
        let relation = Relation::new(q2.id(), team.id(), "associated_with", 0.4).with_metadata(
            [("patternMatch".to_string(), json!("and"))].into_iter().collect(),
        );
        narrative.add_entity(q2);
        narrative.add_entity(team);
        narrative.add_relation(relation);
        narrative
    }

    #[test]
    fn projection_mirrors_narrative() {
        let narrative = narrative();
        let ontology = Ontology::from_narrative(&narrative);

        assert_eq!(ontology.nodes().len(), narrative.entities().len());
        assert_eq!(ontology.edges().len(), narrative.relations().len());
        assert!(ontology.dangling_edges().is_empty());

        let q2 = &ontology.nodes()[0];
        assert_eq!(q2.id, narrative.entities()[0].id());
        assert_eq!(q2.node_type, "time-period");
        // Classification confidence wins over an entity attribute of the same name.
        assert_eq!(q2.attributes["confidence"], json!(0.25));
        assert_eq!(q2.attributes["originalSpans"][0]["text"], "Q2");

        let team = &ontology.nodes()[1];
        assert_eq!(team.node_type, UNCLASSIFIED_NODE_TYPE);
        assert!(team.attributes["confidence"].is_null());

        let edge = &ontology.edges()[0];
        assert_eq!(edge.attributes["confidence"], json!(0.4));
        assert_eq!(edge.attributes["patternMatch"], "and");

        let meta = ontology.metadata().unwrap();
        assert_eq!(meta.source_narrative_id, "n-1");
        assert_eq!((meta.entity_count, meta.relation_count), (2, 1));
    }

    #[test]
    fn lookups_and_neighbours() {
        let narrative = narrative();
        let ontology = Ontology::from_narrative(&narrative);
        let q2_id = narrative.entities()[0].id();
        let team_id = narrative.entities()[1].id();

        assert_eq!(ontology.nodes_by_type("time-period").count(), 1);
        assert_eq!(ontology.edges_by_label("associated_with").count(), 1);
        assert_eq!(ontology.connected_nodes(team_id)[0].id, q2_id);
        assert!(ontology.get_edge(narrative.relations()[0].id()).is_some());

        let graph = ontology.to_graph();
        assert_eq!(graph.degree(q2_id), 1);
        assert_eq!(graph.successors(q2_id)[0].label, "team");
        assert_eq!(graph.degree("missing"), 0);
    }

    #[test]
    fn connected_nodes_are_distinct_and_in_node_order() {
        let mut ontology = Ontology::new();
        for id in ["a", "b", "c"] {
            ontology.add_node(OntologyNode {
                id: id.into(),
                label: id.to_uppercase(),
                node_type: "goal".into(),
                attributes: Attributes::new(),
            });
        }
        for (id, source, target) in [("e1", "c", "b"), ("e2", "b", "c"), ("e3", "a", "b")] {
            ontology.add_edge(OntologyEdge {
                id: id.into(),
                source: source.into(),
                target: target.into(),
                label: "supports".into(),
                attributes: Attributes::new(),
            });
        }
        let ids: Vec<_> = ontology
            .connected_nodes("b")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn manual_dangling_edge_is_reported() {
        let mut ontology = Ontology::new();
        ontology.add_node(OntologyNode {
            id: "a".into(),
            label: "A".into(),
            node_type: "goal".into(),
            attributes: Attributes::new(),
        });
        ontology.add_edge(OntologyEdge {
            id: "e".into(),
            source: "a".into(),
            target: "ghost".into(),
            label: "supports".into(),
            attributes: Attributes::new(),
        });
        assert_eq!(ontology.dangling_edges().len(), 1);
        assert_eq!(ontology.to_graph().graph().edge_count(), 0);
    }
}
