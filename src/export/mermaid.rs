//! Mermaid flowchart rendering.
//!
//! Large ontologies are cut down to `max_nodes`, keeping the most important
//! node types first and, within a type, the best-connected nodes.

use std::collections::HashSet;

use crate::model::{Ontology, OntologyEdge, OntologyNode};
use crate::taxonomy::Taxonomy;

const MAX_LABEL_CHARS: usize = 30;

/// Importance rank used when trimming to `max_nodes`. Unknown types rank 0.
fn type_importance(node_type: &str) -> u8 {
    match node_type {
        "goal" => 10,
        "target" => 9,
        "initiative" => 8,
        "stakeholder" => 7,
        "release-launch" => 6,
        "time-period" => 5,
        "product-capability" => 4,
        "customer-segment" => 3,
        "insight" => 2,
        "principle" | "cycle-theme" => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    Rectangle,
    #[default]
    Rounded,
    Circle,
    Rhombus,
}

impl NodeShape {
    fn wrap(self, label: &str) -> String {
        match self {
            Self::Rectangle => format!("[\"{label}\"]"),
            Self::Rounded => format!("(\"{label}\")"),
            Self::Circle => format!("((\"{label}\"))"),
            Self::Rhombus => format!("{{\"{label}\"}}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidOptions {
    /// Flowchart direction: `TD`, `LR`, `BT` or `RL`.
    pub direction: String,
    pub include_colors: bool,
    /// `None` renders every node.
    pub max_nodes: Option<usize>,
    pub include_labels: bool,
    pub node_shape: NodeShape,
}

impl Default for MermaidOptions {
    fn default() -> Self {
        Self {
            direction: "TD".into(),
            include_colors: true,
            max_nodes: Some(50),
            include_labels: true,
            node_shape: NodeShape::Rounded,
        }
    }
}

/// Renders ontologies as Mermaid flowchart text, colored by taxonomy class.
#[derive(Debug, Clone)]
pub struct MermaidRenderer<'a> {
    taxonomy: &'a Taxonomy,
    options: MermaidOptions,
}

impl<'a> MermaidRenderer<'a> {
    pub fn new(taxonomy: &'a Taxonomy, options: MermaidOptions) -> Self {
        Self { taxonomy, options }
    }

    pub fn options(&self) -> &MermaidOptions {
        &self.options
    }

    pub fn render_ontology(&self, ontology: &Ontology) -> String {
        let nodes = self.limit_nodes(ontology);
        let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        let mut out = format!("flowchart {}\n", self.options.direction);
        for node in &nodes {
            out.push_str(&self.render_node(node));
        }
        for edge in ontology
            .edges()
            .iter()
            .filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
        {
            out.push_str(&self.render_edge(edge));
        }
        if self.options.include_colors {
            out.push_str(&self.render_styling(&nodes));
        }
        out
    }

    pub fn render_with_legend(&self, ontology: &Ontology) -> String {
        let mut out = self.render_ontology(ontology);
        out.push_str(&self.render_legend());
        out
    }

    /// A `Legend` subgraph with one colored node per taxonomy class.
    pub fn render_legend(&self) -> String {
        if !self.options.include_colors {
            return String::new();
        }
        let mut legend = String::from("\n%% Legend\nsubgraph Legend\n");
        for class in self.taxonomy.classes() {
            legend.push_str(&format!(
                "    legend_{}[\"{}\"]\n",
                sanitize_node_id(&class.id),
                sanitize_label(&class.name)
            ));
        }
        legend.push_str("end\n\n");
        for class in self.taxonomy.classes() {
            let Some(color) = &class.color else {
                continue;
            };
            let class_id = format!("legend{}", alphanumeric(&class.id));
            legend.push_str(&format!(
                "classDef {class_id} fill:{color},stroke:#333,stroke-width:2px,color:#000\n"
            ));
            legend.push_str(&format!(
                "class legend_{} {class_id}\n",
                sanitize_node_id(&class.id)
            ));
        }
        legend
    }

    fn limit_nodes<'o>(&self, ontology: &'o Ontology) -> Vec<&'o OntologyNode> {
        let nodes: Vec<&OntologyNode> = ontology.nodes().iter().collect();
        let max = match self.options.max_nodes {
            Some(max) if max > 0 && nodes.len() > max => max,
            _ => return nodes,
        };
        let graph = ontology.to_graph();
        let mut ranked = nodes;
        ranked.sort_by_key(|n| {
            std::cmp::Reverse((type_importance(&n.node_type), graph.degree(&n.id)))
        });
        ranked.truncate(max);
        tracing::debug!(kept = max, total = ontology.nodes().len(), "trimmed mermaid nodes");
        ranked
    }

    fn render_node(&self, node: &OntologyNode) -> String {
        format!(
            "    {}{}\n",
            sanitize_node_id(&node.id),
            self.options.node_shape.wrap(&sanitize_label(&node.label))
        )
    }

    fn render_edge(&self, edge: &OntologyEdge) -> String {
        let source = sanitize_node_id(&edge.source);
        let target = sanitize_node_id(&edge.target);
        let label = sanitize_label(&edge.label);
        if self.options.include_labels && !label.is_empty() {
            format!("    {source} -->|\"{label}\"| {target}\n")
        } else {
            format!("    {source} --> {target}\n")
        }
    }

    fn render_styling(&self, nodes: &[&OntologyNode]) -> String {
        // Types in first-seen order.
        let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
        for node in nodes {
            let id = sanitize_node_id(&node.id);
            match groups.iter_mut().find(|(ty, _)| *ty == node.node_type) {
                Some((_, ids)) => ids.push(id),
                None => groups.push((node.node_type.as_str(), vec![id])),
            }
        }

        let mut styling = String::from("\n");
        for (node_type, ids) in groups {
            let Some(color) = self
                .taxonomy
                .get_class(node_type)
                .and_then(|c| c.color.as_deref())
            else {
                continue;
            };
            let class_id = format!("class{}", alphanumeric(node_type));
            styling.push_str(&format!(
                "    classDef {class_id} fill:{color},stroke:#333,stroke-width:2px,color:#000\n"
            ));
            styling.push_str(&format!("    class {} {class_id}\n", ids.join(",")));
        }
        styling
    }
}

/// Replace everything outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_node_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Escape double quotes and truncate to 30 characters with a `...` tail.
pub fn sanitize_label(label: &str) -> String {
    let escaped = label.replace('"', "\\\"");
    if escaped.chars().count() > MAX_LABEL_CHARS {
        let head: String = escaped.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{head}...")
    } else {
        escaped
    }
}

fn alphanumeric(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}
