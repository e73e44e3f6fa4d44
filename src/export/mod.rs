//! Serializers for ontologies.
//!
//! Every format is a pure function of an [`Ontology`] (plus the [`Taxonomy`]
//! for display colors). [`Exporter`] bundles the options the CLI needs and
//! writes files.

pub mod mermaid;
pub mod xml;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{ExportError, ExportResult};
use crate::model::Ontology;
use crate::taxonomy::Taxonomy;

pub use mermaid::{MermaidOptions, MermaidRenderer, NodeShape};
pub use xml::{to_gexf, to_graphml};

const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const DOTWORK_NS: &str = "https://dotwork.com/ontology#";

/// Fallback node color for types the taxonomy does not define.
const DEFAULT_NODE_COLOR: &str = "#CCCCCC";

/// Output formats understood by [`Exporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    JsonLd,
    #[serde(rename = "graphml")]
    GraphMl,
    Mermaid,
    Cytoscape,
    Gexf,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        Self::JsonLd,
        Self::GraphMl,
        Self::Mermaid,
        Self::Cytoscape,
        Self::Gexf,
        Self::Csv,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::JsonLd => "json-ld",
            Self::GraphMl => "graphml",
            Self::Mermaid => "mermaid",
            Self::Cytoscape => "cytoscape",
            Self::Gexf => "gexf",
            Self::Csv => "csv",
        }
    }

    /// File suffix (without the stem) for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::JsonLd => "jsonld",
            Self::GraphMl => "graphml",
            Self::Mermaid => "mmd",
            Self::Cytoscape => "cytoscape.json",
            Self::Gexf => "gexf",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .or(match lower.as_str() {
                "jsonld" => Some(Self::JsonLd),
                "cytoscape.js" => Some(Self::Cytoscape),
                _ => None,
            })
            .ok_or_else(|| ExportError::UnknownFormat { name: s.to_string() })
    }
}

/// JSON-LD document: one `@graph` entry per node, edges folded into their
/// source node as `dotwork:<label>` reference arrays.
pub fn to_json_ld(ontology: &Ontology) -> Value {
    let mut graph: Vec<Map<String, Value>> = ontology
        .nodes()
        .iter()
        .map(|node| {
            let mut entry = Map::new();
            entry.insert("@id".into(), json!(format!("dotwork:{}", node.id)));
            entry.insert("@type".into(), json!(format!("dotwork:{}", node.node_type)));
            entry.insert("rdfs:label".into(), json!(node.label));
            for (key, value) in &node.attributes {
                entry.insert(format!("dotwork:{key}"), value.clone());
            }
            entry
        })
        .collect();

    for edge in ontology.edges() {
        let source_id = format!("dotwork:{}", edge.source);
        let Some(source) = graph.iter_mut().find(|n| n["@id"] == source_id.as_str()) else {
            continue;
        };
        let key = format!("dotwork:{}", edge.label);
        let slot = source.entry(key).or_insert_with(|| json!([]));
        // An attribute of the same name that is not an array is left untouched.
        if let Value::Array(targets) = slot {
            targets.push(json!({ "@id": format!("dotwork:{}", edge.target) }));
        }
    }

    json!({
        "@context": {
            "rdfs": RDFS_NS,
            "dotwork": DOTWORK_NS,
            "label": "rdfs:label",
            "type": "@type",
            "id": "@id",
        },
        "@graph": graph,
    })
}

/// Cytoscape.js elements with a fixed stylesheet and a `cose` layout.
///
/// Node data carries a `color` from the taxonomy for the `data(color)` style.
pub fn to_cytoscape(ontology: &Ontology, taxonomy: &Taxonomy) -> Value {
    let mut elements = Vec::with_capacity(ontology.nodes().len() + ontology.edges().len());
    for node in ontology.nodes() {
        let mut data = Map::new();
        data.insert("id".into(), json!(node.id));
        data.insert("label".into(), json!(node.label));
        data.insert("type".into(), json!(node.node_type));
        let color = taxonomy
            .get_class(&node.node_type)
            .and_then(|c| c.color.as_deref())
            .unwrap_or(DEFAULT_NODE_COLOR);
        data.insert("color".into(), json!(color));
        data.extend(node.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        elements.push(json!({ "data": data }));
    }
    for edge in ontology.edges() {
        let mut data = Map::new();
        data.insert("id".into(), json!(edge.id));
        data.insert("source".into(), json!(edge.source));
        data.insert("target".into(), json!(edge.target));
        data.insert("label".into(), json!(edge.label));
        data.extend(edge.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        elements.push(json!({ "data": data }));
    }

    json!({
        "elements": elements,
        "style": [
            {
                "selector": "node",
                "style": {
                    "background-color": "data(color)",
                    "label": "data(label)",
                    "text-wrap": "wrap",
                    "text-max-width": "100px",
                    "font-size": "12px",
                    "text-valign": "center",
                    "text-halign": "center",
                    "width": "60px",
                    "height": "60px",
                },
            },
            {
                "selector": "edge",
                "style": {
                    "width": 2,
                    "line-color": "#ccc",
                    "target-arrow-color": "#ccc",
                    "target-arrow-shape": "triangle",
                    "curve-style": "bezier",
                    "label": "data(label)",
                    "font-size": "10px",
                    "text-rotation": "autorotate",
                },
            },
        ],
        "layout": {
            "name": "cose",
            "idealEdgeLength": 100,
            "nodeOverlap": 20,
            "refresh": 20,
            "fit": true,
            "padding": 30,
            "randomize": false,
            "componentSpacing": 100,
        },
    })
}

/// Node and edge tables as CSV text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvTables {
    pub nodes: String,
    pub edges: String,
}

pub fn to_csv(ontology: &Ontology) -> CsvTables {
    let mut nodes = String::from("id,label,type\n");
    for node in ontology.nodes() {
        nodes.push_str(&csv_row(&[&node.id, &node.label, &node.node_type]));
    }
    let mut edges = String::from("source,target,label\n");
    for edge in ontology.edges() {
        edges.push_str(&csv_row(&[&edge.source, &edge.target, &edge.label]));
    }
    CsvTables { nodes, edges }
}

fn csv_row(fields: &[&str]) -> String {
    let quoted: Vec<String> = fields
        .iter()
        .map(|f| format!("\"{}\"", f.replace('"', "\"\"")))
        .collect();
    format!("{}\n", quoted.join(","))
}

/// One rendered output: a file-name suffix and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub suffix: String,
    pub contents: String,
}

/// Renders ontologies in any [`ExportFormat`] and writes them to disk.
#[derive(Debug, Clone)]
pub struct Exporter<'a> {
    taxonomy: &'a Taxonomy,
    mermaid: MermaidOptions,
    include_legend: bool,
}

impl<'a> Exporter<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            mermaid: MermaidOptions::default(),
            include_legend: false,
        }
    }

    pub fn with_mermaid_options(mut self, options: MermaidOptions) -> Self {
        self.mermaid = options;
        self
    }

    /// Append the taxonomy legend to Mermaid output.
    pub fn with_legend(mut self, include_legend: bool) -> Self {
        self.include_legend = include_legend;
        self
    }

    /// Render one format. CSV yields two outputs (nodes and edges).
    pub fn render(&self, ontology: &Ontology, format: ExportFormat) -> ExportResult<Vec<Rendered>> {
        let single = |contents: String| {
            vec![Rendered {
                suffix: format.extension().to_string(),
                contents,
            }]
        };
        Ok(match format {
            ExportFormat::JsonLd => single(pretty_json(&to_json_ld(ontology), format)?),
            ExportFormat::Cytoscape => {
                single(pretty_json(&to_cytoscape(ontology, self.taxonomy), format)?)
            }
            ExportFormat::GraphMl => single(to_graphml(ontology)),
            ExportFormat::Gexf => single(to_gexf(ontology)),
            ExportFormat::Mermaid => {
                let renderer = MermaidRenderer::new(self.taxonomy, self.mermaid.clone());
                single(if self.include_legend {
                    renderer.render_with_legend(ontology)
                } else {
                    renderer.render_ontology(ontology)
                })
            }
            ExportFormat::Csv => {
                let tables = to_csv(ontology);
                vec![
                    Rendered {
                        suffix: "nodes.csv".into(),
                        contents: tables.nodes,
                    },
                    Rendered {
                        suffix: "edges.csv".into(),
                        contents: tables.edges,
                    },
                ]
            }
        })
    }

    /// Write every requested format as `<dir>/<stem>.<suffix>`, returning the paths.
    pub fn write_all(
        &self,
        ontology: &Ontology,
        formats: &[ExportFormat],
        dir: &Path,
        stem: &str,
    ) -> ExportResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir).map_err(|e| ExportError::Write {
            path: dir.display().to_string(),
            source: e,
        })?;
        let mut written = Vec::new();
        for &format in formats {
            for rendered in self.render(ontology, format)? {
                let path = dir.join(format!("{stem}.{}", rendered.suffix));
                std::fs::write(&path, rendered.contents).map_err(|e| ExportError::Write {
                    path: path.display().to_string(),
                    source: e,
                })?;
                tracing::debug!(format = %format, path = %path.display(), "wrote export");
                written.push(path);
            }
        }
        Ok(written)
    }
}

fn pretty_json(value: &Value, format: ExportFormat) -> ExportResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ExportError::Serialize {
        format: format.name().to_string(),
        message: e.to_string(),
    })
}
