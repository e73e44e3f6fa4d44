// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # narrative-ontology
//!
//! Turns free-text business narratives (quarterly reports, strategy notes,
//! retrospectives) into typed knowledge graphs.
//!
//! ## Architecture
//!
//! - **Model** (`model`): entities, relations, narratives and the ontology graph
//! - **Taxonomy** (`taxonomy`): keyword/regex classification into business classes
//! - **Segmentation** (`segment`): sentence splitting and candidate-phrase detection
//! - **Extraction** (`extract`): entity and pattern-based relation extraction
//! - **Pipeline** (`pipeline`): end-to-end processing with per-run statistics
//! - **Export** (`export`): JSON-LD, GraphML, GEXF, Cytoscape, CSV and Mermaid output
//!
//! ## Library usage
//!
//! ```no_run
//! use narrative_ontology::export::{ExportFormat, Exporter};
//! use narrative_ontology::pipeline::NarrativeProcessor;
//!
//! let processor = NarrativeProcessor::new();
//! let result = processor
//!     .process_narrative("Sarah Johnson led the team to improve retention in Q2 2024.", None)
//!     .unwrap();
//! println!("{} entities", result.stats.entity_count);
//!
//! let exporter = Exporter::new(processor.taxonomy());
//! for rendered in exporter.render(&result.ontology, ExportFormat::Mermaid).unwrap() {
//!     println!("{}", rendered.contents);
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod segment;
pub mod taxonomy;
