//! Rich diagnostic error types for the narrative-to-ontology pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know exactly what went wrong and
//! how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the pipeline.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum NarrativeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),
}

// ---------------------------------------------------------------------------
// Taxonomy errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TaxonomyError {
    #[error("invalid pattern in taxonomy class \"{class_id}\": {pattern}")]
    #[diagnostic(
        code(narr::taxonomy::invalid_pattern),
        help(
            "Taxonomy patterns are regular expressions matched case-insensitively. \
             Fix the syntax error reported below: {message}"
        )
    )]
    InvalidPattern {
        class_id: String,
        pattern: String,
        message: String,
    },

    #[error("duplicate taxonomy class id: \"{id}\"")]
    #[diagnostic(
        code(narr::taxonomy::duplicate_class),
        help("Every class in a taxonomy must have a unique id.")
    )]
    DuplicateClass { id: String },

    #[error("taxonomy has no classes")]
    #[diagnostic(
        code(narr::taxonomy::empty),
        help("Define at least one `[[classes]]` entry, or omit the taxonomy file to use the default taxonomy.")
    )]
    EmptyTaxonomy,

    #[error("failed to parse taxonomy definition")]
    #[diagnostic(
        code(narr::taxonomy::parse),
        help(
            "A taxonomy file needs `id`, `name`, `version` and a list of `[[classes]]` \
             tables with `id`, `name`, `description`, `keywords` and `patterns`: {message}"
        )
    )]
    Parse { message: String },
}

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("invalid custom entity pattern: {pattern}")]
    #[diagnostic(
        code(narr::extract::invalid_entity_pattern),
        help(
            "Custom entity patterns are regular expressions scanned case-insensitively \
             over the whole text. The regex engine reported: {message}"
        )
    )]
    InvalidEntityPattern { pattern: String, message: String },

    #[error("invalid relation pattern: {pattern}")]
    #[diagnostic(
        code(narr::extract::invalid_relation_pattern),
        help(
            "Relation patterns are regular expressions searched in the text between \
             two entities. The regex engine reported: {message}"
        )
    )]
    InvalidRelationPattern { pattern: String, message: String },

    #[error("relation pattern confidence out of range: {confidence}")]
    #[diagnostic(
        code(narr::extract::confidence_range),
        help("Pattern confidences must lie within [0.0, 1.0].")
    )]
    ConfidenceOutOfRange { confidence: f64 },

    #[error("segmentation failed: {message}")]
    #[diagnostic(
        code(narr::extract::segmentation),
        help("The text segmenter could not split the input. Check the segmenter implementation or the input encoding.")
    )]
    Segmentation { message: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(narr::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}")]
    #[diagnostic(
        code(narr::config::parse),
        help("The file is not valid TOML for this section layout: {message}")
    )]
    Parse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(narr::config::invalid),
        help("Adjust the offending value in the configuration file.")
    )]
    Invalid { message: String },
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to serialize ontology as {format}")]
    #[diagnostic(
        code(narr::export::serialize),
        help("The serializer reported: {message}")
    )]
    Serialize { format: String, message: String },

    #[error("unknown export format: \"{name}\"")]
    #[diagnostic(
        code(narr::export::unknown_format),
        help("Supported formats: json-ld, graphml, mermaid, cytoscape, gexf, csv.")
    )]
    UnknownFormat { name: String },

    #[error("failed to write export file: {path}")]
    #[diagnostic(
        code(narr::export::write),
        help("Check that the output directory exists and is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for pipeline operations.
pub type NarrativeResult<T> = std::result::Result<T, NarrativeError>;

/// Convenience result type for taxonomy operations.
pub type TaxonomyResult<T> = std::result::Result<T, TaxonomyError>;

/// Convenience result type for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Convenience result type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Convenience result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;
