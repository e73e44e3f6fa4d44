//! TOML configuration for the processor and exporters.
//!
//! Every section is optional and falls back to the built-in defaults:
//!
//! ```toml
//! [entities]
//! min_entity_length = 2
//! custom_patterns = ['\d+%']
//!
//! [relations]
//! max_distance = 100
//! min_confidence = 0.3
//!
//! [[relations.custom_patterns]]
//! pattern = 'in support of'
//! label = 'supports'
//! confidence = 0.7
//!
//! [taxonomy]
//! file = "taxonomy.toml"
//!
//! [export]
//! formats = ["json-ld", "mermaid"]
//! max_nodes = 50
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, NarrativeResult};
use crate::export::{ExportFormat, MermaidOptions};
use crate::extract::{ExtractionOptions, RelationOptions};
use crate::pipeline::{NarrativeProcessor, ProcessingOptions};
use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub entities: ExtractionOptions,
    pub relations: RelationOptions,
    pub taxonomy: TaxonomySection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomySection {
    /// TOML taxonomy definition; the bundled taxonomy when absent.
    /// Relative paths resolve against the config file's directory.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub formats: Vec<ExportFormat>,
    /// Mermaid node cap; 0 renders every node.
    pub max_nodes: usize,
    pub include_legend: bool,
    pub direction: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            formats: vec![ExportFormat::JsonLd, ExportFormat::Mermaid],
            max_nodes: 50,
            include_legend: false,
            direction: "TD".into(),
        }
    }
}

impl ExportSection {
    pub fn mermaid_options(&self) -> MermaidOptions {
        MermaidOptions {
            direction: self.direction.clone(),
            max_nodes: (self.max_nodes > 0).then_some(self.max_nodes),
            ..Default::default()
        }
    }
}

impl ProcessorConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "(inline)".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;

        if let (Some(file), Some(dir)) = (&config.taxonomy.file, path.parent()) {
            if file.is_relative() {
                config.taxonomy.file = Some(dir.join(file));
            }
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let e = &self.entities;
        if e.min_entity_length > e.max_entity_length {
            return Err(ConfigError::Invalid {
                message: format!(
                    "entities.min_entity_length ({}) exceeds entities.max_entity_length ({})",
                    e.min_entity_length, e.max_entity_length
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.relations.min_confidence) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "relations.min_confidence must be within [0, 1], got {}",
                    self.relations.min_confidence
                ),
            });
        }
        if let Some(bad) = self
            .relations
            .custom_patterns
            .iter()
            .find(|p| !(0.0..=1.0).contains(&p.confidence))
        {
            return Err(ConfigError::Invalid {
                message: format!(
                    "relation pattern '{}' has confidence {} outside [0, 1]",
                    bad.pattern, bad.confidence
                ),
            });
        }
        if !matches!(self.export.direction.as_str(), "TD" | "TB" | "LR" | "BT" | "RL") {
            return Err(ConfigError::Invalid {
                message: format!("export.direction '{}' is not a flowchart direction", self.export.direction),
            });
        }
        Ok(())
    }

    /// Load the configured taxonomy, or the bundled one.
    pub fn load_taxonomy(&self) -> NarrativeResult<Taxonomy> {
        match &self.taxonomy.file {
            Some(path) => Taxonomy::from_file(path),
            None => Ok(Taxonomy::default()),
        }
    }

    /// Build a processor from this configuration.
    pub fn build_processor(&self) -> NarrativeResult<NarrativeProcessor> {
        NarrativeProcessor::with_options(ProcessingOptions {
            taxonomy: Some(Arc::new(self.load_taxonomy()?)),
            segmenter: None,
            entities: self.entities.clone(),
            relations: self.relations.clone(),
        })
    }
}
