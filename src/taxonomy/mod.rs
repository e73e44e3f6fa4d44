//! Taxonomy-driven classification of short text fragments.
//!
//! A class matches a fragment when any keyword is a case-insensitive substring
//! of it, or any pattern finds a case-insensitive regex match in it. The first
//! matching class in declaration order wins; its confidence is the fraction of
//! that class's keyword + pattern inventory that matched.

pub mod defaults;

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{TaxonomyError, TaxonomyResult};

/// A classification category with its matching rules and display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyClass {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Informational only; no inheritance semantics are applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Serializable description of a whole taxonomy (the TOML/JSON file layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyDefinition {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    pub classes: Vec<TaxonomyClass>,
}

/// Result of [`Taxonomy::classify_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMatch<'a> {
    pub class: &'a TaxonomyClass,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
struct CompiledClass {
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl CompiledClass {
    fn compile(class: &TaxonomyClass) -> TaxonomyResult<Self> {
        let patterns = class
            .patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| TaxonomyError::InvalidPattern {
                        class_id: class.id.clone(),
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<TaxonomyResult<Vec<_>>>()?;
        Ok(Self {
            keywords: class.keywords.iter().map(|k| k.to_lowercase()).collect(),
            patterns,
        })
    }

    /// `(keyword hits, pattern hits)` against an already lowercased fragment.
    fn hits(&self, text: &str, lowered: &str) -> (usize, usize) {
        let keyword_hits = self
            .keywords
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
            .count();
        let pattern_hits = self.patterns.iter().filter(|p| p.is_match(text)).count();
        (keyword_hits, pattern_hits)
    }

    fn inventory(&self) -> usize {
        self.keywords.len() + self.patterns.len()
    }
}

static DEFAULT_TAXONOMY: LazyLock<Taxonomy> = LazyLock::new(|| {
    Taxonomy::new(defaults::default_definition()).expect("bundled taxonomy patterns are valid")
});

/// An immutable, compiled taxonomy.
///
/// Construct once and share by reference; cloning is cheap relative to
/// recompiling patterns.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    definition: TaxonomyDefinition,
    compiled: Vec<CompiledClass>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        DEFAULT_TAXONOMY.clone()
    }
}

impl Taxonomy {
    /// Compile a taxonomy definition.
    ///
    /// Fails on an empty class list, duplicate class ids or a pattern that is
    /// not a valid regex.
    pub fn new(definition: TaxonomyDefinition) -> TaxonomyResult<Self> {
        if definition.classes.is_empty() {
            return Err(TaxonomyError::EmptyTaxonomy);
        }
        let mut seen = HashSet::new();
        for class in &definition.classes {
            if !seen.insert(class.id.as_str()) {
                return Err(TaxonomyError::DuplicateClass {
                    id: class.id.clone(),
                });
            }
        }
        let compiled = definition
            .classes
            .iter()
            .map(CompiledClass::compile)
            .collect::<TaxonomyResult<Vec<_>>>()?;
        tracing::debug!(
            taxonomy = %definition.id,
            classes = compiled.len(),
            "compiled taxonomy"
        );
        Ok(Self {
            definition,
            compiled,
        })
    }

    /// Parse and compile a taxonomy from TOML text.
    pub fn from_toml_str(toml_str: &str) -> TaxonomyResult<Self> {
        let definition: TaxonomyDefinition =
            toml::from_str(toml_str).map_err(|e| TaxonomyError::Parse {
                message: e.to_string(),
            })?;
        Self::new(definition)
    }

    /// Load a taxonomy from a TOML file.
    pub fn from_file(path: &Path) -> crate::error::NarrativeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::ConfigError::Read {
                path: path.display().to_string(),
                source: e,
            }
        })?;
        Ok(Self::from_toml_str(&content)?)
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn version(&self) -> &str {
        &self.definition.version
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    /// Classes in declaration order.
    pub fn classes(&self) -> &[TaxonomyClass] {
        &self.definition.classes
    }

    pub fn definition(&self) -> &TaxonomyDefinition {
        &self.definition
    }

    pub fn get_class(&self, id: &str) -> Option<&TaxonomyClass> {
        self.definition.classes.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn get_class_by_name(&self, name: &str) -> Option<&TaxonomyClass> {
        let name = name.to_lowercase();
        self.definition
            .classes
            .iter()
            .find(|c| c.name.to_lowercase() == name)
    }

    /// Every class matching `text`, in declaration order.
    pub fn find_matching_classes(&self, text: &str) -> Vec<&TaxonomyClass> {
        let lowered = text.to_lowercase();
        self.definition
            .classes
            .iter()
            .zip(&self.compiled)
            .filter(|(_, compiled)| {
                let (k, p) = compiled.hits(text, &lowered);
                k + p > 0
            })
            .map(|(class, _)| class)
            .collect()
    }

    /// Classify `text` against the first matching class. `None` when nothing matches.
    pub fn classify_text(&self, text: &str) -> Option<ClassMatch<'_>> {
        let lowered = text.to_lowercase();
        self.definition
            .classes
            .iter()
            .zip(&self.compiled)
            .find_map(|(class, compiled)| {
                let (k, p) = compiled.hits(text, &lowered);
                let hits = k + p;
                (hits > 0).then(|| ClassMatch {
                    class,
                    confidence: hits as f64 / compiled.inventory() as f64,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_taxonomy_has_ten_classes_in_order() {
        let taxonomy = Taxonomy::default();
        let ids: Vec<_> = taxonomy.classes().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "time-period",
                "cycle-theme",
                "initiative",
                "product-capability",
                "release-launch",
                "customer-segment",
                "insight",
                "goal",
                "target",
                "principle",
            ]
        );
        assert_eq!(taxonomy.id(), "dotwork-default");
        assert_eq!(taxonomy.version(), "1.0.0");
        assert!(taxonomy.classes().iter().all(|c| c.color.is_some()));
    }

    #[test]
    fn classify_time_period_confidence() {
        let taxonomy = Taxonomy::default();
        let m = taxonomy.classify_text("Q2 2024").unwrap();
        assert_eq!(m.class.id, "time-period");
        // keyword "q2", patterns \d{4} and Q[1-4]; inventory 15 + 7.
        assert!((m.confidence - 3.0 / 22.0).abs() < 1e-9);
    }

    #[test]
    fn first_declared_class_wins() {
        let taxonomy = Taxonomy::default();
        // Matches both time-period ("quarter") and goal ("reduce").
        let matches = taxonomy.find_matching_classes("reduce churn this quarter");
        assert!(matches.len() >= 2);
        assert_eq!(matches[0].id, "time-period");
        assert_eq!(
            taxonomy.classify_text("reduce churn this quarter").unwrap().class.id,
            "time-period"
        );
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let taxonomy = Taxonomy::default();
        let m = taxonomy.classify_text("ENTERPRISE accounts").unwrap();
        assert_eq!(m.class.id, "customer-segment");
    }

    #[test]
    fn unmatched_text_yields_none() {
        let taxonomy = Taxonomy::default();
        assert!(taxonomy.classify_text("engineering team").is_none());
        assert!(taxonomy.find_matching_classes("zzz").is_empty());
    }

    #[test]
    fn lookup_by_id_and_name() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.get_class("goal").unwrap().name, "Goal");
        assert_eq!(
            taxonomy.get_class_by_name("customer SEGMENT").unwrap().id,
            "customer-segment"
        );
        assert!(taxonomy.get_class("stakeholder").is_none());
    }

    #[test]
    fn custom_taxonomy_from_toml() {
        let taxonomy = Taxonomy::from_toml_str(
            r#"
            id = "ops"
            name = "Ops"
            version = "0.1.0"

            [[classes]]
            id = "incident"
            name = "Incident"
            keywords = ["outage"]
            patterns = ['sev\d']
            "#,
        )
        .unwrap();
        let m = taxonomy.classify_text("SEV1 outage").unwrap();
        assert_eq!(m.class.id, "incident");
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn invalid_definitions_are_rejected() {
        let mut definition = defaults::default_definition();
        definition.classes[0].patterns.push("(unclosed".into());
        assert!(matches!(
            Taxonomy::new(definition),
            Err(TaxonomyError::InvalidPattern { .. })
        ));

        let mut definition = defaults::default_definition();
        let dup = definition.classes[1].clone();
        definition.classes.push(dup);
        assert!(matches!(
            Taxonomy::new(definition),
            Err(TaxonomyError::DuplicateClass { .. })
        ));

        let mut definition = defaults::default_definition();
        definition.classes.clear();
        assert!(matches!(
            Taxonomy::new(definition),
            Err(TaxonomyError::EmptyTaxonomy)
        ));
    }
}
