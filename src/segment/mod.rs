//! Sentence and candidate-phrase segmentation.
//!
//! Extraction only needs two things from a segmenter: the sentences of a text
//! and four lists of candidate phrases. Both must be literal substrings of the
//! input. [`RuleSegmenter`] is the bundled deterministic implementation; any
//! other [`Segmenter`] can be plugged into the extractors instead.

pub mod lexicon;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::error::ExtractResult;

pub use lexicon::Lexicon;
pub use rules::RuleSegmenter;

/// Candidate surface forms found in a text, each in occurrence order.
///
/// Duplicates are allowed; deduplication happens during entity extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidates {
    pub noun_phrases: Vec<String>,
    pub people: Vec<String>,
    pub places: Vec<String>,
    pub organizations: Vec<String>,
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        self.noun_phrases.is_empty()
            && self.people.is_empty()
            && self.places.is_empty()
            && self.organizations.is_empty()
    }
}

/// A natural-language segmentation capability.
pub trait Segmenter: Send + Sync + std::fmt::Debug {
    /// Split `text` into sentences. Each returned sentence must occur verbatim in `text`.
    fn sentences(&self, text: &str) -> ExtractResult<Vec<String>>;

    /// Detect noun phrases and named entities in `text`.
    fn candidates(&self, text: &str) -> ExtractResult<Candidates>;
}
