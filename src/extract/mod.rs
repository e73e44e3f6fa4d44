//! Entity and relation extraction.

pub mod entity;
mod patterns;
pub mod relation;

pub use entity::{EntityExtractor, ExtractionOptions};
pub use relation::{Direction, PatternSpec, RelationExtractor, RelationOptions, RelationPattern};
