//! A source text together with the entities and relations extracted from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, Attributes, Entity, Relation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    id: String,
    text: String,
    entities: Vec<Entity>,
    relations: Vec<Relation>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    metadata: Attributes,
}

impl Narrative {
    /// Create an empty narrative. A fresh id is generated when `id` is `None`.
    pub fn new(text: impl Into<String>, id: Option<&str>, metadata: Attributes) -> Self {
        let now = Utc::now();
        Self {
            id: id.map_or_else(|| generate_id("narrative"), str::to_string),
            text: text.into(),
            entities: Vec::new(),
            relations: Vec::new(),
            created_at: now,
            updated_at: now,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Relations in insertion order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
        self.touch();
    }

    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
        self.touch();
    }

    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_relation(&self, id: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.id() == id)
    }

    /// Entities whose classification type equals `class_type`.
    pub fn entities_by_type<'a>(&'a self, class_type: &'a str) -> impl Iterator<Item = &'a Entity> {
        self.entities
            .iter()
            .filter(move |e| e.class_type() == Some(class_type))
    }

    pub fn relations_by_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Relation> {
        self.relations.iter().filter(move |r| r.label() == label)
    }

    fn touch(&mut self) {
        // Never move backwards, even if the wall clock does.
        self.updated_at = Utc::now().max(self.updated_at);
    }
}
