use std::collections::HashMap;

use crate::EntityModel;

/// A normalized table of entities: ID to entity, plus an ordered ID list for
/// stable default iteration. The single source of truth for entity data.
///
/// All operations are pure: they leave `self` untouched and return the next
/// table. No I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTable<T> {
    entities: HashMap<String, T>,
    ids: Vec<String>,
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            ids: Vec::new(),
        }
    }
}

impl<T: EntityModel + Clone> EntityTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the entity, replacing any existing entry with the same ID.
    pub fn upsert_one(&self, entity: T) -> Self {
        let mut next = self.clone();
        next.insert(entity);
        next
    }

    /// Upserts a batch of entities in order.
    pub fn upsert_many(&self, entities: impl IntoIterator<Item = T>) -> Self {
        let mut next = self.clone();
        for entity in entities {
            next.insert(entity);
        }
        next
    }

    /// Adds a new entity. A no-op if an entity with the same ID is already
    /// present.
    pub fn add_one(&self, entity: T) -> Self {
        if self.entities.contains_key(entity.id()) {
            return self.clone();
        }
        self.upsert_one(entity)
    }

    /// Replaces the entity stored under `id`. A no-op if no such entity
    /// exists; use [`upsert_one`](EntityTable::upsert_one) to create.
    pub fn update_one(&self, id: &str, entity: T) -> Self {
        if !self.entities.contains_key(id) {
            return self.clone();
        }
        let mut next = self.clone();
        next.entities.insert(id.to_string(), entity);
        next
    }

    /// Removes the entity stored under `id`, if present.
    pub fn remove_one(&self, id: &str) -> Self {
        let mut next = self.clone();
        if next.entities.remove(id).is_some() {
            next.ids.retain(|existing| existing != id);
        }
        next
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entities.get(id)
    }

    /// Entity IDs in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// All entities in insertion order.
    pub fn all(&self) -> Vec<&T> {
        self.ids.iter().filter_map(|id| self.entities.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn insert(&mut self, entity: T) {
        let id = entity.id().to_string();
        if self.entities.insert(id.clone(), entity).is_none() {
            self.ids.push(id);
        }
    }
}
