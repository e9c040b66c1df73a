//! Identity store: entity records with exact-match contact lookup

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{Entity, EntityId, EntityType};

/// Fields needed to create an entity
#[derive(Debug, Clone)]
pub struct NewEntity {
    pub display_name: String,
    pub entity_type: EntityType,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// Entities in insertion order. Lookups walk that order, so the oldest
/// matching entity wins when several share a contact.
#[derive(Debug, Default)]
pub struct IdentityStore {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// First entity sharing any phone (exact) or e-mail (case-insensitive)
    pub fn lookup_by_contact(&self, phones: &[String], emails: &[String]) -> Option<EntityId> {
        let emails: Vec<String> = emails.iter().map(|e| e.to_lowercase()).collect();

        let found = self.entities.iter().find(|entity| {
            entity.phones.iter().any(|p| phones.contains(p))
                || entity
                    .emails
                    .iter()
                    .any(|e| emails.contains(&e.to_lowercase()))
        });

        debug!(
            "Contact lookup ({} phones, {} emails): {:?}",
            phones.len(),
            emails.len(),
            found.map(|e| e.id)
        );
        found.map(|e| e.id)
    }

    /// Inserts a new entity. Identifiers already held by another entity are
    /// not checked for.
    pub fn create(&mut self, new: NewEntity, now: DateTime<Utc>) -> EntityId {
        let id = EntityId::new();
        self.index.insert(id, self.entities.len());
        self.entities.push(Entity {
            id,
            display_name: new.display_name,
            entity_type: new.entity_type,
            phones: new.phones,
            emails: new.emails,
            state: new.state,
            city: new.city,
            report_count: 0,
            created_at: now,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    pub(crate) fn set_report_count(&mut self, id: EntityId, count: usize) {
        if let Some(&i) = self.index.get(&id) {
            self.entities[i].report_count = count;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Trims phones and drops blanks and repeats
pub fn normalize_phones(phones: &[String]) -> Vec<String> {
    dedup_by_key(phones, |p| p.to_string())
}

/// Trims e-mails and drops blanks and case-insensitive repeats
pub fn normalize_emails(emails: &[String]) -> Vec<String> {
    dedup_by_key(emails, |e| e.to_lowercase())
}

fn dedup_by_key(values: &[String], key: impl Fn(&str) -> String) -> Vec<String> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        let k = key(value);
        if !seen.contains(&k) {
            seen.push(k);
            out.push(value.to_string());
        }
    }
    out
}
