//! Entity resolution: map a report's identifiers to an entity

use chrono::{DateTime, Utc};
use tracing::info;

use crate::identity::{normalize_emails, normalize_phones, IdentityStore, NewEntity};
use crate::model::{EntityId, EntityType, Identifiers, IncidentLocation};

pub struct EntityResolver<'a> {
    identities: &'a mut IdentityStore,
}

impl<'a> EntityResolver<'a> {
    pub fn new(identities: &'a mut IdentityStore) -> Self {
        Self { identities }
    }

    /// Returns the matching entity untouched, or creates one.
    ///
    /// A match never merges the new contacts or name into the existing
    /// entity.
    pub fn resolve_or_create(
        &mut self,
        identifiers: &Identifiers,
        location: &IncidentLocation,
        now: DateTime<Utc>,
    ) -> EntityId {
        let phones = normalize_phones(&identifiers.phones);
        let emails = normalize_emails(&identifiers.emails);

        if let Some(id) = self.identities.lookup_by_contact(&phones, &emails) {
            return id;
        }

        let business_name = non_blank(identifiers.business_name.as_ref());
        let display_name = business_name
            .clone()
            .or_else(|| non_blank(identifiers.gov_name.as_ref()))
            .unwrap_or_else(|| "Unknown".to_string());
        let entity_type = if business_name.is_some() {
            EntityType::Business
        } else {
            EntityType::Person
        };

        let id = self.identities.create(
            NewEntity {
                display_name,
                entity_type,
                phones,
                emails,
                state: non_blank(location.state.as_ref()),
                city: non_blank(location.city.as_ref()),
            },
            now,
        );
        info!("Created entity {} ({:?})", id, entity_type);
        id
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn identifiers(value: serde_json::Value) -> Identifiers {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_business_name_wins() {
        let mut store = IdentityStore::new();
        let id = EntityResolver::new(&mut store).resolve_or_create(
            &identifiers(json!({
                "business_name": "ABC Web Solutions",
                "gov_name": "John Doe",
                "phones": ["+1 (443) 555-0123"]
            })),
            &IncidentLocation::default(),
            Utc::now(),
        );

        let entity = store.get(id).unwrap();
        assert_eq!(entity.display_name, "ABC Web Solutions");
        assert_eq!(entity.entity_type, EntityType::Business);
    }

    #[test]
    fn test_person_and_unknown_names() {
        let mut store = IdentityStore::new();
        let now = Utc::now();
        let named = EntityResolver::new(&mut store).resolve_or_create(
            &identifiers(json!({ "gov_name": "Jane Roe", "business_name": " ", "phones": ["1"] })),
            &IncidentLocation::default(),
            now,
        );
        let anonymous = EntityResolver::new(&mut store).resolve_or_create(
            &identifiers(json!({ "emails": ["x@example.com"] })),
            &IncidentLocation::default(),
            now,
        );

        assert_eq!(store.get(named).unwrap().display_name, "Jane Roe");
        assert_eq!(store.get(named).unwrap().entity_type, EntityType::Person);
        assert_eq!(store.get(anonymous).unwrap().display_name, "Unknown");
    }

    #[test]
    fn test_location_comes_from_top_level_fields() {
        let mut store = IdentityStore::new();
        let location: IncidentLocation = serde_json::from_value(json!({
            "unknown": true,
            "scammer_origin": { "state": "TX", "city": "Austin" }
        }))
        .unwrap();
        let id = EntityResolver::new(&mut store).resolve_or_create(
            &identifiers(json!({ "phones": ["1"] })),
            &location,
            Utc::now(),
        );
        let entity = store.get(id).unwrap();
        assert_eq!(entity.state, None);
        assert_eq!(entity.city, None);

        let location: IncidentLocation = serde_json::from_value(json!({
            "city": "Baltimore", "state": "MD", "country": "US"
        }))
        .unwrap();
        let id = EntityResolver::new(&mut store).resolve_or_create(
            &identifiers(json!({ "phones": ["2"] })),
            &location,
            Utc::now(),
        );
        let entity = store.get(id).unwrap();
        assert_eq!(entity.state.as_deref(), Some("MD"));
        assert_eq!(entity.city.as_deref(), Some("Baltimore"));
    }

    #[test]
    fn test_match_does_not_merge_contacts() {
        let mut store = IdentityStore::new();
        let now = Utc::now();
        let first = EntityResolver::new(&mut store).resolve_or_create(
            &identifiers(json!({ "business_name": "ABC", "phones": ["1"] })),
            &IncidentLocation::default(),
            now,
        );
        let second = EntityResolver::new(&mut store).resolve_or_create(
            &identifiers(json!({ "business_name": "Other", "phones": ["1"], "emails": ["new@example.com"] })),
            &IncidentLocation::default(),
            now,
        );

        assert_eq!(first, second);
        let entity = store.get(first).unwrap();
        assert_eq!(entity.display_name, "ABC");
        assert!(entity.emails.is_empty());
    }
}
