//! Turns a stored campaign filter into the ordered recipient snapshot.

use bc_core::{CollaboratorError, Contact, ContactStore, Recipient, RecipientFilter};

use std::collections::HashSet;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Unknown category: {category_id} {location}")]
    UnknownCategory {
        category_id: Uuid,
        location: ErrorLocation,
    },

    #[error("Contact store error: {source} {location}")]
    Store {
        source: CollaboratorError,
        location: ErrorLocation,
    },
}

impl From<CollaboratorError> for ResolutionError {
    #[track_caller]
    fn from(source: CollaboratorError) -> Self {
        Self::Store {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

#[derive(Clone)]
pub struct RecipientResolver {
    store: Arc<dyn ContactStore>,
}

impl RecipientResolver {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Resolve `filter` against the owner's contacts.
    ///
    /// Category membership is applied before the text search. Store order
    /// is preserved; destinations are unique, first occurrence wins.
    pub async fn resolve(
        &self,
        owner_id: Uuid,
        filter: &RecipientFilter,
    ) -> Result<Vec<Recipient>, ResolutionError> {
        let categories = filter.distinct_categories();

        if !categories.is_empty() {
            let owned = self.store.owned_categories(owner_id, &categories).await?;
            if let Some(unknown) = categories.iter().find(|id| !owned.contains(id)) {
                return Err(ResolutionError::UnknownCategory {
                    category_id: *unknown,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        let search = filter.search_term();
        let contacts = self.store.contacts(owner_id).await?;

        let mut seen = HashSet::new();
        let recipients: Vec<Recipient> = contacts
            .iter()
            .filter(|c| in_categories(c, &categories))
            .filter(|c| matches_search(c, search.as_deref()))
            .filter_map(|c| {
                let destination = c.phone.as_deref().and_then(normalize_destination)?;
                seen.insert(destination.clone())
                    .then(|| Recipient::new(c.id, c.name.trim(), destination))
            })
            .collect();

        log::debug!(
            "Resolved {} recipients from {} contacts for owner {}",
            recipients.len(),
            contacts.len(),
            owner_id
        );

        Ok(recipients)
    }
}

fn in_categories(contact: &Contact, categories: &[Uuid]) -> bool {
    categories.is_empty() || contact.category_ids.iter().any(|id| categories.contains(id))
}

fn matches_search(contact: &Contact, term: Option<&str>) -> bool {
    let Some(term) = term else {
        return true;
    };

    std::iter::once(Some(contact.name.as_str()))
        .chain([contact.phone.as_deref(), contact.email.as_deref()])
        .flatten()
        .any(|field| field.to_lowercase().contains(term))
}

/// Strip formatting from a phone number.
///
/// Keeps a single leading `+`; `None` when no digit remains or any other
/// character is present.
pub fn normalize_destination(phone: &str) -> Option<String> {
    let stripped: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')' | '.'))
        .collect();

    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(stripped)
}
