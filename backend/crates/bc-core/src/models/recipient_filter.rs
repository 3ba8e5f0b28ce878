use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored contact filter of a campaign
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientFilter {
    /// Free text matched against name, phone and email
    #[serde(default)]
    pub search: Option<String>,
    /// Contacts must belong to at least one of these categories
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

impl RecipientFilter {
    /// Trimmed, lowercased search term; `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Category ids in first-seen order without duplicates
    pub fn distinct_categories(&self) -> Vec<Uuid> {
        let mut seen = Vec::with_capacity(self.category_ids.len());
        for id in &self.category_ids {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }
}
