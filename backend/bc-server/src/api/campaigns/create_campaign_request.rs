use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,

    /// Template; `{name}` and `{phone}` are filled per recipient
    pub message: String,

    /// Free text matched against contact name, phone and email
    #[serde(default)]
    pub search: Option<String>,

    /// Contacts must belong to at least one of these categories
    #[serde(default)]
    pub category_ids: Vec<String>,
}
