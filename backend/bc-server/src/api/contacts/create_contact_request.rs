use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,

    /// Contacts without a phone are skipped when a campaign resolves
    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Must all belong to the caller
    #[serde(default)]
    pub category_ids: Vec<String>,
}
