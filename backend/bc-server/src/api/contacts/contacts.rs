//! Contact REST API handlers
//!
//! Contacts are the address book campaigns resolve their recipients from.

use crate::{
    ApiError, ApiResult, AppState, ContactDto, ContactListResponse, ContactResponse,
    CreateContactRequest, UserId,
};

use bc_core::Contact;

use axum::{Json, extract::State};
use uuid::Uuid;

const MAX_CONTACT_NAME_LENGTH: usize = 200;

/// GET /api/v1/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> ApiResult<Json<ContactListResponse>> {
    let contacts = state.contacts.find_by_owner(user_id).await?;

    Ok(Json(ContactListResponse {
        contacts: contacts.into_iter().map(ContactDto::from).collect(),
    }))
}

/// POST /api/v1/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<CreateContactRequest>,
) -> ApiResult<Json<ContactResponse>> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > MAX_CONTACT_NAME_LENGTH {
        return Err(ApiError::validation(
            format!("Contact name must be 1-{} characters", MAX_CONTACT_NAME_LENGTH),
            Some("name"),
        ));
    }

    let mut category_ids = Vec::with_capacity(req.category_ids.len());
    for raw in &req.category_ids {
        let id = Uuid::parse_str(raw.trim()).map_err(|e| {
            ApiError::validation(format!("Invalid category id: {}", e), Some("category_ids"))
        })?;
        if !category_ids.contains(&id) {
            category_ids.push(id);
        }
    }

    let owned = state
        .contacts
        .find_owned_categories(user_id, &category_ids)
        .await?;
    if let Some(unknown) = category_ids.iter().find(|id| !owned.contains(id)) {
        return Err(ApiError::validation(
            format!("Unknown category: {}", unknown),
            Some("category_ids"),
        ));
    }

    let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let email = req.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

    let mut contact = Contact::new(user_id, name, phone, email);
    contact.category_ids = category_ids;
    state.contacts.create_contact(&contact).await?;

    Ok(Json(ContactResponse {
        contact: contact.into(),
    }))
}
