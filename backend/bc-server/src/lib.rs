pub mod api;
pub mod app_state;
pub mod error;
pub mod health;
pub mod logger;
pub mod progress_socket;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    campaigns::{
        attempt_dto::AttemptDto,
        attempt_list_response::AttemptListResponse,
        campaign_dto::CampaignDto,
        campaign_list_response::CampaignListResponse,
        campaign_response::CampaignResponse,
        campaigns::{
            create_campaign, get_campaign, get_progress, list_attempts, list_campaigns,
            list_deliveries, pause_campaign, resume_campaign, start_campaign, stop_campaign,
        },
        control_response::ControlResponse,
        create_campaign_request::CreateCampaignRequest,
        delivery_dto::DeliveryDto,
        delivery_list_response::DeliveryListResponse,
        list_deliveries_query::ListDeliveriesQuery,
        progress_dto::ProgressDto,
        progress_response::ProgressResponse,
    },
    contacts::{
        categories::{create_category, list_categories},
        category_dto::CategoryDto,
        category_list_response::CategoryListResponse,
        category_response::CategoryResponse,
        contact_dto::ContactDto,
        contact_list_response::ContactListResponse,
        contact_response::ContactResponse,
        contacts::{create_contact, list_contacts},
        create_category_request::CreateCategoryRequest,
        create_contact_request::CreateContactRequest,
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::user_id::UserId,
};
pub use app_state::AppState;
pub use error::{Result as ServerResult, ServerError};
pub use progress_socket::progress_socket;
pub use routes::build_router;
