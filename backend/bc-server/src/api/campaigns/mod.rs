pub mod attempt_dto;
pub mod attempt_list_response;
pub mod campaign_dto;
pub mod campaign_list_response;
pub mod campaign_response;
pub mod campaigns;
pub mod control_response;
pub mod create_campaign_request;
pub mod delivery_dto;
pub mod delivery_list_response;
pub mod list_deliveries_query;
pub mod progress_dto;
pub mod progress_response;
