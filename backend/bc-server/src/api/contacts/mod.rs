pub mod categories;
pub mod category_dto;
pub mod category_list_response;
pub mod category_response;
pub mod contact_dto;
pub mod contact_list_response;
pub mod contact_response;
pub mod contacts;
pub mod create_category_request;
pub mod create_contact_request;
