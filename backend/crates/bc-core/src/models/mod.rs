pub mod campaign;
pub mod campaign_status;
pub mod contact;
pub mod delivery_attempt;
pub mod delivery_record;
pub mod delivery_status;
pub mod job;
pub mod job_action;
pub mod job_state;
pub mod progress;
pub mod recipient;
pub mod recipient_filter;
pub mod sender_identity;
