pub mod collaborators;
pub mod error;
pub mod models;
pub mod personalize;

pub use collaborators::contact_store::ContactStore;
pub use collaborators::error::{CollaboratorError, CollaboratorResult};
pub use collaborators::message_transport::{
    DeliveryReceipt, FailureKind, MessageTransport, TransportError,
};
pub use collaborators::progress_publisher::ProgressPublisher;
pub use collaborators::sender_source::SenderSource;
pub use error::{CoreError, Result};
pub use models::campaign::Campaign;
pub use models::campaign_status::{ActionOutcome, CampaignStatus};
pub use models::contact::{Category, Contact};
pub use models::delivery_attempt::{AttemptOutcome, DeliveryAttempt};
pub use models::delivery_record::DeliveryRecord;
pub use models::delivery_status::DeliveryStatus;
pub use models::job::Job;
pub use models::job_action::JobAction;
pub use models::job_state::JobState;
pub use models::progress::{
    DeliveryCounts, ProgressEvent, ProgressEventKind, ProgressSnapshot, RecipientOutcome,
};
pub use models::recipient::Recipient;
pub use models::recipient_filter::RecipientFilter;
pub use models::sender_identity::SenderIdentity;
pub use personalize::render_message;

#[cfg(test)]
mod tests;
