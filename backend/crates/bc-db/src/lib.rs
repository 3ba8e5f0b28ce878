pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::{connect, run_migrations};
pub use error::{DbError, Result};
pub use repositories::campaign_repository::CampaignRepository;
pub use repositories::contact_repository::ContactRepository;
pub use repositories::delivery_repository::DeliveryRepository;
pub use repositories::job_repository::JobRepository;
