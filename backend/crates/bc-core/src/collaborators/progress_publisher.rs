use crate::ProgressEvent;

use async_trait::async_trait;
use uuid::Uuid;

/// Push channel towards real-time subscribers
#[async_trait]
pub trait ProgressPublisher: Send + Sync {
    /// Publish an event; returns the number of receivers reached
    async fn publish(&self, campaign_id: Uuid, event: ProgressEvent) -> usize;
}
