use crate::{BroadcastConfig, BroadcastMessage, DispatchMetrics};

use bc_core::{ProgressEvent, ProgressPublisher};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

/// Fans progress events out to every live subscriber of a campaign.
///
/// Channels are created on first subscribe and dropped with the last
/// subscriber; events for a campaign nobody watches are discarded.
#[derive(Clone)]
pub struct CampaignBroadcaster {
    inner: Arc<RwLock<BroadcasterInner>>,
    config: BroadcastConfig,
    metrics: DispatchMetrics,
}

struct BroadcasterInner {
    channels: HashMap<Uuid, CampaignChannel>,
}

struct CampaignChannel {
    sender: broadcast::Sender<BroadcastMessage>,
    subscriber_count: usize,
}

impl CampaignBroadcaster {
    pub fn new(config: BroadcastConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(BroadcasterInner {
                channels: HashMap::new(),
            })),
            config,
            metrics: DispatchMetrics::new(),
        }
    }

    pub async fn subscribe(&self, campaign_id: Uuid) -> broadcast::Receiver<BroadcastMessage> {
        let mut inner = self.inner.write().await;

        let channel = inner.channels.entry(campaign_id).or_insert_with(|| {
            let (sender, _) = broadcast::channel(self.config.channel_capacity);
            log::debug!("Created progress channel for campaign {}", campaign_id);
            CampaignChannel {
                sender,
                subscriber_count: 0,
            }
        });

        channel.subscriber_count += 1;
        log::debug!(
            "Subscribed to campaign {} progress ({} subscribers)",
            campaign_id,
            channel.subscriber_count
        );

        channel.sender.subscribe()
    }

    pub async fn unsubscribe(&self, campaign_id: Uuid) {
        let mut inner = self.inner.write().await;

        if let Some(channel) = inner.channels.get_mut(&campaign_id) {
            channel.subscriber_count = channel.subscriber_count.saturating_sub(1);

            if channel.subscriber_count == 0 {
                inner.channels.remove(&campaign_id);
                log::debug!("Removed progress channel for campaign {}", campaign_id);
            }
        }
    }

    /// Send to current subscribers; returns how many received it
    pub async fn broadcast(&self, campaign_id: Uuid, message: BroadcastMessage) -> usize {
        let inner = self.inner.read().await;

        let Some(channel) = inner.channels.get(&campaign_id) else {
            return 0;
        };

        let message_type = message.message_type;
        // Err only means no live receiver
        let receivers = channel.sender.send(message).unwrap_or(0);
        self.metrics.broadcast_published(message_type, receivers);
        receivers
    }

    pub async fn subscriber_count(&self, campaign_id: Uuid) -> usize {
        let inner = self.inner.read().await;
        inner
            .channels
            .get(&campaign_id)
            .map(|c| c.subscriber_count)
            .unwrap_or(0)
    }

    pub async fn channel_count(&self) -> usize {
        self.inner.read().await.channels.len()
    }
}

impl Default for CampaignBroadcaster {
    fn default() -> Self {
        Self::new(BroadcastConfig::default())
    }
}

#[async_trait]
impl ProgressPublisher for CampaignBroadcaster {
    async fn publish(&self, campaign_id: Uuid, event: ProgressEvent) -> usize {
        match BroadcastMessage::from_event(&event) {
            Ok(message) => self.broadcast(campaign_id, message).await,
            Err(e) => {
                log::error!("Failed to serialize progress event for {}: {}", campaign_id, e);
                0
            }
        }
    }
}

