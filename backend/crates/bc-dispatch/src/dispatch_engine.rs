use crate::{
    CampaignService, ControlSignals, DispatchSettings, DispatchWorker, JobQueue, JobRunner,
    ProgressTracker, RecipientResolver, SenderPool, ShutdownCoordinator,
};

use bc_core::{ContactStore, MessageTransport, ProgressPublisher, SenderSource};
use bc_db::{CampaignRepository, DeliveryRepository, JobRepository};

use std::sync::Arc;

use sqlx::SqlitePool;

/// Collaborators the engine is built from
pub struct EngineParts {
    pub contacts: Arc<dyn ContactStore>,
    pub transport: Arc<dyn MessageTransport>,
    pub senders: Arc<dyn SenderSource>,
    pub publisher: Arc<dyn ProgressPublisher>,
}

/// Wires repositories, worker, queue and control service over one pool
#[derive(Clone)]
pub struct DispatchEngine {
    service: CampaignService,
    worker: DispatchWorker,
    queue: JobQueue,
    campaigns: CampaignRepository,
    tracker: ProgressTracker,
    settings: DispatchSettings,
    shutdown: ShutdownCoordinator,
}

impl DispatchEngine {
    pub fn new(
        pool: SqlitePool,
        parts: EngineParts,
        settings: DispatchSettings,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let campaigns = CampaignRepository::new(pool.clone());
        let deliveries = DeliveryRepository::new(pool.clone());
        let queue = JobQueue::new(JobRepository::new(pool), campaigns.clone());

        let tracker = ProgressTracker::new(
            campaigns.clone(),
            deliveries.clone(),
            parts.publisher,
            settings.mean_delay_secs(),
        );
        let sender_pool = SenderPool::new(parts.senders);
        let signals = ControlSignals::new();

        let worker = DispatchWorker::new(
            campaigns.clone(),
            deliveries.clone(),
            sender_pool.clone(),
            parts.transport,
            tracker.clone(),
            signals.clone(),
            shutdown.clone(),
            settings.clone(),
        );

        let service = CampaignService::new(
            campaigns.clone(),
            deliveries,
            queue.clone(),
            RecipientResolver::new(parts.contacts),
            sender_pool,
            tracker.clone(),
            signals,
        );

        Self {
            service,
            worker,
            queue,
            campaigns,
            tracker,
            settings,
            shutdown,
        }
    }

    pub fn service(&self) -> &CampaignService {
        &self.service
    }

    pub fn worker(&self) -> &DispatchWorker {
        &self.worker
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn runner(&self) -> JobRunner {
        JobRunner::new(
            self.queue.clone(),
            self.worker.clone(),
            self.campaigns.clone(),
            self.tracker.clone(),
            self.settings.worker_pool_size,
            self.settings.poll_interval,
            self.shutdown.clone(),
        )
    }
}
