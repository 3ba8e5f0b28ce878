use crate::common::{FakeSenderSource, RecordingPublisher, ScriptedTransport};

use bc_core::{Campaign, Category, Contact, Job, RecipientFilter};
use bc_db::{CampaignRepository, ContactRepository, DeliveryRepository, JobRepository};
use bc_dispatch::{
    DispatchEngine, DispatchMetrics, DispatchSettings, EngineParts, RunOutcome,
    ShutdownCoordinator, process_job,
};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

pub const LONG_DELAY: Duration = Duration::from_secs(10);

/// Zero delays, small batches, short send timeout
pub fn fast_settings() -> DispatchSettings {
    DispatchSettings {
        batch_size: 2,
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        send_timeout: Duration::from_millis(200),
        worker_pool_size: 2,
        poll_interval: Duration::from_millis(20),
        max_sends_per_minute: 0,
    }
}

/// Long inter-recipient delay, so a run can be halted between recipients
pub fn slow_settings() -> DispatchSettings {
    DispatchSettings {
        min_delay: LONG_DELAY,
        max_delay: LONG_DELAY,
        ..fast_settings()
    }
}

pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    bc_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// An engine over in-memory SQLite with fake collaborators
pub struct TestEngine {
    pub pool: SqlitePool,
    pub engine: DispatchEngine,
    pub transport: Arc<ScriptedTransport>,
    pub senders: Arc<FakeSenderSource>,
    pub publisher: Arc<RecordingPublisher>,
    pub shutdown: ShutdownCoordinator,
    pub owner_id: Uuid,
    contacts_added: usize,
}

impl TestEngine {
    pub async fn new(transport: ScriptedTransport, senders: FakeSenderSource) -> Self {
        Self::with_settings(transport, senders, fast_settings()).await
    }

    pub async fn with_settings(
        transport: ScriptedTransport,
        senders: FakeSenderSource,
        settings: DispatchSettings,
    ) -> Self {
        let pool = create_test_pool().await;
        let transport = Arc::new(transport);
        let senders = Arc::new(senders);
        let publisher = Arc::new(RecordingPublisher::default());
        let shutdown = ShutdownCoordinator::new();

        let engine = build_engine(
            &pool,
            transport.clone(),
            senders.clone(),
            publisher.clone(),
            settings,
            shutdown.clone(),
        );

        Self {
            pool,
            engine,
            transport,
            senders,
            publisher,
            shutdown,
            owner_id: Uuid::new_v4(),
            contacts_added: 0,
        }
    }

    /// Same database and fakes, different settings
    pub fn rebuild(&self, settings: DispatchSettings) -> DispatchEngine {
        build_engine(
            &self.pool,
            self.transport.clone(),
            self.senders.clone(),
            self.publisher.clone(),
            settings,
            self.shutdown.clone(),
        )
    }

    pub fn campaigns(&self) -> CampaignRepository {
        CampaignRepository::new(self.pool.clone())
    }

    pub fn deliveries(&self) -> DeliveryRepository {
        DeliveryRepository::new(self.pool.clone())
    }

    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(self.pool.clone())
    }

    pub async fn add_category(&self, name: &str) -> Category {
        let category = Category::new(self.owner_id, name);
        ContactRepository::new(self.pool.clone())
            .create_category(&category)
            .await
            .expect("Failed to insert category");
        category
    }

    /// Contacts keep insertion order
    pub async fn add_contact(
        &mut self,
        name: &str,
        phone: Option<&str>,
        category_ids: &[Uuid],
    ) -> Contact {
        let mut contact = Contact::new(self.owner_id, name, phone, None);
        contact.created_at =
            Utc::now() + chrono::Duration::milliseconds(self.contacts_added as i64);
        contact.category_ids = category_ids.to_vec();
        self.contacts_added += 1;

        ContactRepository::new(self.pool.clone())
            .create_contact(&contact)
            .await
            .expect("Failed to insert contact");
        contact
    }

    /// `count` contacts named C0.. with phones +1000..
    pub async fn add_contacts(&mut self, count: usize) -> Vec<Contact> {
        let mut contacts = Vec::with_capacity(count);
        for i in 0..count {
            let phone = format!("+{}", 1000 + i);
            contacts.push(self.add_contact(&format!("C{}", i), Some(&phone), &[]).await);
        }
        contacts
    }

    pub async fn create_campaign(&self, message: &str, filter: RecipientFilter) -> Campaign {
        self.engine
            .service()
            .create(
                self.owner_id,
                "Launch".to_string(),
                message.to_string(),
                filter,
            )
            .await
            .expect("Failed to create campaign")
    }

    /// Create and start a campaign over every contact
    pub async fn started_campaign(&self, message: &str) -> Campaign {
        let campaign = self.create_campaign(message, RecipientFilter::default()).await;
        self.engine
            .service()
            .start(self.owner_id, campaign.id)
            .await
            .expect("Failed to start campaign");
        campaign
    }

    pub async fn claim(&self) -> Job {
        self.engine
            .queue()
            .claim()
            .await
            .expect("Failed to claim")
            .expect("No job to claim")
    }

    /// Claim the next job and run it to completion the way the runner does
    pub async fn claim_and_process(&self) -> Option<RunOutcome> {
        let job = self.claim().await;
        process_job(
            self.engine.worker(),
            self.engine.queue(),
            &self.campaigns(),
            self.engine.tracker(),
            &DispatchMetrics::new(),
            &job,
        )
        .await
    }

    pub async fn campaign(&self, id: Uuid) -> Campaign {
        self.campaigns()
            .find_by_id(id)
            .await
            .expect("Failed to load campaign")
            .expect("Campaign missing")
    }
}

fn build_engine(
    pool: &SqlitePool,
    transport: Arc<ScriptedTransport>,
    senders: Arc<FakeSenderSource>,
    publisher: Arc<RecordingPublisher>,
    settings: DispatchSettings,
    shutdown: ShutdownCoordinator,
) -> DispatchEngine {
    DispatchEngine::new(
        pool.clone(),
        EngineParts {
            contacts: Arc::new(ContactRepository::new(pool.clone())),
            transport,
            senders,
            publisher,
        },
        settings,
        shutdown,
    )
}
