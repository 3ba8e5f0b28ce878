mod api;

use crate::AppState;

use bc_db::ContactRepository;
use bc_dispatch::{
    BroadcastConfig, CampaignBroadcaster, DispatchEngine, DispatchSettings, EngineParts,
    ShutdownCoordinator,
};
use bc_gateway::{GatewayClient, HttpMessageTransport, StaticSenderSource};

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

pub const DEFAULT_USER: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

/// State over an in-memory database; the gateway is never reached
pub async fn create_test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(SqliteConnectOptions::new().filename(":memory:"))
        .await
        .expect("Failed to create test pool");

    bc_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let gateway = GatewayClient::new("http://127.0.0.1:9", Duration::from_secs(1), Vec::new())
        .expect("Failed to build gateway client");
    let broadcaster = CampaignBroadcaster::new(BroadcastConfig::default());
    let contacts = ContactRepository::new(pool.clone());
    let shutdown = ShutdownCoordinator::new();

    let engine = DispatchEngine::new(
        pool.clone(),
        EngineParts {
            contacts: Arc::new(contacts.clone()),
            transport: Arc::new(HttpMessageTransport::new(gateway)),
            senders: Arc::new(StaticSenderSource::default()),
            publisher: Arc::new(broadcaster.clone()),
        },
        DispatchSettings::default(),
        shutdown.clone(),
    );

    AppState {
        pool,
        engine,
        broadcaster,
        contacts,
        default_user_id: DEFAULT_USER,
        shutdown,
        metrics: None,
    }
}
