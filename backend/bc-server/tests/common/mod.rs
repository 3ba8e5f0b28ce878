#![allow(dead_code)]

//! Test infrastructure for bc-server API tests

use bc_core::{
    Category, CollaboratorError, CollaboratorResult, Contact, ContactStore, DeliveryReceipt,
    MessageTransport, SenderIdentity, TransportError,
};
use bc_db::ContactRepository;
use bc_dispatch::{
    BroadcastConfig, CampaignBroadcaster, DispatchEngine, DispatchSettings, EngineParts,
    ShutdownCoordinator,
};
use bc_gateway::StaticSenderSource;
use bc_server::AppState;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;
use uuid::Uuid;

pub const DEFAULT_USER: &str = "00000000-0000-0000-0000-000000000001";
pub const OTHER_USER: &str = "00000000-0000-0000-0000-000000000002";

/// Accepts every message
#[derive(Default)]
pub struct AcceptingTransport {
    sent: AtomicUsize,
}

impl AcceptingTransport {
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageTransport for AcceptingTransport {
    async fn send(
        &self,
        _sender_id: &str,
        _destination: &str,
        _text: &str,
    ) -> Result<DeliveryReceipt, TransportError> {
        let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(DeliveryReceipt {
            provider_message_id: Some(format!("msg-{}", n)),
        })
    }
}

/// Contact store whose every call fails as if the database were down
pub struct UnavailableContactStore;

#[async_trait]
impl ContactStore for UnavailableContactStore {
    async fn owned_categories(
        &self,
        _owner_id: Uuid,
        _category_ids: &[Uuid],
    ) -> CollaboratorResult<Vec<Uuid>> {
        Err(CollaboratorError::unavailable("contact store", "connection refused"))
    }

    async fn contacts(&self, _owner_id: Uuid) -> CollaboratorResult<Vec<Contact>> {
        Err(CollaboratorError::unavailable("contact store", "connection refused"))
    }
}

pub struct TestServer {
    pub state: AppState,
    pub senders: StaticSenderSource,
    pub transport: Arc<AcceptingTransport>,
}

/// Create a test pool with in-memory SQLite
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(":memory:")
                .foreign_keys(true),
        )
        .await
        .expect("Failed to create test database");

    bc_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn fast_settings() -> DispatchSettings {
    DispatchSettings {
        batch_size: 2,
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        send_timeout: Duration::from_millis(500),
        worker_pool_size: 2,
        poll_interval: Duration::from_millis(20),
        max_sends_per_minute: 0,
    }
}

/// App state with one usable sender and an accepting transport
pub async fn create_test_server() -> TestServer {
    create_test_server_with_store(None).await
}

/// Same as [`create_test_server`], resolving recipients through `store`
/// instead of the SQLite contact repository when given
pub async fn create_test_server_with_store(store: Option<Arc<dyn ContactStore>>) -> TestServer {
    let pool = create_test_pool().await;
    let senders = StaticSenderSource::new(vec![SenderIdentity::new("s1", "+15550001", true)]);
    let transport = Arc::new(AcceptingTransport::default());
    let broadcaster = CampaignBroadcaster::new(BroadcastConfig::default());
    let contacts = ContactRepository::new(pool.clone());
    let shutdown = ShutdownCoordinator::new();

    let engine = DispatchEngine::new(
        pool.clone(),
        EngineParts {
            contacts: store.unwrap_or_else(|| Arc::new(contacts.clone())),
            transport: transport.clone(),
            senders: Arc::new(senders.clone()),
            publisher: Arc::new(broadcaster.clone()),
        },
        fast_settings(),
        shutdown.clone(),
    );

    let state = AppState {
        pool,
        engine,
        broadcaster,
        contacts,
        default_user_id: Uuid::parse_str(DEFAULT_USER).unwrap(),
        shutdown,
        metrics: None,
    };

    TestServer {
        state,
        senders,
        transport,
    }
}

pub async fn create_test_app_state() -> AppState {
    create_test_server().await.state
}

/// Insert `count` contacts for `owner`, optionally in one category
pub async fn create_test_contacts(
    state: &AppState,
    owner: &str,
    count: usize,
    category: Option<Uuid>,
) -> Vec<Uuid> {
    let owner_id = Uuid::parse_str(owner).unwrap();
    let mut ids = Vec::with_capacity(count);

    for i in 0..count {
        let mut contact = Contact::new(
            owner_id,
            &format!("Contact {}", i),
            Some(&format!("+1555{:07}", i)),
            None,
        );
        contact.created_at += chrono::Duration::milliseconds(i as i64);
        if let Some(category_id) = category {
            contact.category_ids.push(category_id);
        }
        state.contacts.create_contact(&contact).await.unwrap();
        ids.push(contact.id);
    }

    ids
}

pub async fn create_test_category(state: &AppState, owner: &str, name: &str) -> Uuid {
    let category = Category::new(Uuid::parse_str(owner).unwrap(), name);
    state.contacts.create_category(&category).await.unwrap();
    category.id
}

/// Send one request through the router and decode the JSON body
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user);
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Create a draft campaign through the API and return its id
pub async fn create_test_campaign(app: Router, user: &str, body: serde_json::Value) -> String {
    let (status, json) = send_json(app, "POST", "/api/v1/campaigns", Some(user), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", json);
    json["campaign"]["id"].as_str().unwrap().to_string()
}
