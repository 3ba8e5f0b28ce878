use bc_db::ContactRepository;
use bc_dispatch::{CampaignBroadcaster, CampaignService, DispatchEngine, ShutdownCoordinator};

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Shared state of every HTTP and WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub engine: DispatchEngine,
    pub broadcaster: CampaignBroadcaster,
    pub contacts: ContactRepository,
    /// Owner used when a request carries no `X-User-Id`
    pub default_user_id: Uuid,
    pub shutdown: ShutdownCoordinator,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn campaigns(&self) -> &CampaignService {
        self.engine.service()
    }
}
