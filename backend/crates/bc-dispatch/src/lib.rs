//! Campaign dispatch: recipient resolution, the durable job queue, the
//! per-campaign delivery worker and real-time progress fan-out.

pub mod broadcast;
pub mod campaign_service;
pub mod control_signals;
pub mod dispatch_engine;
pub mod dispatch_worker;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod progress_tracker;
pub mod recipient_resolver;
pub mod send_quota;
pub mod sender_pool;
pub mod settings;
pub mod shutdown_coordinator;
pub mod shutdown_guard;

pub use broadcast::broadcast_config::BroadcastConfig;
pub use broadcast::broadcast_message::BroadcastMessage;
pub use broadcast::campaign_broadcaster::CampaignBroadcaster;
pub use campaign_service::{CampaignService, ControlOutcome};
pub use control_signals::{ControlHandle, ControlSignals};
pub use dispatch_engine::{DispatchEngine, EngineParts};
pub use dispatch_worker::{DispatchWorker, NO_SENDER_REASON, RunOutcome, jittered_delay};
pub use error::{DispatchError, Result};
pub use jobs::job_queue::{JobQueue, Recovery};
pub use jobs::job_runner::{JobRunner, process_job};
pub use metrics::DispatchMetrics;
pub use progress_tracker::ProgressTracker;
pub use recipient_resolver::{RecipientResolver, ResolutionError, normalize_destination};
pub use send_quota::SendQuota;
pub use sender_pool::{SenderPool, failover_order};
pub use settings::DispatchSettings;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
