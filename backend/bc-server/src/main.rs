use bc_server::{AppState, build_router, logger};

use bc_config::{Config, DispatchConfig};
use bc_db::ContactRepository;
use bc_dispatch::{
    BroadcastConfig, CampaignBroadcaster, DispatchEngine, DispatchSettings, EngineParts,
    ShutdownCoordinator,
};
use bc_gateway::{GatewayClient, GatewaySender, HttpMessageTransport, HttpSenderSource};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    let log_file_path = match config.logging.file {
        Some(ref filename) => {
            let log_dir = config.log_dir()?;
            std::fs::create_dir_all(&log_dir)?;
            Some(log_dir.join(filename))
        }
        None => None,
    };

    // Initialize logger (before any other logging)
    logger::initialize(&config.logging, log_file_path)?;

    info!("Starting bc-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let metrics_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder not installed, /metrics disabled: {}", e);
            None
        }
    };

    let database_path = config.database_path()?;
    let pool = bc_db::connect(&database_path).await?;

    let default_user_id = config.api.default_user()?;

    let gateway = GatewayClient::new(
        config.gateway.base_url(),
        config.gateway.request_timeout(),
        config
            .gateway
            .senders
            .iter()
            .map(|s| GatewaySender {
                id: s.id.clone(),
                handle: s.handle.clone(),
                session_id: s.session_id.clone(),
            })
            .collect(),
    )?;
    info!(
        "Gateway client ready: {} ({} senders)",
        config.gateway.base_url(),
        gateway.senders().len()
    );

    let broadcaster = CampaignBroadcaster::new(BroadcastConfig {
        channel_capacity: config.publisher.channel_capacity,
    });
    let contacts = ContactRepository::new(pool.clone());
    let shutdown = ShutdownCoordinator::new();

    let engine = DispatchEngine::new(
        pool.clone(),
        EngineParts {
            contacts: Arc::new(contacts.clone()),
            transport: Arc::new(HttpMessageTransport::new(gateway.clone())),
            senders: Arc::new(HttpSenderSource::new(gateway)),
            publisher: Arc::new(broadcaster.clone()),
        },
        dispatch_settings(&config.dispatch),
        shutdown.clone(),
    );

    // Recovers interrupted jobs, then drains the queue until shutdown
    let runner = tokio::spawn(engine.runner().run());

    let app_state = AppState {
        pool: pool.clone(),
        engine,
        broadcaster,
        contacts,
        default_user_id,
        shutdown: shutdown.clone(),
        metrics: metrics_handle,
    };

    let app = build_router(app_state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("HTTP server stopped accepting connections");
        })
        .await?;

    // In-flight sends finish; interrupted jobs are recovered on next start
    if let Err(e) = runner.await {
        error!("Job runner task failed: {}", e);
    }

    pool.close().await;
    info!("Graceful shutdown complete");

    Ok(())
}

fn dispatch_settings(config: &DispatchConfig) -> DispatchSettings {
    DispatchSettings {
        batch_size: config.batch_size,
        min_delay: Duration::from_millis(config.min_delay_ms),
        max_delay: Duration::from_millis(config.max_delay_ms),
        send_timeout: config.send_timeout(),
        worker_pool_size: config.worker_pool_size,
        poll_interval: config.poll_interval(),
        max_sends_per_minute: config.max_sends_per_minute,
    }
}
