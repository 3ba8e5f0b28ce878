use crate::{
    AppState, create_campaign, create_category, create_contact, get_campaign, get_progress,
    health, list_attempts, list_campaigns, list_categories, list_contacts, list_deliveries,
    pause_campaign, progress_socket, resume_campaign, start_campaign, stop_campaign,
};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Campaigns
        .route(
            "/api/v1/campaigns",
            get(list_campaigns).post(create_campaign),
        )
        .route("/api/v1/campaigns/{id}", get(get_campaign))
        .route("/api/v1/campaigns/{id}/start", post(start_campaign))
        .route("/api/v1/campaigns/{id}/pause", post(pause_campaign))
        .route("/api/v1/campaigns/{id}/resume", post(resume_campaign))
        .route("/api/v1/campaigns/{id}/stop", post(stop_campaign))
        .route("/api/v1/campaigns/{id}/progress", get(get_progress))
        .route("/api/v1/campaigns/{id}/deliveries", get(list_deliveries))
        .route(
            "/api/v1/campaigns/{id}/deliveries/{recipient_id}/attempts",
            get(list_attempts),
        )
        // Address book
        .route(
            "/api/v1/categories",
            get(list_categories).post(create_category),
        )
        .route("/api/v1/contacts", get(list_contacts).post(create_contact))
        // Live progress
        .route("/ws/campaigns/{id}", get(progress_socket))
        // Health and metrics
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
