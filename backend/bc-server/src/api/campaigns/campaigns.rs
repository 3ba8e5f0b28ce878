//! Campaign REST API handlers
//!
//! Creation, inspection and the start/pause/resume/stop control actions.
//! All of them are scoped to the caller from [`UserId`].

use crate::api::campaigns::list_deliveries_query::{DEFAULT_DELIVERY_LIMIT, MAX_DELIVERY_LIMIT};
use crate::{
    ApiError, ApiResult, AppState, AttemptDto, AttemptListResponse, CampaignDto,
    CampaignListResponse, CampaignResponse, ControlResponse, CreateCampaignRequest, DeliveryDto,
    DeliveryListResponse, ListDeliveriesQuery, ProgressResponse, UserId,
};

use bc_core::{DeliveryStatus, RecipientFilter};

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<CreateCampaignRequest>,
) -> ApiResult<Json<CampaignResponse>> {
    let category_ids = req
        .category_ids
        .iter()
        .map(|id| Uuid::parse_str(id.trim()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::validation(format!("Invalid category id: {}", e), Some("category_ids")))?;

    let filter = RecipientFilter {
        search: req.search,
        category_ids,
    };

    let campaign = state
        .campaigns()
        .create(user_id, req.name, req.message, filter)
        .await?;

    Ok(Json(CampaignResponse {
        campaign: campaign.into(),
    }))
}

/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> ApiResult<Json<CampaignListResponse>> {
    let campaigns = state.campaigns().list(user_id).await?;

    Ok(Json(CampaignListResponse {
        campaigns: campaigns.into_iter().map(CampaignDto::from).collect(),
    }))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> ApiResult<Json<CampaignResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;
    let campaign = state.campaigns().get(user_id, campaign_id).await?;

    Ok(Json(CampaignResponse {
        campaign: campaign.into(),
    }))
}

/// POST /api/v1/campaigns/{id}/start
///
/// Materializes the recipient snapshot and queues the first run.
pub async fn start_campaign(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> ApiResult<Json<ControlResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;
    let outcome = state.campaigns().start(user_id, campaign_id).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/campaigns/{id}/pause
pub async fn pause_campaign(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> ApiResult<Json<ControlResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;
    let outcome = state.campaigns().pause(user_id, campaign_id).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/campaigns/{id}/resume
pub async fn resume_campaign(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> ApiResult<Json<ControlResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;
    let outcome = state.campaigns().resume(user_id, campaign_id).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/campaigns/{id}/stop
pub async fn stop_campaign(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> ApiResult<Json<ControlResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;
    let outcome = state.campaigns().stop(user_id, campaign_id).await?;
    Ok(Json(outcome.into()))
}

/// GET /api/v1/campaigns/{id}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> ApiResult<Json<ProgressResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;
    let snapshot = state.campaigns().progress(user_id, campaign_id).await?;

    Ok(Json(ProgressResponse {
        progress: snapshot.into(),
    }))
}

/// GET /api/v1/campaigns/{id}/deliveries?status=&limit=&offset=
pub async fn list_deliveries(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
    Query(query): Query<ListDeliveriesQuery>,
) -> ApiResult<Json<DeliveryListResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;

    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(DeliveryStatus::from_str)
        .transpose()
        .map_err(|_| {
            ApiError::validation(
                "Invalid status. Valid values: pending, sent, failed",
                Some("status"),
            )
        })?;

    let limit = query.limit.unwrap_or(DEFAULT_DELIVERY_LIMIT);
    if !(1..=MAX_DELIVERY_LIMIT).contains(&limit) {
        return Err(ApiError::validation(
            format!("limit must be between 1 and {}", MAX_DELIVERY_LIMIT),
            Some("limit"),
        ));
    }

    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::validation("offset must not be negative", Some("offset")));
    }

    let deliveries = state
        .campaigns()
        .deliveries(user_id, campaign_id, status, limit, offset)
        .await?;

    Ok(Json(DeliveryListResponse {
        deliveries: deliveries.into_iter().map(DeliveryDto::from).collect(),
    }))
}

/// GET /api/v1/campaigns/{id}/deliveries/{recipient_id}/attempts
///
/// Every transport call made for one recipient, in failover order.
pub async fn list_attempts(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((id, recipient_id)): Path<(String, String)>,
) -> ApiResult<Json<AttemptListResponse>> {
    let campaign_id = Uuid::parse_str(&id)?;
    let recipient_id = Uuid::parse_str(&recipient_id)?;

    let attempts = state
        .campaigns()
        .attempts(user_id, campaign_id, recipient_id)
        .await?;

    Ok(Json(AttemptListResponse {
        attempts: attempts.into_iter().map(AttemptDto::from).collect(),
    }))
}
