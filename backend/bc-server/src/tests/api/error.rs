use crate::ApiError;

use bc_core::{Campaign, CampaignStatus, CollaboratorError, JobAction, RecipientFilter};
use bc_dispatch::{DispatchError, ResolutionError};

use std::panic::Location;

use axum::{http::StatusCode, response::IntoResponse};
use error_location::ErrorLocation;
use http_body_util::BodyExt;
use uuid::Uuid;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_not_found_returns_404_with_json_body() {
    let error = ApiError::NotFound {
        message: "Campaign not found".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "Campaign not found");
    assert!(json["error"].get("field").is_none());
}

#[tokio::test]
async fn test_validation_error_returns_400_with_field() {
    let error = ApiError::validation("Name too long", Some("name"));

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "name");
}

#[tokio::test]
async fn test_internal_error_returns_500() {
    let error = ApiError::Internal {
        message: "Database operation failed".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_no_sender_maps_to_409() {
    let error: ApiError = DispatchError::no_sender_available().into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "NO_SENDER_AVAILABLE");
}

#[tokio::test]
async fn test_invalid_transition_maps_to_409_with_readable_message() {
    let core = CampaignStatus::Draft
        .check_action(JobAction::Pause)
        .unwrap_err();
    let error: ApiError = DispatchError::from(core).into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "INVALID_TRANSITION");
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("draft"));
    assert!(!message.contains(".rs"));
}

#[tokio::test]
async fn test_unknown_category_maps_to_422() {
    let category_id = Uuid::new_v4();
    let error: ApiError = DispatchError::from(ResolutionError::UnknownCategory {
        category_id,
        location: ErrorLocation::from(Location::caller()),
    })
    .into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "RESOLUTION_ERROR");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains(&category_id.to_string())
    );
}

#[tokio::test]
async fn test_contact_store_outage_maps_to_500_not_422() {
    let store = CollaboratorError::unavailable("contact store", "connection refused");
    let error: ApiError = DispatchError::from(ResolutionError::from(store)).into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    let message = json["error"]["message"].as_str().unwrap();
    assert!(!message.contains("connection refused"));
    assert!(!message.contains(".rs"));
}

#[tokio::test]
async fn test_campaign_validation_keeps_field() {
    let core = Campaign::new(
        Uuid::new_v4(),
        "   ".into(),
        "Hello".into(),
        RecipientFilter::default(),
    )
    .unwrap_err();
    let error: ApiError = DispatchError::from(core).into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["field"], "name");
}

#[tokio::test]
async fn test_dispatch_conflict_maps_to_409() {
    let error: ApiError = DispatchError::conflict("changed concurrently").into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");
    assert_eq!(json["error"]["message"], "changed concurrently");
}

#[tokio::test]
async fn test_uuid_error_maps_to_validation() {
    let error: ApiError = uuid::Uuid::parse_str("nope").unwrap_err().into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}
