use crate::{Campaign, CampaignStatus, CoreError, RecipientFilter};

use uuid::Uuid;

#[test]
fn test_campaign_new_is_draft() {
    let owner = Uuid::new_v4();
    let campaign = Campaign::new(
        owner,
        "  Spring promo ".to_string(),
        "Hi {name}".to_string(),
        RecipientFilter::default(),
    )
    .unwrap();

    assert_eq!(campaign.owner_id, owner);
    assert_eq!(campaign.name, "Spring promo");
    assert_eq!(campaign.status, CampaignStatus::Draft);
    assert_eq!(campaign.total_recipients, 0);
    assert_eq!(campaign.pending_count(), 0);
    assert!(campaign.started_at.is_none());
}

#[test]
fn test_campaign_new_rejects_blank_name() {
    let err = Campaign::new(
        Uuid::new_v4(),
        "   ".to_string(),
        "Hi".to_string(),
        RecipientFilter::default(),
    )
    .unwrap_err();

    match err {
        CoreError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("name")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_campaign_new_rejects_oversized_message() {
    let message = "x".repeat(crate::models::campaign::MAX_MESSAGE_LENGTH + 1);
    let result = Campaign::new(
        Uuid::new_v4(),
        "Promo".to_string(),
        message,
        RecipientFilter::default(),
    );

    assert!(result.is_err());
}

#[test]
fn test_pending_count_never_negative() {
    let mut campaign = Campaign::new(
        Uuid::new_v4(),
        "Promo".to_string(),
        "Hello".to_string(),
        RecipientFilter::default(),
    )
    .unwrap();

    campaign.total_recipients = 5;
    campaign.sent_count = 3;
    campaign.failed_count = 1;
    assert_eq!(campaign.pending_count(), 1);

    campaign.sent_count = 9;
    assert_eq!(campaign.pending_count(), 0);
}
