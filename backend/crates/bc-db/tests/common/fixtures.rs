use bc_core::{Campaign, Recipient, RecipientFilter};
use bc_db::CampaignRepository;

use sqlx::SqlitePool;
use uuid::Uuid;

/// Creates a draft campaign with no filter
pub fn create_test_campaign(owner_id: Uuid) -> Campaign {
    Campaign::new(
        owner_id,
        "Test Campaign".to_string(),
        "Hello {name}".to_string(),
        RecipientFilter::default(),
    )
    .expect("valid test campaign")
}

/// Persists a draft campaign and returns it
pub async fn insert_test_campaign(pool: &SqlitePool, owner_id: Uuid) -> Campaign {
    let campaign = create_test_campaign(owner_id);
    CampaignRepository::new(pool.clone())
        .create(&campaign)
        .await
        .expect("Failed to insert campaign");
    campaign
}

/// `count` recipients named R0.. with distinct destinations
pub fn create_test_recipients(count: usize) -> Vec<Recipient> {
    (0..count)
        .map(|i| Recipient::new(Uuid::new_v4(), format!("R{}", i), format!("+1555000{:04}", i)))
        .collect()
}
