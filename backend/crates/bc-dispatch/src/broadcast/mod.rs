pub mod broadcast_config;
pub mod broadcast_message;
pub mod campaign_broadcaster;
