mod campaign;
mod campaign_status;
mod progress;
mod recipient_filter;
