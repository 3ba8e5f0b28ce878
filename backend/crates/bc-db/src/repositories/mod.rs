pub mod campaign_repository;
pub mod contact_repository;
pub mod delivery_repository;
pub mod job_repository;

mod columns;
