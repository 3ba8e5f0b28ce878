pub mod campaigns;
pub mod contacts;
pub mod error;
pub mod extractors;
