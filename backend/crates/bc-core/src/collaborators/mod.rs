//! Interfaces of the systems the dispatch engine consumes or feeds.

pub mod contact_store;
pub mod error;
pub mod message_transport;
pub mod progress_publisher;
pub mod sender_source;
