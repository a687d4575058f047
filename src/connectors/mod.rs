// src/connectors/mod.rs
pub mod http;
pub mod messages;
pub mod snapshot;
pub mod traits;
