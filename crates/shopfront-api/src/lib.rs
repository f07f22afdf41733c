// shopfront-api: Async Rust client for the shopfront back-office API

pub mod client;
pub mod error;
pub mod query;
pub mod resource;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use query::ListParams;
pub use resource::Resource;
pub use transport::{Transport, TransportConfig};
pub use types::RawListPayload;
