//! Sync layer: HTTP transport to the remote review service.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ReviewClient, SyncError};
