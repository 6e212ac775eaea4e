//! Remote lyrics lookup - LRCLIB integration.
//!
//! # Architecture
//!
//! Same split as every external API in this crate:
//! - **DTOs** (`dto.rs`) - exact LRCLIB response shapes
//! - **Adapter** (`adapter.rs`) - DTO → [`LyricsCandidate`](crate::lyrics::LyricsCandidate) / [`LookupOutcome`](crate::lyrics::LookupOutcome)
//! - **Client** (`client.rs`) - HTTP transport
//! - **Cache** (`cache.rs`) - response reuse keyed by request URL
//! - **Traits** (`traits.rs`) - seam for mocking in tests
//!
//! # Usage
//!
//! ```ignore
//! use lyrics_minder::lookup::{LrclibClient, ResponseCache, DEFAULT_BASE_URL};
//!
//! let client = LrclibClient::new(DEFAULT_BASE_URL, ResponseCache::in_memory())?;
//! match client.lookup_exact(&query).await? {
//!     LookupOutcome::Found(candidate) => println!("{:?}", candidate.effective_text()),
//!     LookupOutcome::NotFound => println!("no lyrics"),
//! }
//! ```

pub mod adapter;
pub mod cache;
mod client;
pub mod dto;
pub mod traits;

pub use cache::ResponseCache;
pub use client::{DEFAULT_BASE_URL, LrclibClient};
pub use traits::LyricsApi;

/// Errors from talking to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Connection failure or a non-2xx status other than 404
    #[error("Network error: {0}")]
    Transport(String),

    /// Body was not the JSON shape we expect
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Request not issued because required fields are missing
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
