//! Trait definition for the lyrics lookup service.
//!
//! Production code uses [`LrclibClient`]; tests substitute
//! [`MockLyricsApi`](crate::test_utils::MockLyricsApi).

use async_trait::async_trait;

use super::{LookupError, LrclibClient};
use crate::lyrics::{LookupOutcome, LyricsCandidate, TrackQuery};

/// Remote lyrics lookup.
#[async_trait]
pub trait LyricsApi: Send + Sync {
    /// Exact match on artist, title, album and duration.
    async fn lookup_exact(&self, query: &TrackQuery) -> Result<LookupOutcome, LookupError>;

    /// Ranked free-text search. An empty list is not an error.
    async fn search(&self, text: &str) -> Result<Vec<LyricsCandidate>, LookupError>;
}

#[async_trait]
impl LyricsApi for LrclibClient {
    async fn lookup_exact(&self, query: &TrackQuery) -> Result<LookupOutcome, LookupError> {
        self.lookup_exact(query).await
    }

    async fn search(&self, text: &str) -> Result<Vec<LyricsCandidate>, LookupError> {
        self.search(text).await
    }
}
