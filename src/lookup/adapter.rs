//! Adapter layer: Convert LRCLIB DTOs to domain models
//!
//! This is the ONLY place where the "found" signal (presence of `id`) is
//! interpreted. Past this point callers only see [`LookupOutcome`].

use super::dto;
use crate::lyrics::{LookupOutcome, LyricsCandidate};

/// Convert a record to a candidate, whatever its ID.
pub fn to_candidate(record: dto::LyricsRecord) -> LyricsCandidate {
    LyricsCandidate {
        synced_text: record.synced_lyrics,
        plain_text: record.plain_lyrics,
        source_id: record.id,
        track_name: record.track_name,
        artist_name: record.artist_name,
        album_name: record.album_name,
        duration_secs: record
            .duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64),
    }
}

/// Convert an exact-lookup response. No `id` means no match.
pub fn to_outcome(record: dto::LyricsRecord) -> LookupOutcome {
    if record.id.is_none() {
        return LookupOutcome::NotFound;
    }
    LookupOutcome::Found(to_candidate(record))
}

/// Convert search results, keeping the server's ranking.
pub fn to_candidates(records: Vec<dto::LyricsRecord>) -> Vec<LyricsCandidate> {
    records.into_iter().map(to_candidate).collect()
}
