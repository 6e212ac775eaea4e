//! LRCLIB API Data Transfer Objects
//!
//! Exact response shapes of `GET /api/get` and `GET /api/search`.
//! Every field is optional: an exact lookup miss can come back as an object
//! with no `id`, and search results omit fields freely.
//!
//! API Reference: https://lrclib.net/docs

use serde::{Deserialize, Serialize};

/// One lyrics record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LyricsRecord {
    /// LRCLIB record ID; absent means no match
    pub id: Option<i64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    /// Seconds, may be fractional
    pub duration: Option<f64>,
    pub instrumental: bool,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}
