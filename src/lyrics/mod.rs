//! Lyrics resolution for local audio files.
//!
//! A track can get its lyrics from three places:
//!
//! 1. **Remote lookup** - LRCLIB exact match or ranked search results
//! 2. **Embedded tags** - the lyrics field inside the audio file
//! 3. **Sidecar files** - `<file>.lrc` next to the audio file
//!
//! [`reconcile`](reconcile::reconcile) decides which one wins for each linked
//! file, [`apply`](apply::apply) writes the result, and [`LyricsService`] drives
//! a whole album through lookup, reconciliation and persistence.
//!
//! # Rules that hold everywhere
//!
//! - An existing sidecar file is never truncated or rewritten.
//! - Synced lyrics are preferred over plain lyrics.
//! - Background loads never ask for confirmation and never overwrite.

pub mod apply;
pub mod embedded;
pub mod inflight;
pub mod prompt;
pub mod reader;
pub mod reconcile;
pub mod service;
pub mod sidecar;

use std::path::PathBuf;

pub use apply::{ApplyReport, apply};
pub use embedded::{EmbeddedLyrics, TagLyrics};
pub use inflight::{InFlight, RequestTracker};
pub use prompt::{AutoConfirm, HeadlessPrompter, Prompter};
pub use reader::read_local;
pub use reconcile::{ConfirmationPrompt, Reconciliation, ReconciliationDecision, TextSource, reconcile};
pub use service::{BatchReport, FileOutcome, LyricsService, TrackOutcome};

/// Fields used to look a track up remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackQuery {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub duration_secs: Option<u64>,
}

impl TrackQuery {
    /// Exact lookups need every field, and a non-zero duration.
    pub fn is_complete(&self) -> bool {
        !self.artist.trim().is_empty()
            && !self.title.trim().is_empty()
            && !self.album.trim().is_empty()
            && self.duration_secs.is_some_and(|d| d > 0)
    }

    /// Free-text search only needs a title.
    pub fn search_text(&self) -> Option<&str> {
        let title = self.title.trim();
        (!title.is_empty()).then_some(title)
    }
}

/// One lyrics record from the lookup service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricsCandidate {
    /// Time-tagged (LRC) lyrics
    pub synced_text: Option<String>,
    /// Untimed lyrics
    pub plain_text: Option<String>,
    /// Remote record ID. Exact lookups without one are "not found".
    pub source_id: Option<i64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub duration_secs: Option<u64>,
}

impl LyricsCandidate {
    /// Synced text if non-empty, else plain text if non-empty.
    pub fn effective_text(&self) -> Option<&str> {
        non_empty(self.synced_text.as_deref()).or_else(|| non_empty(self.plain_text.as_deref()))
    }

    pub fn is_synced(&self) -> bool {
        non_empty(self.synced_text.as_deref()).is_some()
    }

    /// One-line summary for candidate pickers.
    pub fn label(&self) -> String {
        let mut label = format!(
            "{} - {}",
            self.artist_name.as_deref().unwrap_or("?"),
            self.track_name.as_deref().unwrap_or("?"),
        );
        if let Some(album) = self.album_name.as_deref().filter(|a| !a.is_empty()) {
            label.push_str(&format!(" ({})", album));
        }
        if let Some(secs) = self.duration_secs {
            label.push_str(&format!(" [{}]", crate::duration::format_duration(secs)));
        }
        label.push_str(if self.is_synced() { " synced" } else { " plain" });
        label
    }
}

/// Result of an exact lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(LyricsCandidate),
    NotFound,
}

impl LookupOutcome {
    /// The text to apply, if there is any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Found(candidate) => candidate.effective_text(),
            Self::NotFound => None,
        }
    }
}

/// What one audio file already has, read before any write.
///
/// Empty embedded lyrics are indistinguishable from absent ones in the tag
/// layer, so both are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalLyricsState {
    pub embedded_text: Option<String>,
    pub sidecar_text: Option<String>,
    pub sidecar_exists: bool,
}

impl LocalLyricsState {
    pub fn embedded(&self) -> Option<&str> {
        non_empty(self.embedded_text.as_deref())
    }

    /// Sidecar content, only when the file exists and has something in it.
    pub fn sidecar(&self) -> Option<&str> {
        if self.sidecar_exists {
            non_empty(self.sidecar_text.as_deref())
        } else {
            None
        }
    }
}

/// Settings read at decision time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationPolicy {
    pub auto_overwrite: bool,
    pub persist_sidecar_file: bool,
    /// Set for implicit fetches where nobody can answer a prompt.
    pub is_background_load: bool,
}

/// How a lookup was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Explicit exact lookup by the user
    Get,
    /// Explicit free-text search with a candidate picker
    Search,
    /// Automatic lookup while loading files
    BackgroundLoad,
}

impl Method {
    pub fn is_interactive(self) -> bool {
        !matches!(self, Self::BackgroundLoad)
    }
}

/// Local store failures. Always carry the path involved.
#[derive(Debug, thiserror::Error)]
pub enum LocalIoError {
    #[error("Failed to read sidecar {path}: {source}")]
    SidecarRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write sidecar {path}: {source}")]
    SidecarWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read lyrics tag from {path}: {message}")]
    TagRead { path: PathBuf, message: String },

    #[error("Failed to write lyrics tag to {path}: {message}")]
    TagWrite { path: PathBuf, message: String },
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_text_prefers_synced() {
        let candidate = LyricsCandidate {
            synced_text: Some("[00:01.00] la".to_string()),
            plain_text: Some("la".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.effective_text(), Some("[00:01.00] la"));
        assert!(candidate.is_synced());
    }

    #[test]
    fn test_effective_text_falls_back_to_plain() {
        let candidate = LyricsCandidate {
            synced_text: Some(String::new()),
            plain_text: Some("la".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.effective_text(), Some("la"));
        assert!(!candidate.is_synced());
    }

    #[test]
    fn test_empty_candidate_has_no_text() {
        let candidate = LyricsCandidate {
            synced_text: Some(String::new()),
            plain_text: None,
            source_id: Some(7),
            ..Default::default()
        };
        assert_eq!(LookupOutcome::Found(candidate).text(), None);
        assert_eq!(LookupOutcome::NotFound.text(), None);
    }

    #[test]
    fn test_query_completeness() {
        let query = TrackQuery {
            artist: "Queen".to_string(),
            title: "Bicycle Race".to_string(),
            album: "Jazz".to_string(),
            duration_secs: Some(181),
        };
        assert!(query.is_complete());

        let no_duration = TrackQuery {
            duration_secs: None,
            ..query.clone()
        };
        assert!(!no_duration.is_complete());
        assert_eq!(no_duration.search_text(), Some("Bicycle Race"));

        let blank_album = TrackQuery {
            album: "  ".to_string(),
            ..query
        };
        assert!(!blank_album.is_complete());
    }

    #[test]
    fn test_search_text_requires_title() {
        let query = TrackQuery {
            artist: "Queen".to_string(),
            ..Default::default()
        };
        assert_eq!(query.search_text(), None);
    }

    #[test]
    fn test_local_state_ignores_empty_values() {
        let state = LocalLyricsState {
            embedded_text: Some(String::new()),
            sidecar_text: Some(String::new()),
            sidecar_exists: true,
        };
        assert_eq!(state.embedded(), None);
        assert_eq!(state.sidecar(), None);
    }

    #[test]
    fn test_candidate_label() {
        let candidate = LyricsCandidate {
            synced_text: Some("[00:01.00] x".to_string()),
            track_name: Some("Song".to_string()),
            artist_name: Some("Band".to_string()),
            album_name: Some("Record".to_string()),
            duration_secs: Some(200),
            ..Default::default()
        };
        assert_eq!(candidate.label(), "Band - Song (Record) [3:20] synced");
    }
}
