//! Test utilities and fixtures for lyrics-minder tests.
//!
//! In-memory stand-ins for the three collaborators the lyrics service talks
//! to (tags, remote lookup, prompter), plus small factories for tracks.
//!
//! # Example
//!
//! ```ignore
//! use lyrics_minder::test_utils::{MemoryTags, MockLyricsApi, ScriptedPrompter};
//!
//! let tags = MemoryTags::with_lyrics(&audio, "old words");
//! let api = MockLyricsApi::found(synced_candidate("[00:01.00] new"));
//! let prompter = ScriptedPrompter::answering(false);
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::library::{LinkedFile, Track};
use crate::lookup::{LookupError, LyricsApi};
use crate::lyrics::{
    ConfirmationPrompt, EmbeddedLyrics, LocalIoError, LookupOutcome, LyricsCandidate, Prompter,
    TrackQuery,
};
use crate::metadata::TrackMetadata;

// ============================================================================
// Embedded tags
// ============================================================================

/// Embedded lyrics kept in a map instead of real audio files.
#[derive(Debug, Default)]
pub struct MemoryTags {
    lyrics: Mutex<HashMap<PathBuf, String>>,
    failing: HashSet<PathBuf>,
    writes: AtomicUsize,
}

impl MemoryTags {
    /// A store where `path` already carries `text`. Does not count as a write.
    pub fn with_lyrics(path: &Path, text: &str) -> Self {
        let tags = Self::default();
        tags.lyrics
            .lock()
            .insert(path.to_path_buf(), text.to_string());
        tags
    }

    /// Make every write to `path` fail.
    pub fn failing_writes(mut self, path: &Path) -> Self {
        self.failing.insert(path.to_path_buf());
        self
    }

    pub fn lyrics(&self, path: &Path) -> Option<String> {
        self.lyrics.lock().get(path).cloned()
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl EmbeddedLyrics for MemoryTags {
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, LocalIoError> {
        Ok(self.lyrics(path).filter(|text| !text.is_empty()))
    }

    fn write_lyrics(&self, path: &Path, text: &str) -> Result<(), LocalIoError> {
        if self.failing.contains(path) {
            return Err(LocalIoError::TagWrite {
                path: path.to_path_buf(),
                message: "mock write failure".to_string(),
            });
        }
        self.lyrics
            .lock()
            .insert(path.to_path_buf(), text.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Remote lookup
// ============================================================================

/// Lookup service returning canned answers.
#[derive(Debug, Default)]
pub struct MockLyricsApi {
    /// Answer for exact lookups
    pub exact: Option<LookupOutcome>,
    /// Answer for searches
    pub results: Vec<LyricsCandidate>,
    /// Error to return (takes precedence over results)
    pub error: Option<LookupError>,
    exact_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl MockLyricsApi {
    /// Exact lookups find `candidate`.
    pub fn found(candidate: LyricsCandidate) -> Self {
        Self {
            exact: Some(LookupOutcome::Found(candidate)),
            ..Default::default()
        }
    }

    /// Nothing matches, exact or search.
    pub fn not_found() -> Self {
        Self {
            exact: Some(LookupOutcome::NotFound),
            ..Default::default()
        }
    }

    /// Searches return `results`.
    pub fn search_results(results: Vec<LyricsCandidate>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    /// Every call fails.
    pub fn with_error(error: LookupError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn exact_calls(&self) -> usize {
        self.exact_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LyricsApi for MockLyricsApi {
    async fn lookup_exact(&self, _query: &TrackQuery) -> Result<LookupOutcome, LookupError> {
        self.exact_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref err) = self.error {
            return Err(err.clone());
        }
        Ok(self.exact.clone().unwrap_or(LookupOutcome::NotFound))
    }

    async fn search(&self, _text: &str) -> Result<Vec<LyricsCandidate>, LookupError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref err) = self.error {
            return Err(err.clone());
        }
        Ok(self.results.clone())
    }
}

// ============================================================================
// Prompter
// ============================================================================

/// Prompter with fixed answers that remembers what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub confirm_answer: bool,
    pub pick_answer: Option<usize>,
    prompts: Mutex<Vec<ConfirmationPrompt>>,
    picks: AtomicUsize,
}

impl ScriptedPrompter {
    /// Answer every confirmation with `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            confirm_answer: answer,
            ..Default::default()
        }
    }

    /// Choose `index` from every candidate list.
    pub fn picking(index: Option<usize>) -> Self {
        Self {
            pick_answer: index,
            ..Default::default()
        }
    }

    /// Confirmation prompts shown so far.
    pub fn prompts(&self) -> Vec<ConfirmationPrompt> {
        self.prompts.lock().clone()
    }

    pub fn pick_count(&self) -> usize {
        self.picks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        self.prompts.lock().push(prompt.clone());
        self.confirm_answer
    }

    async fn pick(&self, _query: &str, candidates: &[LyricsCandidate]) -> Option<usize> {
        self.picks.fetch_add(1, Ordering::SeqCst);
        self.pick_answer.filter(|&i| i < candidates.len())
    }
}

// ============================================================================
// Factories
// ============================================================================

/// Creates a mock TrackMetadata with sensible defaults.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let custom = TrackMetadata {
///     title: "Custom Title".to_string(),
///     ..mock_track_metadata()
/// };
/// ```
pub fn mock_track_metadata() -> TrackMetadata {
    TrackMetadata {
        title: "Test Track".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        duration: 180,
    }
}

/// A fully tagged track linked to `paths`.
pub fn mock_track<P: AsRef<Path>>(paths: &[P]) -> Track {
    let mut track = Track::from_metadata(&mock_track_metadata());
    track.files = paths
        .iter()
        .map(|p| LinkedFile::new(p.as_ref()))
        .collect();
    track
}

/// A candidate carrying only synced text.
pub fn synced_candidate(text: &str) -> LyricsCandidate {
    LyricsCandidate {
        synced_text: Some(text.to_string()),
        source_id: Some(1),
        track_name: Some("Test Track".to_string()),
        artist_name: Some("Test Artist".to_string()),
        album_name: Some("Test Album".to_string()),
        duration_secs: Some(180),
        ..Default::default()
    }
}

/// Create an empty placeholder "audio" file in `dir`.
///
/// Lyrics tests never parse the audio, they only need the path to exist.
pub fn touch_audio(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"fake audio").expect("Failed to create placeholder audio file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_track_metadata_defaults() {
        let meta = mock_track_metadata();
        assert_eq!(meta.title, "Test Track");
        assert_eq!(meta.duration, 180);
    }

    #[test]
    fn test_memory_tags_failing_write() {
        let path = Path::new("/music/a.mp3");
        let tags = MemoryTags::default().failing_writes(path);
        assert!(tags.write_lyrics(path, "x").is_err());
        assert_eq!(tags.write_count(), 0);
        assert!(tags.lyrics(path).is_none());
    }

    #[tokio::test]
    async fn test_mock_api_counts_calls() {
        let api = MockLyricsApi::with_error(LookupError::Transport("down".to_string()));
        assert!(api.lookup_exact(&TrackQuery::default()).await.is_err());
        assert!(api.search("q").await.is_err());
        assert_eq!(api.exact_calls(), 1);
        assert_eq!(api.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_prompter_bounds_pick() {
        let prompter = ScriptedPrompter::picking(Some(3));
        assert_eq!(prompter.pick("q", &[LyricsCandidate::default()]).await, None);
        assert_eq!(prompter.pick_count(), 1);
    }
}
