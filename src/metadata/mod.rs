//! Audio file metadata reading.
//!
//! Uses the lofty crate for format-independent tag access.
//! Supports MP3, FLAC, OGG, M4A, and WAV files.
//!
//! Only the fields a lyrics lookup needs are read. Missing tags stay empty
//! rather than being replaced by placeholders, so an untagged file never
//! produces a bogus remote query.

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};

/// Tags relevant to lyrics lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Whole seconds, from the audio properties
    pub duration: u64,
}

pub fn read(path: &Path) -> Result<TrackMetadata> {
    // Probe the file to determine format and read tags
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("failed to open file for probing: {}", e)))?
        .read()
        .map_err(|e| Error::metadata(path, format!("failed to read file metadata: {}", e)))?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    Ok(TrackMetadata {
        title: field(tag.and_then(|t| t.title())),
        artist: field(tag.and_then(|t| t.artist())),
        album: field(tag.and_then(|t| t.album())),
        duration: tagged_file.properties().duration().as_secs(),
    })
}

fn field(value: Option<Cow<'_, str>>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write to temp file");

        let result = read(file.path());

        assert!(matches!(result, Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_read_non_existent_file_returns_error() {
        let path = Path::new("non_existent_file.mp3");
        let err = read(path).unwrap_err();
        assert!(err.to_string().contains("non_existent_file.mp3"));
    }

    #[test]
    fn test_default_metadata_is_empty() {
        let meta = TrackMetadata::default();
        assert!(meta.title.is_empty());
        assert_eq!(meta.duration, 0);
    }
}
