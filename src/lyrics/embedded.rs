//! Lyrics stored inside the audio file's tags.
//!
//! Uses lofty's generic `ItemKey::Lyrics`, which maps to:
//! - ID3v2 `USLT` (MP3, WAV)
//! - Vorbis `LYRICS` (FLAC, OGG)
//! - MP4 `©lyr` (M4A/AAC)

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagExt};
use std::path::Path;

use super::LocalIoError;

/// Access to the embedded lyrics field.
///
/// Production code uses [`TagLyrics`]; tests substitute an in-memory store.
pub trait EmbeddedLyrics: Send + Sync {
    /// Current lyrics, `None` when the field is unset or empty.
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, LocalIoError>;

    /// Replace the lyrics field.
    fn write_lyrics(&self, path: &Path, text: &str) -> Result<(), LocalIoError>;
}

/// Reads and writes real tags via lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagLyrics;

impl EmbeddedLyrics for TagLyrics {
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, LocalIoError> {
        let tag_read = |message: String| LocalIoError::TagRead {
            path: path.to_path_buf(),
            message,
        };

        let tagged_file = Probe::open(path)
            .map_err(|e| tag_read(e.to_string()))?
            .read()
            .map_err(|e| tag_read(e.to_string()))?;

        let lyrics = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .and_then(|tag| tag.get_string(&ItemKey::Lyrics))
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(lyrics)
    }

    fn write_lyrics(&self, path: &Path, text: &str) -> Result<(), LocalIoError> {
        let tag_write = |message: String| LocalIoError::TagWrite {
            path: path.to_path_buf(),
            message,
        };

        let mut tagged_file = Probe::open(path)
            .map_err(|e| tag_write(e.to_string()))?
            .read()
            .map_err(|e| tag_write(e.to_string()))?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| tag_write(format!("no {:?} tag available", tag_type)))?;

        if !tag.insert_text(ItemKey::Lyrics, text.to_string()) {
            return Err(tag_write(format!("{:?} tags cannot hold lyrics", tag_type)));
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| tag_write(e.to_string()))?;

        tracing::debug!("Updated embedded lyrics in {:?}", path);
        Ok(())
    }
}
