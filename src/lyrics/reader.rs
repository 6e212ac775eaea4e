//! Read both local lyrics sources for one file without changing anything.

use std::path::Path;

use super::embedded::EmbeddedLyrics;
use super::sidecar::read_sidecar;
use super::{LocalIoError, LocalLyricsState};

/// Snapshot the embedded tag and the sidecar file for `audio_path`.
///
/// No fallback between sources: a sidecar that exists but cannot be read is
/// an error, not "absent".
pub fn read_local<T: EmbeddedLyrics + ?Sized>(
    tags: &T,
    audio_path: &Path,
) -> Result<LocalLyricsState, LocalIoError> {
    let embedded_text = tags
        .read_lyrics(audio_path)?
        .filter(|text| !text.is_empty());
    let sidecar_text = read_sidecar(audio_path)?;

    Ok(LocalLyricsState {
        embedded_text,
        sidecar_exists: sidecar_text.is_some(),
        sidecar_text,
    })
}
