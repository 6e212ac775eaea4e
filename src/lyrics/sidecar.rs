//! `.lrc` sidecar files next to audio files.
//!
//! The sidecar for `Album/01 Song.flac` is `Album/01 Song.flac.lrc`: the
//! extension is appended, not substituted. Contents are opaque text.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::LocalIoError;

/// Suffix appended to the audio file name.
pub const SIDECAR_SUFFIX: &str = ".lrc";

/// Path of the sidecar file for an audio file.
pub fn sidecar_path(audio_path: &Path) -> PathBuf {
    let mut name = audio_path.as_os_str().to_owned();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Read the sidecar for `audio_path`.
///
/// Returns `Ok(None)` only when the file does not exist; any other failure
/// (permissions, the path being a directory) is an error. Bytes that are not
/// UTF-8 are replaced rather than rejected, since older `.lrc` files are often
/// Latin-1.
pub fn read_sidecar(audio_path: &Path) -> Result<Option<String>, LocalIoError> {
    let path = sidecar_path(audio_path);
    match fs::read(&path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LocalIoError::SidecarRead { path, source }),
    }
}

/// Create the sidecar with `text`, unless one already exists.
///
/// Existence check and creation are a single `create_new` open, so a sidecar
/// that appeared since it was last read is left alone. A write that fails
/// part way removes the file again. Returns whether the file was written.
pub fn create_sidecar(audio_path: &Path, text: &str) -> Result<bool, LocalIoError> {
    let path = sidecar_path(audio_path);

    let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!("Sidecar {:?} already exists, leaving it alone", path);
            return Ok(false);
        }
        Err(source) => return Err(LocalIoError::SidecarWrite { path, source }),
    };

    if let Err(source) = write_or_discard(&path, file, text) {
        return Err(LocalIoError::SidecarWrite { path, source });
    }

    tracing::debug!("Wrote sidecar {:?}", path);
    Ok(true)
}

/// Write `text` to the freshly created `path`; on failure delete it, so a
/// truncated file never passes for an existing sidecar.
fn write_or_discard<W: Write>(path: &Path, mut out: W, text: &str) -> std::io::Result<()> {
    let written = out.write_all(text.as_bytes()).and_then(|()| out.flush());
    if written.is_err() {
        drop(out);
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Could not remove partial sidecar {:?}: {}", path, e);
        }
    }
    written
}
