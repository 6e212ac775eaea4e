//! Albums, tracks, and the files linked to them.
//!
//! A scanned directory becomes a list of [`Album`]s. Files with identical
//! artist, title, album and length are treated as copies of one [`Track`]
//! (duplicate rips, different formats) and reconciled separately.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::lyrics::TrackQuery;
use crate::metadata::{self, TrackMetadata};

/// One audio file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedFile {
    pub path: PathBuf,
}

impl LinkedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// A track and every file that holds it.
#[derive(Debug, Clone, Default)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_secs: Option<u64>,
    pub files: Vec<LinkedFile>,
    /// Remote lyrics picked for this track during the last run
    pub lyrics: Option<String>,
}

impl Track {
    pub fn from_metadata(meta: &TrackMetadata) -> Self {
        Self {
            title: meta.title.clone(),
            artist: meta.artist.clone(),
            album: meta.album.clone(),
            duration_secs: (meta.duration > 0).then_some(meta.duration),
            files: Vec::new(),
            lyrics: None,
        }
    }

    pub fn query(&self) -> TrackQuery {
        TrackQuery {
            artist: self.artist.clone(),
            title: self.title.clone(),
            album: self.album.clone(),
            duration_secs: self.duration_secs,
        }
    }

    /// "Artist - Title" for logs and reports.
    pub fn display_name(&self) -> String {
        match (self.artist.is_empty(), self.title.is_empty()) {
            (false, false) => format!("{} - {}", self.artist, self.title),
            (true, false) => self.title.clone(),
            _ => self
                .files
                .first()
                .map(|f| f.path.display().to_string())
                .unwrap_or_else(|| "<untitled>".to_string()),
        }
    }
}

/// An album and its tracks.
#[derive(Debug, Clone, Default)]
pub struct Album {
    pub name: String,
    pub tracks: Vec<Track>,
}

/// Grouping key for linking files to one track.
type TrackKey = (String, String, String, u64);

/// Group tagged files into albums and tracks.
///
/// Untitled files are never merged with each other.
pub fn group(files: Vec<(PathBuf, TrackMetadata)>) -> Vec<Album> {
    let mut albums: BTreeMap<String, BTreeMap<TrackKey, Track>> = BTreeMap::new();

    for (path, meta) in files {
        let key = if meta.title.is_empty() {
            (String::new(), path.display().to_string(), String::new(), 0)
        } else {
            (
                meta.artist.to_lowercase(),
                meta.title.to_lowercase(),
                meta.album.to_lowercase(),
                meta.duration,
            )
        };

        albums
            .entry(meta.album.clone())
            .or_default()
            .entry(key)
            .or_insert_with(|| Track::from_metadata(&meta))
            .files
            .push(LinkedFile::new(path));
    }

    albums
        .into_iter()
        .map(|(name, tracks)| Album {
            name,
            tracks: tracks.into_values().collect(),
        })
        .collect()
}

/// Scan `root` (a directory or a single file) into albums.
///
/// Files whose tags cannot be read, and entries the walk cannot enter, are
/// logged and left out. A missing `root` is an error.
pub fn scan(root: &Path, recursive: bool) -> Result<Vec<Album>> {
    if !root.exists() {
        return Err(Error::not_found(root));
    }
    let max_depth = if recursive { usize::MAX } else { 1 };

    let files = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_audio_file(e.path()))
        .filter_map(|e| match metadata::read(e.path()) {
            Ok(meta) => Some((e.path().to_path_buf(), meta)),
            Err(err) => {
                tracing::warn!("Skipping {:?}: {}", e.path(), err);
                None
            }
        })
        .collect();

    Ok(group(files))
}

/// Check if a path has an audio file extension
pub fn is_audio_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    matches!(ext.as_deref(), Some("mp3" | "flac" | "ogg" | "m4a" | "wav"))
}
