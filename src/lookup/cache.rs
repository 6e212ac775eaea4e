//! HTTP response cache keyed by full request URL.
//!
//! Lyrics records are treated as stable, so entries never expire within a
//! process. Responses live in memory and, when a directory is configured,
//! on disk as JSON envelopes named by the SHA-256 of the URL.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// One cached response body.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    url: String,
    fetched_at: String,
    body: String,
}

/// Response cache shared by all requests of a client.
#[derive(Debug, Default)]
pub struct ResponseCache {
    memory: Mutex<HashMap<String, String>>,
    disk_dir: Option<PathBuf>,
}

impl ResponseCache {
    /// Memory-only cache.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Cache backed by `dir`.
    pub fn with_disk(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Could not create response cache {:?}: {}", dir, e);
        }
        Self {
            memory: Mutex::new(HashMap::new()),
            disk_dir: Some(dir),
        }
    }

    /// Default on-disk location (user cache directory).
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("lyrics-minder")
            .join("http")
    }

    /// Cached body for `url`, if any.
    pub fn get(&self, url: &str) -> Option<String> {
        if let Some(body) = self.memory.lock().get(url) {
            return Some(body.clone());
        }

        let path = self.entry_path(url)?;
        let contents = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&contents) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache entry {:?}: {}", path, e);
                return None;
            }
        };
        if entry.url != url {
            return None;
        }

        self.memory.lock().insert(url.to_string(), entry.body.clone());
        Some(entry.body)
    }

    /// Remember `body` for `url`. Disk failures only cost a future refetch.
    pub fn put(&self, url: &str, body: &str) {
        self.memory.lock().insert(url.to_string(), body.to_string());

        let Some(path) = self.entry_path(url) else {
            return;
        };
        let entry = CacheEntry {
            url: url.to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            body: body.to_string(),
        };
        let result = serde_json::to_string(&entry)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(&path, json));
        if let Err(e) = result {
            tracing::warn!("Failed to write cache entry {:?}: {}", path, e);
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, url: &str) -> bool {
        self.memory.lock().contains_key(url)
            || self.entry_path(url).is_some_and(|p| p.exists())
    }

    /// Drop every entry, in memory and on disk.
    pub fn clear(&self) -> Result<(), std::io::Error> {
        self.memory.lock().clear();

        if let Some(dir) = self.disk_dir.as_ref().filter(|d| d.exists()) {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    fs::remove_file(entry.path())?;
                }
            }
        }
        Ok(())
    }

    /// Number of entries on disk.
    pub fn disk_entries(&self) -> usize {
        self.disk_dir
            .as_ref()
            .and_then(|dir| fs::read_dir(dir).ok())
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    fn entry_path(&self, url: &str) -> Option<PathBuf> {
        let dir = self.disk_dir.as_ref()?;
        let key = format!("{:x}", Sha256::digest(url.as_bytes()));
        Some(dir.join(format!("{}.json", key)))
    }
}
