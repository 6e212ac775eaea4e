//! One-off remote queries and response cache maintenance.

use anyhow::Context;
use tokio::runtime::Runtime;

use crate::config;
use crate::duration::parse_duration;
use crate::lookup::LrclibClient;
use crate::lyrics::{LookupOutcome, TrackQuery};

/// Exact lookup, printed to stdout. No file is touched.
pub fn cmd_lookup(
    rt: &Runtime,
    artist: &str,
    title: &str,
    album: &str,
    duration: &str,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let seconds = parse_duration(duration)
        .with_context(|| format!("Cannot look up \"{}\" without a valid duration", title))?;

    let query = TrackQuery {
        artist: artist.to_string(),
        title: title.to_string(),
        album: album.to_string(),
        duration_secs: Some(seconds),
    };

    let config = config::load();
    let base_url = base_url.unwrap_or(config.lookup.base_url.as_str());
    let client = LrclibClient::new(base_url, config.lookup.response_cache())?;

    match rt.block_on(client.lookup_exact(&query))? {
        LookupOutcome::Found(candidate) => {
            let Some(text) = candidate.effective_text() else {
                println!("✗ Record found but it has no lyrics text");
                return Ok(());
            };
            println!("✓ {}", candidate.label());
            if let Some(id) = candidate.source_id {
                println!("  LRCLIB id: {}", id);
            }
            println!();
            println!("{}", text);
        }
        LookupOutcome::NotFound => {
            println!("✗ No lyrics for \"{}\" by {}", title, artist);
        }
    }

    Ok(())
}

/// Empty the on-disk response cache.
pub fn cmd_clear_cache() -> anyhow::Result<()> {
    let config = config::load();
    let cache = config.lookup.response_cache();
    let entries = cache.disk_entries();
    cache.clear().context("Failed to clear response cache")?;
    println!("Removed {} cached response(s)", entries);
    Ok(())
}
