//! Lyrics fetching over scanned files.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::duration::{DurationError, format_duration, parse_duration};
use crate::library::{self, Album};
use crate::lookup::LrclibClient;
use crate::lyrics::{
    BatchReport, FileOutcome, HeadlessPrompter, LyricsService, Method, Prompter, TagLyrics,
    TrackOutcome,
};

/// Fetch (exact) or search lyrics for every track under `path`.
pub fn cmd_fetch(
    rt: &Runtime,
    path: &Path,
    method: Method,
    prompter: Box<dyn Prompter>,
    duration: Option<&str>,
    recursive: bool,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let config = config::load();
    let mut albums = scan(path, recursive)?;

    if let Some(text) = duration {
        match override_duration(&mut albums, text) {
            Ok(secs) => println!("Using duration {}", format_duration(secs)),
            Err(e) => eprintln!("Ignoring --duration: {} (exact lookups skipped)", e),
        }
    }

    let service = LyricsService::new(client(&config, base_url)?, TagLyrics, prompter, config.lyrics);
    let report = rt.block_on(service.fetch_library(&mut albums, method));
    print_report(&report);
    Ok(())
}

/// Load files the way a tagger does on open.
///
/// Without `auto_fetch_on_load` this only lists what was found.
pub fn cmd_load(
    rt: &Runtime,
    path: &Path,
    recursive: bool,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let config = config::load();
    let mut albums = scan(path, recursive)?;

    for album in &albums {
        println!("{}", if album.name.is_empty() { "[no album]" } else { album.name.as_str() });
        for track in &album.tracks {
            println!("  {} ({} file(s))", track.display_name(), track.files.len());
        }
    }

    if !config.lyrics.auto_fetch_on_load {
        println!();
        println!("auto_fetch_on_load is off; use `fetch` or `search` to get lyrics.");
        return Ok(());
    }

    let service = LyricsService::new(
        client(&config, base_url)?,
        TagLyrics,
        HeadlessPrompter,
        config.lyrics,
    );
    let report = rt.block_on(service.fetch_library(&mut albums, Method::BackgroundLoad));
    println!();
    print_report(&report);
    Ok(())
}

fn scan(path: &Path, recursive: bool) -> anyhow::Result<Vec<Album>> {
    let albums = library::scan(path, recursive)?;
    let files: usize = albums
        .iter()
        .flat_map(|a| &a.tracks)
        .map(|t| t.files.len())
        .sum();
    tracing::info!("Found {} audio file(s) in {} album(s)", files, albums.len());
    Ok(albums)
}

fn client(config: &Config, base_url: Option<&str>) -> anyhow::Result<LrclibClient> {
    let base_url = base_url.unwrap_or(config.lookup.base_url.as_str());
    Ok(LrclibClient::new(base_url, config.lookup.response_cache())?)
}

/// Replace every track's duration with `text` parsed.
///
/// A value that does not parse clears the durations instead, so no exact
/// lookup is sent with a length the user did not mean.
fn override_duration(albums: &mut [Album], text: &str) -> Result<u64, DurationError> {
    let parsed = parse_duration(text);
    let duration = parsed.as_ref().ok().copied();
    for track in albums.iter_mut().flat_map(|a| a.tracks.iter_mut()) {
        track.duration_secs = duration.filter(|&secs| secs > 0);
    }
    parsed
}

fn print_report(report: &BatchReport) {
    for track in &report.tracks {
        match &track.outcome {
            TrackOutcome::Processed => {}
            TrackOutcome::NoFiles => continue,
            TrackOutcome::IncompleteQuery => {
                println!("- {}: missing artist, title, album or duration", track.track);
            }
            TrackOutcome::NotFound => println!("✗ {}: no lyrics found", track.track),
            TrackOutcome::NoSelection => println!("- {}: nothing chosen", track.track),
            TrackOutcome::Failed(e) => println!("✗ {}: {}", track.track, e),
        }

        for (path, outcome) in &track.files {
            let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
            match outcome {
                FileOutcome::Applied { source, report } => {
                    let mut targets = Vec::new();
                    if report.embedded_updated {
                        targets.push("tag");
                    }
                    if report.sidecar_written {
                        targets.push(".lrc");
                    }
                    println!("✓ {} ({:?} → {})", name, source, targets.join(" + "));
                }
                FileOutcome::Declined => println!("- {}: kept existing lyrics", name),
                FileOutcome::Skipped => println!("- {}: has lyrics, skipped", name),
                FileOutcome::NotFound => println!("✗ {}: no lyrics text", name),
                FileOutcome::Vanished => println!("- {}: file is gone", name),
                FileOutcome::Failed(e) => println!("✗ {}: {}", name, e),
            }
        }
    }

    println!();
    println!("{}", report);
}
