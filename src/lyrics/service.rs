//! Lyrics service - drives tracks and albums through lookup and reconciliation
//!
//! For one track:
//! 1. Check the track has files and enough metadata to query
//! 2. Ask the lookup service (exact match, or search plus a human pick)
//! 3. For every linked file: read local lyrics, reconcile, confirm if needed, apply
//!
//! Failures are contained: a lookup error ends one track, a local I/O error
//! ends one file. Nothing here returns `Err` to the caller; everything becomes
//! an outcome in the [`BatchReport`] plus a log line.

use futures::future::join_all;
use std::fmt;
use std::path::{Path, PathBuf};

use super::apply::{ApplyReport, apply};
use super::embedded::EmbeddedLyrics;
use super::inflight::RequestTracker;
use super::prompt::Prompter;
use super::reader::read_local;
use super::reconcile::{Reconciliation, TextSource, overwrite_prompt, reconcile};
use super::{LocalIoError, LookupOutcome, LyricsCandidate, Method, ReconciliationPolicy, TrackQuery};
use crate::config::LyricsConfig;
use crate::library::{Album, Track};
use crate::lookup::{LookupError, LyricsApi};

/// What happened to one linked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Lyrics written to the tag and/or a new sidecar
    Applied {
        source: TextSource,
        report: ApplyReport,
    },
    /// Overwrite was offered and refused
    Declined,
    /// Existing lyrics kept because nobody could be asked
    Skipped,
    /// The remote result had no usable text
    NotFound,
    /// The file disappeared before anything was written
    Vanished,
    /// Local read or write failed
    Failed(String),
}

/// What happened to one track before its files were looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Lookup succeeded; see the per-file outcomes
    Processed,
    /// No files to write to
    NoFiles,
    /// Missing artist, title, album or duration
    IncompleteQuery,
    NotFound,
    /// Search results were shown and none was chosen
    NoSelection,
    /// Lookup failed
    Failed(LookupError),
}

/// Result of one track.
#[derive(Debug, Clone)]
pub struct TrackReport {
    pub track: String,
    pub outcome: TrackOutcome,
    pub files: Vec<(PathBuf, FileOutcome)>,
}

impl TrackReport {
    fn stopped(track: String, outcome: TrackOutcome) -> Self {
        Self {
            track,
            outcome,
            files: Vec::new(),
        }
    }
}

/// Results of a whole run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub tracks: Vec<TrackReport>,
}

impl BatchReport {
    pub fn merge(&mut self, other: BatchReport) {
        self.tracks.extend(other.tracks);
    }

    fn files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.tracks.iter().flat_map(|t| t.files.iter().map(|(_, o)| o))
    }

    fn count_files(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files().filter(|o| pred(o)).count()
    }

    fn count_tracks(&self, pred: impl Fn(&TrackOutcome) -> bool) -> usize {
        self.tracks.iter().filter(|t| pred(&t.outcome)).count()
    }

    /// Files that got new lyrics.
    pub fn applied(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Applied { .. }))
    }

    pub fn declined(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Declined))
    }

    /// Files and tracks left alone without an error.
    pub fn skipped(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Skipped | FileOutcome::Vanished))
            + self.count_tracks(|o| {
                matches!(
                    o,
                    TrackOutcome::NoFiles | TrackOutcome::IncompleteQuery | TrackOutcome::NoSelection
                )
            })
    }

    pub fn not_found(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::NotFound))
            + self.count_tracks(|o| matches!(o, TrackOutcome::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Failed(_)))
            + self.count_tracks(|o| matches!(o, TrackOutcome::Failed(_)))
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applied, {} declined, {} skipped, {} not found, {} errors",
            self.applied(),
            self.declined(),
            self.skipped(),
            self.not_found(),
            self.failed()
        )
    }
}

/// Looks lyrics up and reconciles them into local files.
pub struct LyricsService<A, T, P> {
    api: A,
    tags: T,
    prompter: P,
    settings: LyricsConfig,
}

impl<A: LyricsApi, T: EmbeddedLyrics, P: Prompter> LyricsService<A, T, P> {
    pub fn new(api: A, tags: T, prompter: P, settings: LyricsConfig) -> Self {
        Self {
            api,
            tags,
            prompter,
            settings,
        }
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    #[cfg(test)]
    pub(crate) fn tags(&self) -> &T {
        &self.tags
    }

    #[cfg(test)]
    pub(crate) fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Run every track of every album; albums one after another.
    pub async fn fetch_library(&self, albums: &mut [Album], method: Method) -> BatchReport {
        let mut report = BatchReport::default();
        for album in albums.iter_mut() {
            report.merge(self.fetch_album(album, method).await);
        }
        report
    }

    /// Look up every track of `album` concurrently.
    pub async fn fetch_album(&self, album: &mut Album, method: Method) -> BatchReport {
        let tracker = RequestTracker::new();

        let reports = join_all(
            album
                .tracks
                .iter_mut()
                .map(|track| self.fetch_track(track, method, &tracker)),
        )
        .await;

        // Every guard has dropped once join_all resolves
        debug_assert!(!tracker.is_loading());
        tracing::debug!(
            "Album {:?}: {} lookups finished",
            album.name,
            tracker.finished()
        );

        BatchReport { tracks: reports }
    }

    /// Look up one track and reconcile each of its files.
    ///
    /// A lookup is counted in `tracker` from the request until the last file
    /// has been handled.
    pub async fn fetch_track(
        &self,
        track: &mut Track,
        method: Method,
        tracker: &RequestTracker,
    ) -> TrackReport {
        let name = track.display_name();

        if track.files.is_empty() {
            tracing::debug!("{}: no linked files, skipping", name);
            return TrackReport::stopped(name, TrackOutcome::NoFiles);
        }

        let query = track.query();
        let ready = match method {
            Method::Search => query.search_text().is_some(),
            Method::Get | Method::BackgroundLoad => query.is_complete(),
        };
        if !ready {
            tracing::debug!(
                "{}: artist, title, album name, and duration are required to obtain lyrics",
                name
            );
            return TrackReport::stopped(name, TrackOutcome::IncompleteQuery);
        }

        let _in_flight = tracker.begin();
        tracing::debug!("{}: awaiting remote ({:?})", name, method);

        let candidate = match self.remote_candidate(&query, method, &name).await {
            Ok(candidate) => candidate,
            Err(outcome) => return TrackReport::stopped(name, outcome),
        };

        let remote = LookupOutcome::Found(candidate);
        track.lyrics = remote.text().map(str::to_string);

        let policy = self.settings.policy(method == Method::BackgroundLoad);
        let mut files = Vec::with_capacity(track.files.len());
        for file in &track.files {
            let outcome = self
                .reconcile_file(&file.path, &remote, &policy, method, &track.title)
                .await;
            files.push((file.path.clone(), outcome));
        }

        tracing::debug!("{}: lyrics loaded", name);
        TrackReport {
            track: name,
            outcome: TrackOutcome::Processed,
            files,
        }
    }

    /// Fetch the candidate to reconcile, or the reason there is none.
    async fn remote_candidate(
        &self,
        query: &TrackQuery,
        method: Method,
        name: &str,
    ) -> Result<LyricsCandidate, TrackOutcome> {
        if method == Method::Search {
            let text = query.search_text().unwrap_or_default();
            let candidates: Vec<LyricsCandidate> = self
                .api
                .search(text)
                .await
                .map_err(|e| lookup_failed(name, e))?
                .into_iter()
                .filter(|c| c.effective_text().is_some())
                .collect();

            if candidates.is_empty() {
                tracing::warn!("{}: no search results with lyrics", name);
                return Err(TrackOutcome::NotFound);
            }

            tracing::debug!("{}: presenting {} candidates", name, candidates.len());
            let Some(index) = self.prompter.pick(text, &candidates).await else {
                tracing::info!("{}: no search result chosen", name);
                return Err(TrackOutcome::NoSelection);
            };
            return candidates
                .into_iter()
                .nth(index)
                .ok_or(TrackOutcome::NoSelection);
        }

        match self.api.lookup_exact(query).await {
            Ok(LookupOutcome::Found(candidate)) if candidate.effective_text().is_some() => {
                Ok(candidate)
            }
            Ok(_) => {
                if method.is_interactive() {
                    tracing::warn!("{}: lyrics NOT found", name);
                } else {
                    tracing::info!("{}: lyrics NOT found", name);
                }
                Err(TrackOutcome::NotFound)
            }
            Err(e) => Err(lookup_failed(name, e)),
        }
    }

    async fn reconcile_file(
        &self,
        path: &Path,
        remote: &LookupOutcome,
        policy: &ReconciliationPolicy,
        method: Method,
        title: &str,
    ) -> FileOutcome {
        match self.try_reconcile_file(path, remote, policy, method, title).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("{}", e);
                FileOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_reconcile_file(
        &self,
        path: &Path,
        remote: &LookupOutcome,
        policy: &ReconciliationPolicy,
        method: Method,
        title: &str,
    ) -> Result<FileOutcome, LocalIoError> {
        if !path.exists() {
            tracing::warn!("{:?} is gone, nothing to update", path);
            return Ok(FileOutcome::Vanished);
        }

        let local = read_local(&self.tags, path)?;
        let decision = match reconcile(remote, &local, policy, method, title) {
            Reconciliation::NoCandidate => return Ok(FileOutcome::NotFound),
            Reconciliation::Skipped => {
                tracing::info!("{:?}: keeping existing lyrics", path);
                return Ok(FileOutcome::Skipped);
            }
            Reconciliation::Decided(decision) => decision,
        };

        if decision.requires_confirmation {
            let prompt = decision
                .confirmation_prompt
                .clone()
                .unwrap_or_else(|| overwrite_prompt(title, &decision.final_text));
            if !self.prompter.confirm(&prompt).await {
                tracing::info!("{:?}: overwrite declined", path);
                return Ok(FileOutcome::Declined);
            }
            // Answering may take a while.
            if !path.exists() {
                tracing::warn!("{:?} disappeared while waiting for confirmation", path);
                return Ok(FileOutcome::Vanished);
            }
        }

        let report = apply(&self.tags, path, &decision)?;
        tracing::info!(
            "{:?}: lyrics from {:?} (tag: {}, sidecar: {})",
            path,
            decision.source,
            report.embedded_updated,
            report.sidecar_written
        );

        Ok(FileOutcome::Applied {
            source: decision.source,
            report,
        })
    }
}

fn lookup_failed(name: &str, error: LookupError) -> TrackOutcome {
    match &error {
        LookupError::Decode(_) => tracing::error!("{}: lyrics NOT loaded: {}", name, error),
        _ => tracing::warn!("{}: lyrics NOT found: {}", name, error),
    }
    TrackOutcome::Failed(error)
}
