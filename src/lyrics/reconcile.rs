//! Decide what one audio file's lyrics should become.
//!
//! [`reconcile`] is a pure function of the remote result, what the file
//! already has, and the current settings. It never touches disk; the
//! returned [`ReconciliationDecision`] is executed by [`super::apply`].
//!
//! Local state is classified in this order:
//!
//! 1. Nothing local: take the remote text, write both stores.
//! 2. Embedded only, sidecars enabled: backfill the sidecar from the tag.
//! 3. Sidecar only: copy the sidecar into the tag.
//! 4. Anything else with auto-overwrite: take the remote text.
//! 5. Anything else during a background load: skip.
//! 6. Anything else: take the remote text if the user confirms.
//!
//! A sidecar is only ever created, so `write_sidecar` implies it did not exist.

use super::{LocalLyricsState, LookupOutcome, Method, ReconciliationPolicy};

/// Prompt preview limits.
const PREVIEW_MAX_LINES: usize = 5;
const PREVIEW_LINE_WIDTH: usize = 44;
const ELLIPSIS: char = '…';

/// Where the final text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Remote,
    Embedded,
    Sidecar,
}

/// Question for the confirmation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub title: String,
    pub body: String,
}

/// What to write for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationDecision {
    pub final_text: String,
    pub source: TextSource,
    pub update_embedded: bool,
    pub write_sidecar: bool,
    /// Writes happen only after the prompt is answered "yes".
    pub requires_confirmation: bool,
    pub confirmation_prompt: Option<ConfirmationPrompt>,
}

/// Result of reconciling one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The remote side had no usable text
    NoCandidate,
    /// Existing lyrics would need confirmation, but nobody can be asked
    Skipped,
    Decided(ReconciliationDecision),
}

impl Reconciliation {
    pub fn decision(&self) -> Option<&ReconciliationDecision> {
        match self {
            Self::Decided(decision) => Some(decision),
            _ => None,
        }
    }
}

/// Classify one file's local state against the remote result.
///
/// `track_title` is only used to build the confirmation prompt.
pub fn reconcile(
    remote: &LookupOutcome,
    local: &LocalLyricsState,
    policy: &ReconciliationPolicy,
    method: Method,
    track_title: &str,
) -> Reconciliation {
    let Some(remote_text) = remote.text() else {
        return Reconciliation::NoCandidate;
    };

    let can_create_sidecar = policy.persist_sidecar_file && !local.sidecar_exists;
    let background = policy.is_background_load || method == Method::BackgroundLoad;

    let decided = |final_text: &str, source, update_embedded, write_sidecar| {
        Reconciliation::Decided(ReconciliationDecision {
            final_text: final_text.to_string(),
            source,
            update_embedded,
            write_sidecar,
            requires_confirmation: false,
            confirmation_prompt: None,
        })
    };

    match (local.embedded(), local.sidecar()) {
        (None, None) => decided(remote_text, TextSource::Remote, true, can_create_sidecar),
        (Some(embedded), None) if can_create_sidecar => {
            decided(embedded, TextSource::Embedded, false, true)
        }
        (None, Some(sidecar)) => decided(sidecar, TextSource::Sidecar, true, false),
        _ if policy.auto_overwrite => {
            decided(remote_text, TextSource::Remote, true, can_create_sidecar)
        }
        _ if background => Reconciliation::Skipped,
        _ => Reconciliation::Decided(ReconciliationDecision {
            final_text: remote_text.to_string(),
            source: TextSource::Remote,
            update_embedded: true,
            write_sidecar: can_create_sidecar,
            requires_confirmation: true,
            confirmation_prompt: Some(overwrite_prompt(track_title, remote_text)),
        }),
    }
}

/// Build the "overwrite existing lyrics?" question.
pub fn overwrite_prompt(track_title: &str, new_text: &str) -> ConfirmationPrompt {
    let title = if track_title.trim().is_empty() {
        "<file>"
    } else {
        track_title
    };

    ConfirmationPrompt {
        title: "Overwrite file lyrics?".to_string(),
        body: format!(
            "Lyrics already exist for \"{}\".\n\nNew lyrics:\n{}\n\nOverwrite?",
            title,
            preview(new_text)
        ),
    }
}

/// First few lines of `text`, each cut to a fixed width.
pub fn preview(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let mut out: Vec<String> = lines
        .iter()
        .take(PREVIEW_MAX_LINES)
        .map(|line| truncate_line(line))
        .collect();

    let hidden = lines.len().saturating_sub(PREVIEW_MAX_LINES);
    if hidden > 0 {
        out.push(format!("{} ({} more lines)", ELLIPSIS, hidden));
    }

    out.join("\n")
}

fn truncate_line(line: &str) -> String {
    if line.chars().count() <= PREVIEW_LINE_WIDTH {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(PREVIEW_LINE_WIDTH - 1).collect();
    cut.push(ELLIPSIS);
    cut
}
