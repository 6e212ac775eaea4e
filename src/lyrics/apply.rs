//! Execute a reconciliation decision against one file.

use std::path::Path;

use super::embedded::EmbeddedLyrics;
use super::reconcile::ReconciliationDecision;
use super::sidecar::create_sidecar;
use super::LocalIoError;

/// What actually changed on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub embedded_updated: bool,
    pub sidecar_written: bool,
}

/// Write `decision.final_text` where the decision says to.
///
/// The sidecar is only created, never replaced: if one appeared after the
/// decision was made it is left untouched and `sidecar_written` is false.
/// Confirmation must already have been obtained by the caller.
pub fn apply<T: EmbeddedLyrics + ?Sized>(
    tags: &T,
    audio_path: &Path,
    decision: &ReconciliationDecision,
) -> Result<ApplyReport, LocalIoError> {
    let mut report = ApplyReport::default();

    if decision.update_embedded {
        tags.write_lyrics(audio_path, &decision.final_text)?;
        report.embedded_updated = true;
    }

    if decision.write_sidecar {
        report.sidecar_written = create_sidecar(audio_path, &decision.final_text)?;
    }

    Ok(report)
}
