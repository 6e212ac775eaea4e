//! Questions that need a human answer.
//!
//! The service only asks two things: "overwrite these lyrics?" and "which of
//! these search results?". Each is a single request/response with no retry.

use async_trait::async_trait;

use super::LyricsCandidate;
use super::reconcile::ConfirmationPrompt;

/// Confirmation and candidate-picker collaborator.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// `true` to go ahead with the overwrite.
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool;

    /// Index into `candidates`, or `None` to give up.
    async fn pick(&self, query: &str, candidates: &[LyricsCandidate]) -> Option<usize>;
}

/// Declines everything. Used when nobody is there to answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPrompter;

#[async_trait]
impl Prompter for HeadlessPrompter {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        tracing::info!("No one to confirm \"{}\", keeping existing lyrics", prompt.title);
        false
    }

    async fn pick(&self, _query: &str, _candidates: &[LyricsCandidate]) -> Option<usize> {
        None
    }
}

/// Says yes to every overwrite and takes the top-ranked search result.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Prompter for AutoConfirm {
    async fn confirm(&self, _prompt: &ConfirmationPrompt) -> bool {
        true
    }

    async fn pick(&self, _query: &str, candidates: &[LyricsCandidate]) -> Option<usize> {
        (!candidates.is_empty()).then_some(0)
    }
}

#[async_trait]
impl<P: Prompter + ?Sized> Prompter for Box<P> {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        (**self).confirm(prompt).await
    }

    async fn pick(&self, query: &str, candidates: &[LyricsCandidate]) -> Option<usize> {
        (**self).pick(query, candidates).await
    }
}
