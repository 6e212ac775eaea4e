//! Interactive prompts on the terminal.

use async_trait::async_trait;
use std::io::Write;
use tokio::sync::Mutex;

use crate::lyrics::{ConfirmationPrompt, LyricsCandidate, Prompter};

/// Asks on stdout and reads answers from stdin.
///
/// Questions from concurrent lookups are asked one at a time. End of input or
/// a read error counts as "no".
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    turn: Mutex<()>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        let _turn = self.turn.lock().await;
        let question = format!("\n{}\n{}\n[y/N] ", prompt.title, prompt.body);
        ask(question).await.is_some_and(|answer| is_yes(&answer))
    }

    async fn pick(&self, query: &str, candidates: &[LyricsCandidate]) -> Option<usize> {
        let _turn = self.turn.lock().await;
        let mut question = format!("\nSearch results for \"{}\":\n", query);
        for (i, candidate) in candidates.iter().enumerate() {
            question.push_str(&format!("  {:>2}. {}\n", i + 1, candidate.label()));
        }
        question.push_str(&format!(
            "Choose 1-{} (Enter to skip): ",
            candidates.len()
        ));
        let answer = ask(question).await?;
        parse_choice(&answer, candidates.len())
    }
}

/// Print `question` and read one line on a blocking thread.
async fn ask(question: String) -> Option<String> {
    tokio::task::spawn_blocking(move || {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(question.as_bytes()).ok()?;
        stdout.flush().ok()?;

        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    })
    .await
    .ok()
    .flatten()
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// 1-based answer to a 0-based index.
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    let n: usize = answer.trim().parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}
