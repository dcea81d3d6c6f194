//! Terminal contact picker

use async_trait::async_trait;
use cx_contacts::{Contact, ContactError, ContactPicker, PickOutcome};
use nu_ansi_term::Color;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use crate::demo::label;

/// Shows a numbered list on stdout and reads the choice from stdin.
///
/// An empty line (or end of input) cancels the pick.
pub struct TerminalPicker;

/// Interpret one line of picker input
fn parse_choice(input: &str, count: usize) -> Option<Option<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return Some(None);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(Some(n - 1)),
        _ => None,
    }
}

#[async_trait]
impl ContactPicker for TerminalPicker {
    async fn pick(&self, candidates: &[Contact]) -> cx_contacts::Result<PickOutcome> {
        let mut stdout = tokio::io::stdout();
        let mut stdin = BufReader::new(tokio::io::stdin());

        let mut menu = String::from("\n");
        for (i, contact) in candidates.iter().enumerate() {
            menu.push_str(&format!("  {:>3}. {}\n", i + 1, label(contact)));
        }
        stdout.write_all(menu.as_bytes()).await.map_err(io_failure)?;

        loop {
            let prompt = format!("{} ", Color::Cyan.bold().paint("Pick a contact (Enter to cancel):"));
            stdout.write_all(prompt.as_bytes()).await.map_err(io_failure)?;
            stdout.flush().await.map_err(io_failure)?;

            let mut line = String::new();
            if stdin.read_line(&mut line).await.map_err(io_failure)? == 0 {
                return Ok(PickOutcome::Cancelled);
            }

            match parse_choice(&line, candidates.len()) {
                Some(None) => return Ok(PickOutcome::Cancelled),
                Some(Some(index)) => {
                    let id = candidates[index].id.clone().unwrap_or_default();
                    return Ok(PickOutcome::Selected(id));
                }
                None => {
                    let hint = format!("Enter a number between 1 and {}\n", candidates.len());
                    stdout.write_all(hint.as_bytes()).await.map_err(io_failure)?;
                }
            }
        }
    }
}

fn io_failure(e: std::io::Error) -> ContactError {
    warn!("Picker I/O failed: {}", e);
    ContactError::Io
}
