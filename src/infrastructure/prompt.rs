// src/infrastructure/prompt.rs
use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::application::Prompt;

/// Confirmation on stdin, alerts on stderr
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
