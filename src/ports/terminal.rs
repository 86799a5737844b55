// src/ports/terminal.rs
use std::fmt::Write;

use crate::application::{PageSnapshot, PageState};
use crate::constants::GENERATING_TOKEN_MESSAGE;
use crate::ports::view::NoteListView;

/// Plain-text rendering for the terminal
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_landing(&self) -> String {
        "AI Notes\n\
         Transcribe and manage your audio notes.\n\
         \n\
         View Notes: ainotes list\n"
            .to_string()
    }

    pub fn render_notes_page(&self, page: &PageSnapshot<'_>) -> String {
        let mut out = String::from("Your Transcriptions\n\n");

        if page.state == PageState::Unauthenticated {
            match page.error {
                Some(error) => writeln!(out, "{error}").ok(),
                None => writeln!(out, "{GENERATING_TOKEN_MESSAGE}").ok(),
            };
            return out;
        }

        if page.uploading {
            out.push_str("Transcribing...\n\n");
        } else if let Some(filename) = page.pending_file {
            writeln!(out, "Selected: {filename}\n").ok();
        }

        if let Some(error) = page.error {
            writeln!(out, "{error}\n").ok();
        }

        match NoteListView::build(page.notes) {
            NoteListView::Empty { message } => {
                writeln!(out, "{message}").ok();
            }
            NoteListView::Cards(cards) => {
                for card in cards {
                    writeln!(out, "[{}] {}", card.delete.note_id, card.heading).ok();
                    for item in &card.items {
                        writeln!(out, "  • {item}").ok();
                    }
                    out.push('\n');
                }
            }
        }
        out
    }
}
