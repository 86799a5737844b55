// src/ports/html.rs
use html_escape::encode_text;
use tracing::instrument;

use crate::application::{PageSnapshot, PageState};
use crate::constants::GENERATING_TOKEN_MESSAGE;
use crate::ports::view::{NoteCard, NoteListView};

/// File name the notes page is written to, linked from the landing page
pub const NOTES_PAGE_FILE: &str = "notes.html";

const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }
        .landing {
            display: flex;
            flex-direction: column;
            align-items: center;
            margin-top: 20vh;
        }
        .tagline {
            color: #666;
        }
        .button {
            display: inline-block;
            margin-top: 1rem;
            padding: 0.5rem 1.5rem;
            background: #3b82f6;
            color: white;
            border-radius: 6px;
            text-decoration: none;
        }
        .card {
            background: white;
            border-radius: 8px;
            padding: 1rem 1.5rem;
            margin-bottom: 1rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            list-style: none;
        }
        .card-header {
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        .delete {
            background: #ef4444;
            color: white;
            border: none;
            border-radius: 4px;
            padding: 2px 10px;
        }
        .notes {
            padding: 0;
        }
        .error {
            color: #ef4444;
        }
        .muted {
            color: #6b7280;
            text-align: center;
        }
"#;

#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_landing(&self) -> String {
        page(
            "AI Notes",
            &format!(
                r#"<div class="landing">
        <h1>AI Notes</h1>
        <p class="tagline">Transcribe and manage your audio notes.</p>
        <a class="button" href="{NOTES_PAGE_FILE}">View Notes</a>
    </div>"#
            ),
        )
    }

    #[instrument(level = "debug", skip(self, snapshot), fields(state = ?snapshot.state))]
    pub fn render_notes_page(&self, snapshot: &PageSnapshot<'_>) -> String {
        let mut body = String::from("<h1>Your Transcriptions</h1>\n");

        if snapshot.state == PageState::Unauthenticated {
            let message = snapshot.error.unwrap_or(GENERATING_TOKEN_MESSAGE);
            let class = if snapshot.error.is_some() { "error" } else { "muted" };
            body.push_str(&format!(
                r#"    <p class="{class}">{}</p>"#,
                encode_text(message)
            ));
            return page("Your Transcriptions", &body);
        }

        if snapshot.uploading {
            body.push_str("    <p class=\"muted\">Transcribing...</p>\n");
        }
        if let Some(error) = snapshot.error {
            body.push_str(&format!(
                "    <p class=\"error\">{}</p>\n",
                encode_text(error)
            ));
        }

        match NoteListView::build(snapshot.notes) {
            NoteListView::Empty { message } => {
                body.push_str(&format!("    <p class=\"muted\">{}</p>", encode_text(message)));
            }
            NoteListView::Cards(cards) => {
                body.push_str("    <ul class=\"notes\">\n");
                for card in &cards {
                    body.push_str(&render_card(card));
                }
                body.push_str("    </ul>");
            }
        }

        page("Your Transcriptions", &body)
    }
}

fn render_card(card: &NoteCard) -> String {
    let items: String = card
        .items
        .iter()
        .map(|item| format!("                <li>{}</li>\n", encode_text(item)))
        .collect();

    format!(
        r#"        <li class="card">
            <div class="card-header">
                <h2>{heading}</h2>
                <button class="delete" data-note-id="{id}" title="ainotes delete {id}">Delete</button>
            </div>
            <ul>
{items}            </ul>
        </li>
"#,
        heading = encode_text(&card.heading),
        id = card.delete.note_id,
        items = items,
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{STYLE}    </style>
</head>
<body>
    {body}
</body>
</html>"#,
        title = encode_text(title),
    )
}
