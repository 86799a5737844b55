// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use application::{DeleteOutcome, NotesPage, NotesRepository, PageState, TokenStore, UploadOutcome};
use domain::AudioFile;
use infrastructure::{Config, FileKeyValueStore, HttpNotesApi, SiteRenderer, TerminalPrompt};
use ports::{HtmlPresenter, TerminalPresenter};
use tracing::{debug, info};

use crate::cli::args::{Args, Command};
use crate::constants::AUTH_FAILED_MESSAGE;
use crate::ports::html::NOTES_PAGE_FILE;

type CliPage = NotesPage<FileKeyValueStore, HttpNotesApi, HttpNotesApi, TerminalPrompt>;

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting ainotes with arguments");
    let presenter = TerminalPresenter::new();

    match &args.command {
        Command::Home => {
            print!("{}", presenter.render_landing());
            Ok(())
        }
        Command::Logout => {
            let config = load_config(args.config.as_deref())?;
            let storage_path = config.resolve_storage_path(args.storage.clone())?;
            let mut storage = FileKeyValueStore::open(&storage_path)?;
            application::clear_credential(&mut storage)
                .context("Failed to clear cached credential")?;
            info!(path = ?storage_path, "Cleared cached credential");
            println!("Logged out");
            Ok(())
        }
        Command::List { json } => {
            let page = mount_page(&args, false)?;
            if *json {
                ensure_authenticated(&page)?;
                if let Some(error) = page.repository().error() {
                    bail!("{error}");
                }
                println!("{}", serde_json::to_string_pretty(page.notes())?);
                return Ok(());
            }
            print!("{}", presenter.render_notes_page(&page.snapshot()));
            ensure_authenticated(&page)
        }
        Command::Upload { file } => {
            let mut page = mount_page(&args, false)?;
            ensure_authenticated(&page)?;
            if let Some(path) = file {
                page.select_file(AudioFile::from_path(path)?);
            }
            if let Some(selected) = page.pending_file() {
                eprintln!("Transcribing {}...", selected.filename);
            }

            match page.trigger_upload() {
                UploadOutcome::Uploaded(note) => {
                    info!(note_id = note.id, "Upload complete");
                    print!("{}", presenter.render_notes_page(&page.snapshot()));
                    Ok(())
                }
                UploadOutcome::Failed => bail!("Upload did not complete"),
                // The page already alerted about the missing file.
                UploadOutcome::Skipped => Ok(()),
            }
        }
        Command::Delete { note_id, yes } => {
            let mut page = mount_page(&args, *yes)?;
            ensure_authenticated(&page)?;

            match page.trigger_delete(*note_id) {
                DeleteOutcome::Deleted => {
                    println!("Deleted note {note_id}");
                    Ok(())
                }
                DeleteOutcome::Declined => {
                    println!("Cancelled");
                    Ok(())
                }
                DeleteOutcome::Failed => bail!("Note {note_id} was not deleted"),
                DeleteOutcome::Skipped => bail!(domain::DomainError::NotAuthenticated),
            }
        }
        Command::Open => {
            let page = mount_page(&args, false)?;
            let html = HtmlPresenter::new();
            let mut renderer = SiteRenderer::new();

            let entry = renderer.write_site(&[
                ("index.html", html.render_landing()),
                (NOTES_PAGE_FILE, html.render_notes_page(&page.snapshot())),
            ])?;
            info!(path = ?entry, "Opening notes in browser");
            renderer.open_in_browser(&entry)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Config::load_or_default(Config::default_path().as_deref()),
    }
}

/// Build the page from configuration and run the mount transition
fn mount_page(args: &Args, assume_yes: bool) -> Result<CliPage> {
    let settings = load_config(args.config.as_deref())?
        .resolve(args.api_url.clone(), args.storage.clone())?;
    debug!(?settings, "Resolved settings");

    let storage = FileKeyValueStore::open(&settings.storage_path)?;
    let api = HttpNotesApi::new(&settings.api_url, settings.timeout)?;

    let mut page = NotesPage::new(
        TokenStore::new(storage, api.clone()),
        NotesRepository::new(api),
        TerminalPrompt::new(assume_yes),
    );

    let state = page.mount();
    debug!(?state, "Mounted notes page");
    Ok(page)
}

fn ensure_authenticated(page: &CliPage) -> Result<()> {
    if page.state() == PageState::Unauthenticated {
        return Err(anyhow!(page.error().unwrap_or(AUTH_FAILED_MESSAGE).to_string()));
    }
    Ok(())
}
