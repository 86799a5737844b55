mod helpers;

use ainotes::application::{
    DeleteOutcome, NotesPage, NotesRepository, PageState, TokenStore, UploadOutcome,
};
use ainotes::constants::{AUTH_TOKEN_EXPIRY_KEY, AUTH_TOKEN_KEY, USER_ID_KEY};
use ainotes::domain::AudioFile;
use ainotes::infrastructure::{FileKeyValueStore, HttpNotesApi};
use ainotes::util::testing::ScriptedPrompt;
use anyhow::Result;
use chrono::{Duration, Utc};
use helpers::{seeded_notes, BackendState, FakeBackend};
use std::path::Path;
use tempfile::TempDir;

type HttpPage = NotesPage<FileKeyValueStore, HttpNotesApi, HttpNotesApi, ScriptedPrompt>;

fn open_page(backend: &FakeBackend, storage: &Path, prompt: ScriptedPrompt) -> Result<HttpPage> {
    let api = HttpNotesApi::new(&backend.base_url, std::time::Duration::from_secs(5))?;
    let store = FileKeyValueStore::open(storage)?;
    Ok(NotesPage::new(
        TokenStore::new(store, api.clone()),
        NotesRepository::new(api),
        prompt,
    ))
}

fn seeded_backend() -> FakeBackend {
    FakeBackend::start_with(BackendState {
        notes: seeded_notes(),
        ..BackendState::default()
    })
}

#[test]
fn given_empty_cache_when_mounting_then_generates_token_once_and_persists_keys() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let storage = temp_dir.path().join("local_storage.json");
    let mut page = open_page(&backend, &storage, ScriptedPrompt::accepting())?;

    // Act
    let state = page.mount();

    // Assert
    assert_eq!(state, PageState::AuthenticatedWithNotes);
    assert_eq!(page.notes().len(), 3);
    assert_eq!(backend.state().token_requests, 1);
    assert_eq!(backend.state().list_requests, 1);

    let persisted = std::fs::read_to_string(&storage)?;
    assert!(persisted.contains(AUTH_TOKEN_KEY));
    assert!(persisted.contains(USER_ID_KEY));
    assert!(persisted.contains(AUTH_TOKEN_EXPIRY_KEY));
    Ok(())
}

#[test]
fn given_valid_cache_when_loading_page_again_then_issues_no_token_request() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let storage = temp_dir.path().join("local_storage.json");
    open_page(&backend, &storage, ScriptedPrompt::accepting())?.mount();

    // Act
    let mut second_load = open_page(&backend, &storage, ScriptedPrompt::accepting())?;
    let state = second_load.mount();

    // Assert
    assert_eq!(state, PageState::AuthenticatedWithNotes);
    assert_eq!(backend.state().token_requests, 1);
    assert_eq!(backend.state().list_requests, 2);
    Ok(())
}

#[test]
fn given_expired_cache_when_mounting_then_requests_one_token_and_overwrites_keys() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let storage = temp_dir.path().join("local_storage.json");
    let expired = (Utc::now() - Duration::minutes(5)).timestamp_millis();
    std::fs::write(
        &storage,
        format!(
            r#"{{"auth_token":"stale","user_id":"old-user","auth_token_expiry":"{expired}"}}"#
        ),
    )?;
    let mut page = open_page(&backend, &storage, ScriptedPrompt::accepting())?;

    // Act
    page.mount();

    // Assert
    assert_eq!(backend.state().token_requests, 1);
    let persisted = std::fs::read_to_string(&storage)?;
    assert!(!persisted.contains("stale"));
    assert!(!persisted.contains("old-user"));
    assert!(!persisted.contains(&expired.to_string()));
    assert!(persisted.contains("token-1"));
    Ok(())
}

#[test]
fn given_token_service_down_when_mounting_then_page_is_unauthenticated() -> Result<()> {
    // Arrange
    let backend = FakeBackend::start_with(BackendState {
        fail_tokens: true,
        ..BackendState::default()
    });
    let temp_dir = TempDir::new()?;
    let mut page = open_page(
        &backend,
        &temp_dir.path().join("local_storage.json"),
        ScriptedPrompt::accepting(),
    )?;

    // Act
    let state = page.mount();

    // Assert
    assert_eq!(state, PageState::Unauthenticated);
    assert_eq!(page.error(), Some("Failed to generate authentication token"));
    assert_eq!(backend.state().list_requests, 0);
    Ok(())
}

#[test]
fn given_uploaded_file_when_listing_then_new_note_is_first_and_order_is_kept() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let mut page = open_page(
        &backend,
        &temp_dir.path().join("local_storage.json"),
        ScriptedPrompt::accepting(),
    )?;
    page.mount();
    page.select_file(AudioFile::new("interview.ogg", vec![0; 64]));

    // Act
    let outcome = page.trigger_upload();

    // Assert
    let UploadOutcome::Uploaded(created) = outcome else {
        panic!("Expected upload to succeed");
    };
    let ids: Vec<i64> = page.notes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![created.id, 3, 2, 1]);
    assert!(page.pending_file().is_none());
    assert!(!page.is_uploading());

    page.refresh()?;
    assert_eq!(page.notes()[0].id, created.id);
    Ok(())
}

#[test]
fn given_no_selected_file_when_uploading_then_alerts_and_sends_nothing() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let mut page = open_page(
        &backend,
        &temp_dir.path().join("local_storage.json"),
        ScriptedPrompt::accepting(),
    )?;
    page.mount();

    // Act
    let outcome = page.trigger_upload();

    // Assert
    assert_eq!(outcome, UploadOutcome::Skipped);
    assert_eq!(page.prompt().alerts(), ["Please select a file first!"]);
    assert!(backend.state().uploads.is_empty());
    assert_eq!(page.notes().len(), 3);
    Ok(())
}

#[test]
fn given_confirmed_delete_when_refreshing_then_note_is_gone() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let mut page = open_page(
        &backend,
        &temp_dir.path().join("local_storage.json"),
        ScriptedPrompt::accepting(),
    )?;
    page.mount();

    // Act
    let outcome = page.trigger_delete(2);
    page.refresh()?;

    // Assert
    assert_eq!(outcome, DeleteOutcome::Deleted);
    let ids: Vec<i64> = page.notes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![3, 1]);
    Ok(())
}

#[test]
fn given_declined_delete_when_deleting_then_no_request_is_sent() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let mut page = open_page(
        &backend,
        &temp_dir.path().join("local_storage.json"),
        ScriptedPrompt::declining(),
    )?;
    page.mount();

    // Act
    let outcome = page.trigger_delete(2);

    // Assert
    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(backend.state().delete_requests, 0);
    assert_eq!(page.notes().len(), 3);
    Ok(())
}

#[test]
fn given_backend_rejects_delete_when_deleting_then_alerts_and_keeps_list() -> Result<()> {
    // Arrange
    let backend = seeded_backend();
    let temp_dir = TempDir::new()?;
    let mut page = open_page(
        &backend,
        &temp_dir.path().join("local_storage.json"),
        ScriptedPrompt::accepting(),
    )?;
    page.mount();

    // Act
    let outcome = page.trigger_delete(404);

    // Assert
    assert_eq!(outcome, DeleteOutcome::Failed);
    assert_eq!(page.prompt().alerts(), ["Error deleting note"]);
    assert_eq!(page.notes().len(), 3);
    Ok(())
}
