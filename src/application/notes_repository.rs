// src/application/notes_repository.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::constants::{CONFIRM_DELETE_MESSAGE, DELETE_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE};
use crate::domain::{AudioFile, Credential, DomainError, Note};

/// Remote notes collection
pub trait NotesApi {
    fn list_notes(&mut self, credential: &Credential) -> Result<Vec<Note>, DomainError>;

    fn delete_note(&mut self, id: i64, credential: &Credential) -> Result<(), DomainError>;

    /// Upload audio for transcription; the backend answers with the new note
    fn upload_note(&mut self, file: &AudioFile, credential: &Credential)
        -> Result<Note, DomainError>;
}

/// Interactive confirmation and interrupting notifications
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Shared "upload in progress" flag
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag until the returned guard is dropped
    pub fn begin(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(Arc::clone(&self.0))
    }
}

#[must_use = "the loading flag is cleared when the guard drops"]
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation prompt
    Declined,
    Failed,
    /// No credential, nothing was attempted
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(Note),
    Failed,
    Skipped,
}

/// In-memory, most-recent-first list of notes backed by the remote API.
///
/// The list and the loading flag are only mutated through `list_notes`,
/// `delete_note` and `upload_note`.
pub struct NotesRepository<A: NotesApi> {
    api: A,
    notes: Vec<Note>,
    loading: LoadingFlag,
    error: Option<String>,
}

impl<A: NotesApi> NotesRepository<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            notes: Vec::new(),
            loading: LoadingFlag::default(),
            error: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Message of the latest failed listing
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replace the whole list with the backend's collection.
    ///
    /// On failure the previous list is kept and the error is recorded.
    #[instrument(level = "debug", skip(self, credential))]
    pub fn list_notes(&mut self, credential: Option<&Credential>) -> Result<(), DomainError> {
        let Some(credential) = credential else {
            debug!("No credential, skipping note listing");
            return Ok(());
        };

        match self.api.list_notes(credential) {
            Ok(notes) => {
                info!(count = notes.len(), "Fetched notes");
                self.notes = notes;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch notes");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete a note after the user confirms
    #[instrument(level = "debug", skip(self, credential, prompt))]
    pub fn delete_note<P: Prompt + ?Sized>(
        &mut self,
        id: i64,
        credential: Option<&Credential>,
        prompt: &mut P,
    ) -> DeleteOutcome {
        let Some(credential) = credential else {
            debug!("No credential, skipping delete");
            return DeleteOutcome::Skipped;
        };

        if !prompt.confirm(CONFIRM_DELETE_MESSAGE) {
            debug!(note_id = id, "Delete declined");
            return DeleteOutcome::Declined;
        }

        match self.api.delete_note(id, credential) {
            Ok(()) => {
                if let Some(pos) = self.notes.iter().position(|note| note.id == id) {
                    self.notes.remove(pos);
                }
                info!(note_id = id, "Deleted note");
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!(note_id = id, error = %e, "Failed to delete note");
                prompt.alert(DELETE_FAILED_MESSAGE);
                DeleteOutcome::Failed
            }
        }
    }

    /// Upload a file for transcription and prepend the resulting note
    #[instrument(level = "debug", skip_all)]
    pub fn upload_note<P: Prompt + ?Sized>(
        &mut self,
        file: Option<&AudioFile>,
        credential: Option<&Credential>,
        prompt: &mut P,
    ) -> UploadOutcome {
        let (Some(credential), Some(file)) = (credential, file) else {
            debug!("Missing credential or file, skipping upload");
            return UploadOutcome::Skipped;
        };

        let _loading = self.loading.begin();
        debug!(filename = %file.filename, size = file.bytes.len(), "Uploading file");

        match self.api.upload_note(file, credential) {
            Ok(note) => {
                info!(note_id = note.id, filename = %note.filename, "Transcribed note");
                self.notes.insert(0, note.clone());
                UploadOutcome::Uploaded(note)
            }
            Err(e) => {
                warn!(filename = %file.filename, error = %e, "Upload failed");
                prompt.alert(UPLOAD_FAILED_MESSAGE);
                UploadOutcome::Failed
            }
        }
    }
}
