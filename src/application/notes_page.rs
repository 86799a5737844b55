// src/application/notes_page.rs
use tracing::{debug, info, instrument};

use crate::application::notes_repository::{
    DeleteOutcome, NotesApi, NotesRepository, Prompt, UploadOutcome,
};
use crate::application::token_store::{AuthApi, Clock, KeyValueStore, SystemClock, TokenStore};
use crate::constants::NO_FILE_SELECTED_MESSAGE;
use crate::domain::{AudioFile, Credential, DomainError, Note};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Unauthenticated,
    AuthenticatedEmpty,
    AuthenticatedWithNotes,
}

/// Everything a presenter needs to draw the page
#[derive(Debug, Clone, Copy)]
pub struct PageSnapshot<'a> {
    pub state: PageState,
    pub uploading: bool,
    pub error: Option<&'a str>,
    pub notes: &'a [Note],
    pub pending_file: Option<&'a str>,
}

/// Primary screen: credential acquisition, automatic listing, pending file
/// selection, upload and delete.
pub struct NotesPage<S, A, N, P, C = SystemClock>
where
    N: NotesApi,
{
    token_store: TokenStore<S, A, C>,
    repository: NotesRepository<N>,
    prompt: P,
    pending_file: Option<AudioFile>,
    // Token the notes were last listed for; listing runs once per credential.
    listed_for: Option<String>,
}

impl<S, A, N, P, C> NotesPage<S, A, N, P, C>
where
    S: KeyValueStore,
    A: AuthApi,
    N: NotesApi,
    P: Prompt,
    C: Clock,
{
    pub fn new(
        token_store: TokenStore<S, A, C>,
        repository: NotesRepository<N>,
        prompt: P,
    ) -> Self {
        Self {
            token_store,
            repository,
            prompt,
            pending_file: None,
            listed_for: None,
        }
    }

    /// Acquire a credential and list notes when it newly resolves.
    ///
    /// Safe to call repeatedly; a failed acquisition is retried on the next call.
    #[instrument(level = "debug", skip(self))]
    pub fn mount(&mut self) -> PageState {
        match self.token_store.acquire_credential() {
            Ok(credential) => self.on_credential_resolved(&credential),
            Err(e) => debug!(error = %e, "Page remains unauthenticated"),
        }
        self.state()
    }

    /// Re-list notes with the current credential
    pub fn refresh(&mut self) -> Result<(), DomainError> {
        self.repository.list_notes(self.token_store.credential())
    }

    /// Hold a file for the next upload, replacing any earlier selection
    pub fn select_file(&mut self, file: AudioFile) {
        debug!(filename = %file.filename, "File selected");
        self.pending_file = Some(file);
    }

    pub fn pending_file(&self) -> Option<&AudioFile> {
        self.pending_file.as_ref()
    }

    /// Upload the pending file. The selection is cleared only on success.
    pub fn trigger_upload(&mut self) -> UploadOutcome {
        if self.pending_file.is_none() {
            self.prompt.alert(NO_FILE_SELECTED_MESSAGE);
            return UploadOutcome::Skipped;
        }

        let outcome = self.repository.upload_note(
            self.pending_file.as_ref(),
            self.token_store.credential(),
            &mut self.prompt,
        );
        if let UploadOutcome::Uploaded(_) = outcome {
            self.pending_file = None;
        }
        outcome
    }

    pub fn trigger_delete(&mut self, note_id: i64) -> DeleteOutcome {
        self.repository
            .delete_note(note_id, self.token_store.credential(), &mut self.prompt)
    }

    pub fn state(&self) -> PageState {
        if self.token_store.credential().is_none() {
            PageState::Unauthenticated
        } else if self.repository.notes().is_empty() {
            PageState::AuthenticatedEmpty
        } else {
            PageState::AuthenticatedWithNotes
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.repository.is_loading()
    }

    /// Authentication failures take precedence over listing failures
    pub fn error(&self) -> Option<&str> {
        self.token_store.error().or(self.repository.error())
    }

    pub fn notes(&self) -> &[Note] {
        self.repository.notes()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.token_store.credential()
    }

    pub fn token_store(&self) -> &TokenStore<S, A, C> {
        &self.token_store
    }

    pub fn repository(&self) -> &NotesRepository<N> {
        &self.repository
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn snapshot(&self) -> PageSnapshot<'_> {
        PageSnapshot {
            state: self.state(),
            uploading: self.is_uploading(),
            error: self.error(),
            notes: self.notes(),
            pending_file: self.pending_file.as_ref().map(|f| f.filename.as_str()),
        }
    }

    fn on_credential_resolved(&mut self, credential: &Credential) {
        if self.listed_for.as_deref() == Some(credential.token.as_str()) {
            debug!("Notes already listed for this credential");
            return;
        }
        info!(user_id = %credential.user_id, "Credential resolved, listing notes");
        self.listed_for = Some(credential.token.clone());
        // A listing failure is kept as the page's inline error.
        let _ = self.repository.list_notes(Some(credential));
    }
}
