// src/application/mod.rs
pub mod notes_page;
pub mod notes_repository;
pub mod token_store;

pub use notes_page::{NotesPage, PageSnapshot, PageState};
pub use notes_repository::{
    DeleteOutcome, LoadingFlag, LoadingGuard, NotesApi, NotesRepository, Prompt, UploadOutcome,
};
pub use token_store::{clear_credential, AuthApi, Clock, KeyValueStore, SystemClock, TokenStore};
