// src/domain/mod.rs
pub mod audio_file;
pub mod credential;
pub mod error;
pub mod note;

pub use audio_file::AudioFile;
pub use credential::{Credential, TokenGrant};
pub use error::DomainError;
pub use note::Note;
