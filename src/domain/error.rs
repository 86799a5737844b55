// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Failed to generate authentication token: {0}")]
    TokenGeneration(String),
    #[error("Failed to fetch notes: {0}")]
    Fetch(String),
    #[error("Failed to delete note {id}: {reason}")]
    Delete { id: i64, reason: String },
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid file: {0}")]
    InvalidFile(String),
    #[error("Not authenticated")]
    NotAuthenticated,
}
