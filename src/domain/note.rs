// src/domain/note.rs
use serde::{Deserialize, Serialize};

/// A transcribed audio file as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub filename: String,
    pub transcription: String,
}
