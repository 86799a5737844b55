// src/domain/audio_file.rs
use std::path::Path;

use crate::domain::DomainError;

/// An audio file selected for upload, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl AudioFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime = mime_for(&filename).to_string();
        Self {
            filename,
            mime,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DomainError::InvalidFile(path.display().to_string()))?
            .to_string();
        let bytes = std::fs::read(path)
            .map_err(|e| DomainError::InvalidFile(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(filename, bytes))
    }
}

fn mime_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("memo.wav", "audio/wav")]
    #[case("memo.MP3", "audio/mpeg")]
    #[case("memo.m4a", "audio/mp4")]
    #[case("memo.flac", "audio/flac")]
    #[case("memo", "application/octet-stream")]
    fn given_filename_when_building_audio_file_then_derives_mime(
        #[case] filename: &str,
        #[case] expected: &str,
    ) {
        let file = AudioFile::new(filename, vec![1, 2, 3]);
        assert_eq!(file.mime, expected);
    }

    #[test]
    fn given_missing_path_when_loading_then_returns_invalid_file() {
        let result = AudioFile::from_path(Path::new("/definitely/not/here.wav"));
        assert!(matches!(result, Err(DomainError::InvalidFile(_))));
    }
}
