// src/infrastructure/http.rs
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client, Response};
use tracing::{debug, instrument};

use crate::application::{AuthApi, NotesApi};
use crate::constants::UPLOAD_FIELD_NAME;
use crate::domain::{AudioFile, Credential, DomainError, Note, TokenGrant};

/// Notes backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpNotesApi {
    client: Client,
    base_url: String,
}

impl HttpNotesApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        debug!(%base_url, ?timeout, "Created HTTP notes client");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-success status into an error message carrying the body
fn ensure_success(response: Response) -> Result<Response, String> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        return Err(format!("API error {}: {}", status, body));
    }
    Ok(response)
}

impl AuthApi for HttpNotesApi {
    #[instrument(level = "debug", skip(self))]
    fn generate_token(&mut self) -> Result<TokenGrant, DomainError> {
        let response = self
            .client
            .post(self.url("/generate-token"))
            .send()
            .map_err(|e| DomainError::TokenGeneration(e.to_string()))?;

        ensure_success(response)
            .map_err(DomainError::TokenGeneration)?
            .json::<TokenGrant>()
            .map_err(|e| DomainError::TokenGeneration(e.to_string()))
    }
}

impl NotesApi for HttpNotesApi {
    #[instrument(level = "debug", skip(self, credential))]
    fn list_notes(&mut self, credential: &Credential) -> Result<Vec<Note>, DomainError> {
        let response = self
            .client
            .get(self.url("/notes"))
            .bearer_auth(credential.bearer())
            .send()
            .map_err(|e| DomainError::Fetch(e.to_string()))?;

        ensure_success(response)
            .map_err(DomainError::Fetch)?
            .json::<Vec<Note>>()
            .map_err(|e| DomainError::Fetch(e.to_string()))
    }

    #[instrument(level = "debug", skip(self, credential))]
    fn delete_note(&mut self, id: i64, credential: &Credential) -> Result<(), DomainError> {
        let reason = |e: String| DomainError::Delete { id, reason: e };

        let response = self
            .client
            .delete(self.url(&format!("/notes/{id}")))
            .bearer_auth(credential.bearer())
            .send()
            .map_err(|e| reason(e.to_string()))?;

        ensure_success(response).map_err(reason)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self, file, credential), fields(filename = %file.filename))]
    fn upload_note(
        &mut self,
        file: &AudioFile,
        credential: &Credential,
    ) -> Result<Note, DomainError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.mime)
            .map_err(|e| DomainError::Upload(e.to_string()))?;
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self
            .client
            .post(self.url("/transcribe"))
            .bearer_auth(credential.bearer())
            .multipart(form)
            .send()
            .map_err(|e| DomainError::Upload(e.to_string()))?;

        ensure_success(response)
            .map_err(DomainError::Upload)?
            .json::<Note>()
            .map_err(|e| DomainError::Upload(e.to_string()))
    }
}
