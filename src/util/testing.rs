// src/util/testing.rs

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{AuthApi, Clock, KeyValueStore, LoadingFlag, NotesApi, Prompt};
use crate::domain::{AudioFile, Credential, DomainError, Note, TokenGrant};

/// Build a note fixture
pub fn note(id: i64, filename: &str, transcription: &str) -> Note {
    Note {
        id,
        filename: filename.to_string(),
        transcription: transcription.to_string(),
    }
}

/// A credential that stays valid for the foreseeable future
pub fn credential() -> Credential {
    Credential {
        token: "test-token".to_string(),
        user_id: "test-user".to_string(),
        expiry: Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Requests observed by [`MockNotesApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Delete(i64),
    Upload(String),
}

enum UploadBehavior {
    Echo,
    Return(Note),
    Fail,
}

/// In-memory notes backend for exercising the repository and page
///
/// Successful deletes and uploads mutate the mock's own collection, so a
/// subsequent listing reflects them.
///
/// # Examples
///
/// ```
/// use ainotes::util::testing::{note, MockNotesApi};
///
/// let mock = MockNotesApi::builder()
///     .with_notes(vec![note(1, "memo.wav", "- hello")])
///     .with_delete_failure(1)
///     .build();
/// ```
pub struct MockNotesApi {
    notes: Vec<Note>,
    fail_list: bool,
    delete_failures: HashSet<i64>,
    upload: UploadBehavior,
    calls: Vec<ApiCall>,
    loading_probe: Option<LoadingFlag>,
    loading_during_upload: Option<bool>,
}

impl MockNotesApi {
    pub fn builder() -> MockNotesApiBuilder {
        MockNotesApiBuilder::new()
    }

    pub fn calls(&self) -> &[ApiCall] {
        &self.calls
    }

    pub fn fail_list(&mut self, fail: bool) {
        self.fail_list = fail;
    }

    /// Record the state of `flag` when an upload reaches the backend
    pub fn observe_loading(&mut self, flag: LoadingFlag) {
        self.loading_probe = Some(flag);
    }

    pub fn loading_during_upload(&self) -> Option<bool> {
        self.loading_during_upload
    }
}

impl NotesApi for MockNotesApi {
    fn list_notes(&mut self, _credential: &Credential) -> Result<Vec<Note>, DomainError> {
        self.calls.push(ApiCall::List);
        if self.fail_list {
            return Err(DomainError::Fetch(
                "API error 500 Internal Server Error".to_string(),
            ));
        }
        Ok(self.notes.clone())
    }

    fn delete_note(&mut self, id: i64, _credential: &Credential) -> Result<(), DomainError> {
        self.calls.push(ApiCall::Delete(id));
        if self.delete_failures.contains(&id) {
            return Err(DomainError::Delete {
                id,
                reason: "API error 500 Internal Server Error".to_string(),
            });
        }
        self.notes.retain(|n| n.id != id);
        Ok(())
    }

    fn upload_note(
        &mut self,
        file: &AudioFile,
        _credential: &Credential,
    ) -> Result<Note, DomainError> {
        self.calls.push(ApiCall::Upload(file.filename.clone()));
        self.loading_during_upload = self.loading_probe.as_ref().map(|f| f.is_loading());

        let created = match &self.upload {
            UploadBehavior::Fail => {
                return Err(DomainError::Upload(
                    "API error 500 Internal Server Error".to_string(),
                ))
            }
            UploadBehavior::Return(note) => note.clone(),
            UploadBehavior::Echo => Note {
                id: self.notes.iter().map(|n| n.id).max().unwrap_or(0) + 1,
                filename: file.filename.clone(),
                transcription: String::new(),
            },
        };
        self.notes.insert(0, created.clone());
        Ok(created)
    }
}

/// Builder for MockNotesApi
pub struct MockNotesApiBuilder {
    notes: Vec<Note>,
    fail_list: bool,
    delete_failures: HashSet<i64>,
    upload: UploadBehavior,
}

impl MockNotesApiBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            fail_list: false,
            delete_failures: HashSet::new(),
            upload: UploadBehavior::Echo,
        }
    }

    /// Initial backend collection, most recent first
    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_list_failure(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn with_delete_failure(mut self, id: i64) -> Self {
        self.delete_failures.insert(id);
        self
    }

    pub fn with_upload_result(mut self, note: Note) -> Self {
        self.upload = UploadBehavior::Return(note);
        self
    }

    pub fn with_upload_failure(mut self) -> Self {
        self.upload = UploadBehavior::Fail;
        self
    }

    pub fn build(self) -> MockNotesApi {
        MockNotesApi {
            notes: self.notes,
            fail_list: self.fail_list,
            delete_failures: self.delete_failures,
            upload: self.upload,
            calls: vec![],
            loading_probe: None,
            loading_during_upload: None,
        }
    }
}

impl Default for MockNotesApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Token endpoint that replays configured responses in order
///
/// Once the script is exhausted every request fails.
pub struct MockAuthApi {
    responses: VecDeque<Option<TokenGrant>>,
    calls: usize,
}

impl MockAuthApi {
    pub fn builder() -> MockAuthApiBuilder {
        MockAuthApiBuilder::default()
    }

    /// Number of token requests issued
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl AuthApi for MockAuthApi {
    fn generate_token(&mut self) -> Result<TokenGrant, DomainError> {
        self.calls += 1;
        self.responses
            .pop_front()
            .flatten()
            .ok_or_else(|| {
                DomainError::TokenGeneration("API error 503 Service Unavailable".to_string())
            })
    }
}

#[derive(Default)]
pub struct MockAuthApiBuilder {
    responses: VecDeque<Option<TokenGrant>>,
}

impl MockAuthApiBuilder {
    pub fn with_grant(mut self, token: &str, user_id: &str) -> Self {
        self.responses.push_back(Some(TokenGrant {
            token: token.to_string(),
            user_id: user_id.to_string(),
        }));
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.responses.push_back(None);
        self
    }

    pub fn build(self) -> MockAuthApi {
        MockAuthApi {
            responses: self.responses,
            calls: 0,
        }
    }
}

/// Volatile stand-in for durable storage
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DomainError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Prompt with a fixed answer that records what it was asked
#[derive(Debug, Clone)]
pub struct ScriptedPrompt {
    answer: bool,
    confirmations: Vec<String>,
    alerts: Vec<String>,
}

impl ScriptedPrompt {
    pub fn accepting() -> Self {
        Self::answering(true)
    }

    pub fn declining() -> Self {
        Self::answering(false)
    }

    fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirmations: vec![],
            alerts: vec![],
        }
    }

    pub fn confirmations(&self) -> &[String] {
        &self.confirmations
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.answer
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "mio", "h2", "tower", "axum"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
