use ainotes::domain::Note;
use axum::extract::{Multipart, Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tokio::sync::oneshot;

/// File part received by the transcription endpoint
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub authorization: String,
}

/// Mutable state of the fake backend, inspectable from tests
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct BackendState {
    pub notes: Vec<Note>,
    pub issued_tokens: Vec<String>,
    pub token_requests: usize,
    pub list_requests: usize,
    pub delete_requests: usize,
    pub fail_tokens: bool,
    pub fail_transcribe: bool,
    pub uploads: Vec<ReceivedUpload>,
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process notes backend served by axum on a random local port
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn start() -> Self {
        Self::start_with(BackendState::default())
    }

    pub fn start_with(initial: BackendState) -> Self {
        let state: Shared = Arc::new(Mutex::new(initial));
        let (addr_tx, addr_rx) = std::sync::mpsc::channel::<SocketAddr>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = router(Arc::clone(&state));
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("Failed to build runtime");

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind fake backend");
                addr_tx
                    .send(listener.local_addr().expect("Listener has no address"))
                    .expect("Test dropped before backend started");

                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("Fake backend failed");
            });
        });

        let addr = addr_rx.recv().expect("Fake backend did not start");
        Self {
            base_url: format!("http://{addr}"),
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().expect("Backend state poisoned")
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/generate-token", post(generate_token))
        .route("/notes", get(list_notes))
        .route("/notes/{id}", delete(delete_note))
        .route("/transcribe", post(transcribe))
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn authorized(state: &BackendState, headers: &HeaderMap) -> bool {
    bearer(headers).is_some_and(|token| state.issued_tokens.contains(&token))
}

async fn generate_token(State(state): State<Shared>) -> Response {
    let mut state = state.lock().unwrap();
    state.token_requests += 1;
    if state.fail_tokens {
        return (StatusCode::INTERNAL_SERVER_ERROR, "token service down").into_response();
    }

    let token = format!("token-{}", state.token_requests);
    state.issued_tokens.push(token.clone());
    Json(json!({ "token": token, "user_id": "user-1" })).into_response()
}

async fn list_notes(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.list_requests += 1;
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(state.notes.clone()).into_response()
}

async fn delete_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.delete_requests += 1;
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.notes.iter().position(|n| n.id == id) {
        Some(pos) => {
            state.notes.remove(pos);
            Json(json!({ "message": "Note deleted" })).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Note not found").into_response(),
    }
}

async fn transcribe(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let allowed = {
        let state = state.lock().unwrap();
        authorized(&state, &headers)
    };
    if !allowed {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut received = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        if name == "file" {
            received = Some(ReceivedUpload {
                field: name,
                filename,
                content_type,
                size,
                authorization: bearer(&headers).unwrap_or_default(),
            });
        }
    }

    let Some(upload) = received else {
        return (StatusCode::BAD_REQUEST, "missing file field").into_response();
    };

    let mut state = state.lock().unwrap();
    if state.fail_transcribe {
        return (StatusCode::INTERNAL_SERVER_ERROR, "transcription failed").into_response();
    }

    let id = state.notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
    let note = Note {
        id,
        filename: upload.filename.clone(),
        transcription: format!("- received {} bytes\n\n- transcription done", upload.size),
    };
    state.notes.insert(0, note.clone());
    state.uploads.push(upload);
    Json(note).into_response()
}

/// Notes the backend starts with, most recent first
#[allow(dead_code)]
pub fn seeded_notes() -> Vec<Note> {
    vec![
        Note {
            id: 3,
            filename: "standup.m4a".to_string(),
            transcription: "- ship the release\n- fix flaky test".to_string(),
        },
        Note {
            id: 2,
            filename: "lecture.mp3".to_string(),
            transcription: "Intro\n\n- ownership\n- borrowing".to_string(),
        },
        Note {
            id: 1,
            filename: "memo.wav".to_string(),
            transcription: "- buy milk".to_string(),
        },
    ]
}
