// src/constants.rs
//
// Application-wide constants shared by the token cache, HTTP client and renderer.

/// Lifetime of a freshly generated credential.
///
/// The backend does not report an expiry, so the client stamps one at
/// acquisition time.
///
/// Used in: `domain/credential.rs`
pub const TOKEN_VALIDITY_HOURS: i64 = 12;

/// Durable storage key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Durable storage key holding the backend-assigned user id.
pub const USER_ID_KEY: &str = "user_id";

/// Durable storage key holding the expiry as integer epoch milliseconds.
pub const AUTH_TOKEN_EXPIRY_KEY: &str = "auth_token_expiry";

/// Multipart field name the transcription endpoint reads the audio from.
///
/// Used in: `infrastructure/http.rs`
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Request timeout when the config file does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable carrying the backend base URL.
pub const API_URL_ENV: &str = "AINOTES_API_URL";

/// Delay in milliseconds after writing HTML files before returning from `open`.
///
/// The browser needs a brief moment to load the page before the temporary
/// directory is dropped.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;

pub const CONFIRM_DELETE_MESSAGE: &str = "Are you sure you want to delete this note?";
pub const DELETE_FAILED_MESSAGE: &str = "Error deleting note";
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading file";
pub const NO_FILE_SELECTED_MESSAGE: &str = "Please select a file first!";
pub const AUTH_FAILED_MESSAGE: &str = "Failed to generate authentication token";
pub const GENERATING_TOKEN_MESSAGE: &str = "Generating authentication token...";
pub const EMPTY_NOTES_MESSAGE: &str = "No transcriptions yet. Upload a file!";
