// src/infrastructure/mod.rs
pub mod config;
pub mod http;
pub mod prompt;
pub mod renderer;
pub mod storage;

pub use config::{Config, Settings};
pub use http::HttpNotesApi;
pub use prompt::TerminalPrompt;
pub use renderer::SiteRenderer;
pub use storage::FileKeyValueStore;
