// src/infrastructure/renderer.rs
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};
use tracing::{debug, instrument};

use crate::constants::BROWSER_LAUNCH_DELAY_MS;

/// Writes rendered pages to a temporary directory and opens them
#[derive(Debug, Default)]
pub struct SiteRenderer {
    // Keep last temp dir alive to prevent deletion
    temp_dir: Option<TempDir>,
}

impl SiteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `(file name, html)` pages into a fresh temp dir.
    ///
    /// Returns the path of the first page.
    pub fn write_site(&mut self, pages: &[(&str, String)]) -> Result<PathBuf> {
        let temp_dir = Builder::new()
            .prefix("ainotes-")
            .rand_bytes(5)
            .tempdir()
            .context("Failed to create temporary directory")?;

        let mut entry = None;
        for (name, html) in pages {
            let file_path = temp_dir.path().join(name);
            File::create(&file_path)
                .with_context(|| format!("Failed to create temp file at {}", file_path.display()))?
                .write_all(html.as_bytes())
                .context("Failed to write content to temporary file")?;
            debug!(path = ?file_path, "Wrote page");
            entry.get_or_insert(file_path);
        }

        self.temp_dir = Some(temp_dir);
        entry.context("No pages to write")
    }

    #[instrument(level = "debug", skip(self))]
    pub fn open_in_browser(&mut self, path: &Path) -> Result<()> {
        let path_str = path.to_str().context("Failed to convert path to string")?;

        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "windows")]
        {
            std::process::Command::new("cmd")
                .args(["/C", "start", path_str])
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "linux")]
        {
            std::process::Command::new("xdg-open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }

        // Keep the temp directory alive while the browser loads the page
        std::thread::sleep(std::time::Duration::from_millis(BROWSER_LAUNCH_DELAY_MS));

        Ok(())
    }
}
