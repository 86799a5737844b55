// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Backend base URL
    #[arg(long, value_name = "URL", env = "AINOTES_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to the TOML config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the credential cache file (optional)
    #[arg(short, long, value_name = "STORAGE", global = true)]
    pub storage: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the landing page
    Home,

    /// List your transcribed notes
    List {
        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload an audio file and get its transcription
    Upload {
        /// Audio file to transcribe
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Delete a note
    Delete {
        /// Note ID to delete
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Open the notes page in the browser
    Open,

    /// Forget the cached authentication token
    Logout,
}
