//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// calsnap - Turn schedule photos and messages into calendar events
#[derive(Debug, Parser)]
#[command(name = "calsnap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALSNAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// API key for the completion service
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model alias to use (google or qwen)
    #[arg(long, short)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract events from a schedule image
    Image {
        /// Path to the image file (png, jpeg, webp, or gif)
        path: PathBuf,
    },

    /// Extract events from a free-text description
    Text {
        /// The message describing the events
        message: String,
    },

    /// List the events from the last extraction
    List,

    /// Export the stored events
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },

    /// Discard the stored events
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum ExportFormat {
    /// Write an iCalendar file
    Ics {
        /// Output path (defaults to schedule.ics)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print a Google Calendar link for each event
    Url,
}
