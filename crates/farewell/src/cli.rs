use std::path::PathBuf;

use clap::{Parser, Subcommand};
use farewell_core::OutputFormat;

#[derive(Parser)]
#[command(name = "farewell", version)]
#[command(about = "Farewell wall: guest messages and photo memories kept in a shared document")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (defaults to ~/.config/farewell/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip the remote store and work from the local cache
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Guest messages shown in the carousel
    Messages {
        #[command(subcommand)]
        cmd: MessagesCommands,
    },

    /// Photo memories pinned to the mosaic
    Photos {
        #[command(subcommand)]
        cmd: PhotosCommands,
    },

    /// Time left until the homecoming
    Countdown,

    /// Manage the shared remote document
    Bin {
        #[command(subcommand)]
        cmd: BinCommands,
    },

    /// Show/manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum MessagesCommands {
    /// List messages, seed messages first
    List {
        /// Randomize order, as the carousel does
        #[arg(long)]
        shuffle: bool,

        /// Only messages whose author or text matches (case-insensitive regex)
        #[arg(long)]
        grep: Option<String>,
    },

    /// Leave a message
    Add {
        #[arg(long)]
        author: String,

        #[arg(long)]
        message: String,
    },
}

#[derive(Subcommand)]
pub enum PhotosCommands {
    /// List photo memories, seed photos first
    List,

    /// Pin an uploaded image (URL returned by the image host)
    Add {
        #[arg(long)]
        url: String,

        #[arg(long)]
        caption: String,
    },

    /// Remove a user photo by id (e.g. photo_1712345678901)
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum BinCommands {
    /// Create an empty shared document and print its id
    Create {
        #[arg(long, default_value = "farewell-wall")]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective configuration (access key masked)
    Show,
    /// Write a commented config template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
