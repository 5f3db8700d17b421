use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two collections kept in the shared document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Messages,
    Photos,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Messages, CollectionKind::Photos];

    /// Field name inside the remote document.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Photos => "photos",
        }
    }

    /// Key used by the per-device cache.
    pub fn cache_key(&self) -> &'static str {
        match self {
            Self::Messages => "guestMessages",
            Self::Photos => "userPhotos",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// A guest message shown in the carousel.
///
/// `id` is the creation time in Unix milliseconds and doubles as identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub author: String,
    pub message: String,
}

/// A photo memory pinned to the mosaic.
///
/// The image itself lives on the external image host; only its URL is kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMemory {
    pub id: String,
    pub url: String,
    pub caption: String,
    pub timestamp: i64,
}

/// Output format for CLI responses
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
