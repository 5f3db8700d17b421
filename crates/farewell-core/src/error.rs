use crate::types::CollectionKind;

/// Failure conditions of the synchronization layer.
///
/// Only `ValidationFailure` on user input ever reaches the user; the other
/// variants are recovered inside the layer and surface as log lines.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Malformed remote response: {0}")]
    MalformedResponse(String),

    #[error("Invalid {kind} record: {reason}")]
    ValidationFailure {
        kind: CollectionKind,
        reason: String,
    },

    #[error("Local storage unavailable: {0}")]
    LocalStorageUnavailable(String),
}

impl SyncError {
    pub fn validation(kind: CollectionKind, reason: impl Into<String>) -> Self {
        Self::ValidationFailure {
            kind,
            reason: reason.into(),
        }
    }

    /// True for failures of the remote tier, which callers recover from.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_) | Self::MalformedResponse(_))
    }
}
