//! Shape checks applied to every record before it is surfaced.
//!
//! Remote data arrives as untyped JSON, so the checks run on
//! `serde_json::Value` and only then produce typed records.

use serde_json::Value;
use url::Url;

use crate::error::SyncError;
use crate::types::{CollectionKind, Message, PhotoMemory};

pub const DEFAULT_TRUSTED_IMAGE_HOST: &str = "res.cloudinary.com";

/// Rules that depend on deployment rather than on the data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRules {
    /// Photos must be served from this host or one of its subdomains.
    pub trusted_image_host: String,
}

impl Default for ShapeRules {
    fn default() -> Self {
        Self {
            trusted_image_host: DEFAULT_TRUSTED_IMAGE_HOST.to_string(),
        }
    }
}

impl ShapeRules {
    pub fn new(trusted_image_host: impl Into<String>) -> Self {
        Self {
            trusted_image_host: trusted_image_host.into(),
        }
    }

    pub fn is_trusted_image_url(&self, raw: &str) -> bool {
        let Ok(url) = Url::parse(raw) else {
            return false;
        };
        if url.scheme() != "https" {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        let trusted = self.trusted_image_host.trim().to_ascii_lowercase();
        if trusted.is_empty() {
            return false;
        }
        let host = host.to_ascii_lowercase();
        host == trusted || host.ends_with(&format!(".{trusted}"))
    }
}

/// Records that passed the check, plus how many were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T> {
    pub valid: Vec<T>,
    pub rejected: usize,
}

pub fn check_message(value: &Value) -> Result<Message, SyncError> {
    let kind = CollectionKind::Messages;
    let obj = value
        .as_object()
        .ok_or_else(|| SyncError::validation(kind, "not an object"))?;

    let id = obj
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| SyncError::validation(kind, "id must be an integer"))?;
    let author = non_blank_str(obj.get("author"))
        .ok_or_else(|| SyncError::validation(kind, "author must be a non-empty string"))?;
    let message = non_blank_str(obj.get("message"))
        .ok_or_else(|| SyncError::validation(kind, "message must be a non-empty string"))?;

    Ok(Message {
        id,
        author: author.to_string(),
        message: message.to_string(),
    })
}

pub fn check_photo(value: &Value, rules: &ShapeRules) -> Result<PhotoMemory, SyncError> {
    let kind = CollectionKind::Photos;
    let obj = value
        .as_object()
        .ok_or_else(|| SyncError::validation(kind, "not an object"))?;

    let id = non_blank_str(obj.get("id"))
        .ok_or_else(|| SyncError::validation(kind, "id must be a non-empty string"))?;
    let url = obj
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::validation(kind, "url must be a string"))?;
    if !rules.is_trusted_image_url(url) {
        return Err(SyncError::validation(
            kind,
            format!("url is not on trusted host {}", rules.trusted_image_host),
        ));
    }
    let caption = obj
        .get("caption")
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::validation(kind, "caption must be a string"))?;
    let timestamp = obj
        .get("timestamp")
        .and_then(Value::as_i64)
        .ok_or_else(|| SyncError::validation(kind, "timestamp must be an integer"))?;

    Ok(PhotoMemory {
        id: id.to_string(),
        url: url.to_string(),
        caption: caption.to_string(),
        timestamp,
    })
}

/// Build a message from user input. Fields are trimmed first.
pub fn new_message(id: i64, author: &str, message: &str) -> Result<Message, SyncError> {
    let kind = CollectionKind::Messages;
    let author = author.trim();
    let message = message.trim();
    if author.is_empty() {
        return Err(SyncError::validation(kind, "author must not be empty"));
    }
    if message.is_empty() {
        return Err(SyncError::validation(kind, "message must not be empty"));
    }
    Ok(Message {
        id,
        author: author.to_string(),
        message: message.to_string(),
    })
}

/// Build a photo memory from an upload result and a caption.
pub fn new_photo(
    id: String,
    url: &str,
    caption: &str,
    timestamp: i64,
    rules: &ShapeRules,
) -> Result<PhotoMemory, SyncError> {
    let kind = CollectionKind::Photos;
    let url = url.trim();
    let caption = caption.trim();
    if !rules.is_trusted_image_url(url) {
        return Err(SyncError::validation(
            kind,
            format!("image must be hosted on {}", rules.trusted_image_host),
        ));
    }
    if caption.is_empty() {
        return Err(SyncError::validation(kind, "caption must not be empty"));
    }
    Ok(PhotoMemory {
        id,
        url: url.to_string(),
        caption: caption.to_string(),
        timestamp,
    })
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
