use async_trait::async_trait;
use farewell_core::{CollectionKind, SyncError};
use serde_json::Value;

/// A storage tier holding the raw arrays of both collections.
///
/// Records cross this boundary untyped; shape checks happen above it.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Current array stored for `kind`.
    async fn fetch(&self, kind: CollectionKind) -> Result<Vec<Value>, SyncError>;
    /// Replace the array stored for `kind`, leaving the other one untouched.
    async fn save(&self, kind: CollectionKind, records: &[Value]) -> Result<(), SyncError>;
}
