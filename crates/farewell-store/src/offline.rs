use async_trait::async_trait;
use farewell_core::{CollectionKind, SyncError};
use serde_json::Value;

use crate::Collection;

/// Remote tier used when no document store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRemote;

#[async_trait]
impl Collection for OfflineRemote {
    async fn fetch(&self, _kind: CollectionKind) -> Result<Vec<Value>, SyncError> {
        Err(SyncError::RemoteUnavailable("remote store not configured".into()))
    }

    async fn save(&self, _kind: CollectionKind, _records: &[Value]) -> Result<(), SyncError> {
        Err(SyncError::RemoteUnavailable("remote store not configured".into()))
    }
}
