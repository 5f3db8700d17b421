use farewell_core::ids::{next_message_id, next_photo_id};
use farewell_core::record::{Record, sort_records, user_records, validate_all, with_seed};
use farewell_core::seed::is_seed_photo_id;
use farewell_core::validate::{Validated, new_message, new_photo};
use farewell_core::{Message, PhotoMemory, ShapeRules, SyncError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{Collection, LocalRepository, RetryPolicy};

/// What happened on the remote side of a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSync {
    /// The remote document was rewritten.
    Synced,
    /// Delete only: the id was not in the remote array.
    NotFound,
    /// The remote already held the change; nothing was written.
    Skipped,
    /// The remote could not be reached; the change lives in the local cache.
    LocalOnly(SyncError),
}

impl RemoteSync {
    /// True when local and remote now agree about the change.
    pub fn is_consistent(&self) -> bool {
        !matches!(self, Self::LocalOnly(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub remote: RemoteSync,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether the record was dropped from the view or the local cache.
    pub removed: bool,
    pub remote: RemoteSync,
}

/// Seed data, remote document and local cache merged into one view.
///
/// Reads prefer the remote and fall back to the cache. Writes land in the
/// cache first; a failed remote push never rolls them back.
pub struct ReconcilingRepository {
    local: LocalRepository,
    remote: Box<dyn Collection>,
    retry: RetryPolicy,
    rules: ShapeRules,
}

impl ReconcilingRepository {
    pub fn new(local: LocalRepository, remote: Box<dyn Collection>) -> Self {
        Self {
            local,
            remote,
            retry: RetryPolicy::default(),
            rules: ShapeRules::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rules(mut self, rules: ShapeRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn local(&self) -> &LocalRepository {
        &self.local
    }

    pub fn rules(&self) -> &ShapeRules {
        &self.rules
    }

    /// Current collection: `seed ++ sorted(user records)`. Never fails.
    ///
    /// Records from either tier pass the shape check before they surface.
    pub async fn load<T: Record>(&self) -> Vec<T> {
        let kind = T::KIND;
        let fetched = self
            .retry
            .run(kind.field(), |_| self.remote.fetch(kind))
            .await;

        match fetched {
            Ok(values) => {
                let Validated {
                    mut valid,
                    rejected,
                } = validate_all::<T>(&values, &self.rules);
                if rejected > 0 {
                    warn!(%kind, rejected, "discarded invalid remote records");
                }
                sort_records(&mut valid);
                self.local.store(&valid);
                debug!(%kind, count = valid.len(), "loaded from remote");
                with_seed(valid)
            }
            Err(error) => {
                // the trusted host may have changed since these were cached
                let Validated {
                    valid: mut cached,
                    rejected,
                } = validate_all::<T>(&self.local.get(kind), &self.rules);
                if rejected > 0 {
                    warn!(%kind, rejected, "discarded invalid cached records");
                }
                sort_records(&mut cached);
                info!(%kind, %error, cached = cached.len(), "remote unavailable, using local cache");
                with_seed(cached)
            }
        }
    }

    /// Local half of a write: append to `view` and mirror its user records
    /// to the cache.
    pub fn stage_append<T: Record>(&self, view: &mut Vec<T>, record: T) {
        view.push(record);
        self.local.store(&user_records(view.as_slice()));
    }

    /// Remote half of a write: append `record` to the latest remote array.
    ///
    /// On success `view` is replaced by a fresh read.
    pub async fn push_append<T: Record>(&self, view: &mut Vec<T>, record: &T) -> RemoteSync {
        let outcome = self.remote_append(record).await;
        match outcome {
            Ok(sync) => {
                *view = self.load::<T>().await;
                sync
            }
            Err(error) => {
                warn!(kind = %T::KIND, id = %record.id(), %error, "remote write failed, kept locally");
                RemoteSync::LocalOnly(error)
            }
        }
    }

    pub async fn append<T: Record>(&self, view: &mut Vec<T>, record: T) -> WriteOutcome {
        self.stage_append(view, record.clone());
        let remote = self.push_append(view, &record).await;
        WriteOutcome { remote }
    }

    /// Validate user input, then append. Invalid input changes nothing.
    pub async fn add_message(
        &self,
        view: &mut Vec<Message>,
        author: &str,
        message: &str,
    ) -> Result<(Message, WriteOutcome), SyncError> {
        let id = next_message_id(now_ms(), view.as_slice());
        let record = new_message(id, author, message)?;
        let outcome = self.append(view, record.clone()).await;
        Ok((record, outcome))
    }

    pub async fn add_photo(
        &self,
        view: &mut Vec<PhotoMemory>,
        url: &str,
        caption: &str,
    ) -> Result<(PhotoMemory, WriteOutcome), SyncError> {
        let now = now_ms();
        let id = next_photo_id(now, view.as_slice());
        let record = new_photo(id, url, caption, now, &self.rules)?;
        let outcome = self.append(view, record.clone()).await;
        Ok((record, outcome))
    }

    /// Remove a user photo from the view, the cache and the remote document.
    ///
    /// Seed photos are never removed. An id absent everywhere is a no-op.
    pub async fn delete_photo(&self, view: &mut Vec<PhotoMemory>, id: &str) -> DeleteOutcome {
        if is_seed_photo_id(id) {
            warn!(id, "refusing to delete a seed photo");
            return DeleteOutcome {
                removed: false,
                remote: RemoteSync::Skipped,
            };
        }

        let before = view.len();
        view.retain(|photo| photo.id != id);
        let mut removed = view.len() != before;

        let mut cached = self.local.load::<PhotoMemory>();
        let cached_before = cached.len();
        cached.retain(|photo| photo.id != id);
        if cached.len() != cached_before {
            self.local.store(&cached);
            removed = true;
        }

        let remote = match self.remote_delete(id).await {
            Ok(sync) => sync,
            Err(error) => {
                warn!(id, %error, "remote delete failed, removed locally");
                RemoteSync::LocalOnly(error)
            }
        };
        DeleteOutcome { removed, remote }
    }

    async fn remote_append<T: Record>(&self, record: &T) -> Result<RemoteSync, SyncError> {
        let kind = T::KIND;
        let value = serde_json::to_value(record)
            .map_err(|error| SyncError::validation(kind, error.to_string()))?;
        let mut records = self.remote.fetch(kind).await?;
        if records.iter().any(|existing| same_id(existing, &value)) {
            debug!(%kind, id = %record.id(), "remote already holds record");
            return Ok(RemoteSync::Skipped);
        }
        records.push(value);
        self.remote.save(kind, &records).await?;
        info!(%kind, id = %record.id(), "record pushed to remote");
        Ok(RemoteSync::Synced)
    }

    async fn remote_delete(&self, id: &str) -> Result<RemoteSync, SyncError> {
        let kind = PhotoMemory::KIND;
        let mut records = self.remote.fetch(kind).await?;
        let before = records.len();
        records.retain(|record| record.get("id").and_then(Value::as_str) != Some(id));
        if records.len() == before {
            debug!(id, "photo not present remotely");
            return Ok(RemoteSync::NotFound);
        }
        self.remote.save(kind, &records).await?;
        info!(id, "photo deleted from remote");
        Ok(RemoteSync::Synced)
    }
}

fn same_id(a: &Value, b: &Value) -> bool {
    match (a.get("id"), b.get("id")) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
