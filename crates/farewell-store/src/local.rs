use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use farewell_core::{CollectionKind, Record, SyncError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::Collection;

/// Per-device cache of the last known good collections.
///
/// One JSON file per collection under `dir`. Reads never fail and writes
/// never fail: when the disk refuses a write, the value is kept in memory
/// for the rest of the session and the repository reports itself degraded.
#[derive(Debug)]
pub struct LocalRepository {
    dir: Option<PathBuf>,
    overlay: Mutex<HashMap<CollectionKind, Vec<Value>>>,
    degraded: AtomicBool,
}

impl LocalRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            overlay: Mutex::new(HashMap::new()),
            degraded: AtomicBool::new(false),
        }
    }

    /// Session-only cache with no backing directory.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            overlay: Mutex::new(HashMap::new()),
            degraded: AtomicBool::new(true),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// True once a write could not reach the disk.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn file_path(&self, kind: CollectionKind) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", kind.cache_key())))
    }

    /// Stored array for `kind`; empty when absent or malformed.
    pub fn get(&self, kind: CollectionKind) -> Vec<Value> {
        if let Some(values) = self.lock_overlay().get(&kind) {
            return values.clone();
        }
        let Some(path) = self.file_path(kind) else {
            return Vec::new();
        };
        if !path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                warn!(path = %path.display(), %error, "unreadable cache file, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(values)) => values,
            Ok(_) => {
                warn!(path = %path.display(), "cache file is not an array, treating as empty");
                Vec::new()
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "corrupt cache file, treating as empty");
                Vec::new()
            }
        }
    }

    /// Store `values` for `kind`. Never fails; see the type docs.
    pub fn set(&self, kind: CollectionKind, values: &[Value]) {
        let Some(path) = self.file_path(kind) else {
            self.lock_overlay().insert(kind, values.to_vec());
            return;
        };

        match self.write_atomic(&path, values) {
            Ok(()) => {
                self.lock_overlay().remove(&kind);
                debug!(%kind, count = values.len(), "cache updated");
            }
            Err(error) => {
                let error = SyncError::LocalStorageUnavailable(format!("{error:#}"));
                warn!(%kind, %error, "keeping collection in memory for this session");
                self.degraded.store(true, Ordering::Relaxed);
                self.lock_overlay().insert(kind, values.to_vec());
            }
        }
    }

    /// Typed read; entries that no longer decode are skipped.
    pub fn load<T: Record>(&self) -> Vec<T> {
        self.get(T::KIND)
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value::<T>(value) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(kind = %T::KIND, index = idx, %error, "skipping corrupt cache entry");
                    None
                }
            })
            .collect()
    }

    /// Typed write of user records.
    pub fn store<T: Record>(&self, records: &[T]) {
        let values: Vec<Value> = records
            .iter()
            .filter_map(|record| match serde_json::to_value(record) {
                Ok(value) => Some(value),
                Err(error) => {
                    warn!(kind = %T::KIND, %error, "failed to serialize record for cache");
                    None
                }
            })
            .collect();
        self.set(T::KIND, &values);
    }

    fn write_atomic(&self, path: &Path, values: &[Value]) -> Result<()> {
        let dir = path
            .parent()
            .context("cache file has no parent directory")?;
        let dir_exists = dir.exists();
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create cache dir: {}", dir.display()))?;
        if !dir_exists {
            set_dir_mode_700(dir)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .with_context(|| format!("failed to open temp cache file: {}", tmp_path.display()))?;

        let committed = commit_tmp(file, &tmp_path, path, values);
        if committed.is_err() {
            // a failed write must not leave a stray temp file beside the cache
            if let Err(error) = fs::remove_file(&tmp_path) {
                debug!(path = %tmp_path.display(), %error, "failed to remove temp cache file");
            }
        }
        committed
    }

    fn lock_overlay(&self) -> std::sync::MutexGuard<'_, HashMap<CollectionKind, Vec<Value>>> {
        self.overlay.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fill the temp file and move it over `path`.
fn commit_tmp(file: fs::File, tmp_path: &Path, path: &Path, values: &[Value]) -> Result<()> {
    set_file_mode_600(tmp_path)?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, values).context("failed to serialize cache")?;
    writer.flush().context("failed to flush cache file")?;
    drop(writer);

    fs::rename(tmp_path, path)
        .with_context(|| format!("failed to atomically replace cache file {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl Collection for LocalRepository {
    async fn fetch(&self, kind: CollectionKind) -> Result<Vec<Value>, SyncError> {
        Ok(self.get(kind))
    }

    async fn save(&self, kind: CollectionKind, records: &[Value]) -> Result<(), SyncError> {
        self.set(kind, records);
        Ok(())
    }
}

#[cfg(unix)]
fn set_dir_mode_700(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("failed to chmod 700: {}", path.display()))
}

#[cfg(not(unix))]
fn set_dir_mode_700(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn set_file_mode_600(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to chmod 600: {}", path.display()))
}

#[cfg(not(unix))]
fn set_file_mode_600(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use farewell_core::{Message, PhotoMemory};
    use serde_json::json;

    fn make_test_repo() -> (tempfile::TempDir, LocalRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(dir.path().join("cache"));
        (dir, repo)
    }

    #[test]
    fn test_get_missing_is_empty() {
        let (_dir, repo) = make_test_repo();
        assert!(repo.get(CollectionKind::Messages).is_empty());
        assert!(!repo.is_degraded());
    }

    #[test]
    fn test_set_and_get_are_isolated_per_kind() {
        let (_dir, repo) = make_test_repo();
        repo.set(
            CollectionKind::Messages,
            &[json!({"id": 1, "author": "a", "message": "m"})],
        );
        assert_eq!(repo.get(CollectionKind::Messages).len(), 1);
        assert!(repo.get(CollectionKind::Photos).is_empty());
        assert!(
            repo.file_path(CollectionKind::Messages)
                .unwrap()
                .ends_with("guestMessages.json")
        );
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let (_dir, repo) = make_test_repo();
        let path = repo.file_path(CollectionKind::Photos).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(repo.get(CollectionKind::Photos).is_empty());

        fs::write(&path, r#"{"photos": []}"#).unwrap();
        assert!(repo.get(CollectionKind::Photos).is_empty());
    }

    #[test]
    fn test_typed_load_skips_corrupt_entries() {
        let (_dir, repo) = make_test_repo();
        repo.set(
            CollectionKind::Messages,
            &[
                json!({"id": 5, "author": "a", "message": "m"}),
                json!({"id": "five"}),
                json!({"id": 6, "author": "b", "message": "n"}),
            ],
        );
        let loaded: Vec<Message> = repo.load();
        let ids: Vec<i64> = loaded.iter().map(|m| m.id).collect();
        assert_eq!(ids, [5, 6]);
    }

    #[test]
    fn test_store_round_trips_typed_records() {
        let (_dir, repo) = make_test_repo();
        let photo = PhotoMemory {
            id: "photo_9".into(),
            url: "https://res.cloudinary.com/a.jpg".into(),
            caption: "c".into(),
            timestamp: 9,
        };
        repo.store(std::slice::from_ref(&photo));
        let loaded: Vec<PhotoMemory> = repo.load();
        assert_eq!(loaded, vec![photo]);
    }

    #[cfg(unix)]
    #[test]
    fn test_cache_file_mode_is_600() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, repo) = make_test_repo();
        repo.set(CollectionKind::Messages, &[]);
        let path = repo.file_path(CollectionKind::Messages).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_unwritable_dir_degrades_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a plain file where the cache dir should be").unwrap();
        let repo = LocalRepository::new(blocker.join("cache"));

        let values = vec![json!({"id": 1, "author": "a", "message": "m"})];
        repo.set(CollectionKind::Messages, &values);

        assert!(repo.is_degraded());
        assert_eq!(repo.get(CollectionKind::Messages), values);
    }

    #[test]
    fn test_failed_replace_removes_temp_file() {
        let (_dir, repo) = make_test_repo();
        let path = repo.file_path(CollectionKind::Photos).unwrap();
        // a directory in the cache file's place makes the final rename fail
        fs::create_dir_all(&path).unwrap();

        let values = vec![json!({"id": "photo_1"})];
        repo.set(CollectionKind::Photos, &values);

        assert!(repo.is_degraded());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(repo.get(CollectionKind::Photos), values);
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = LocalRepository::in_memory();
        assert!(repo.is_degraded());
        assert!(repo.get(CollectionKind::Photos).is_empty());
        repo.set(CollectionKind::Photos, &[json!({"id": "photo_1"})]);
        assert_eq!(repo.get(CollectionKind::Photos).len(), 1);
        assert!(repo.file_path(CollectionKind::Photos).is_none());
    }

    #[tokio::test]
    async fn test_collection_impl_delegates() {
        let (_dir, repo) = make_test_repo();
        repo.save(CollectionKind::Photos, &[json!({"id": "photo_1"})])
            .await
            .unwrap();
        assert_eq!(repo.fetch(CollectionKind::Photos).await.unwrap().len(), 1);
    }
}
