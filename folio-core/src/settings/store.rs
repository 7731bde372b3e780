use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::database::StorageResult;

/// Flat string key-value store for user preferences.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write several keys in one step.
    async fn set_many(&self, entries: Vec<(String, String)>) -> StorageResult<()>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_many(vec![(key.to_string(), value.to_string())])
            .await
    }
}

/// Preferences kept in `<dir>/<namespace>.json` as one JSON object.
///
/// Writes go to a temporary sibling first and are renamed into place.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePreferenceStore {
    pub fn new(dir: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{namespace}.json")),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> StorageResult<()> {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        tokio::fs::create_dir_all(parent).await?;

        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let tmp_path = parent.join(format!(
            ".{}.tmp.{}",
            self.path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("preferences"),
            nanos
        ));

        let bytes = serde_json::to_vec_pretty(values)?;
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.extend(entries);
        self.write_all(&values).await?;
        debug!(path = %self.path.display(), keys = values.len(), "preferences written");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> StorageResult<()> {
        self.values.lock().await.extend(entries);
        Ok(())
    }
}
