use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::{error::StorageError, utils};

/// Pending authorization session, see [`crate::types::AuthSession`].
pub const AUTH_SESSION_KEY: &str = "youtube_oauth_session";
/// Cached destination credential, see [`crate::types::DestinationCredential`].
pub const CREDENTIAL_KEY: &str = "youtube_credential";
/// Set when YouTube rejected the credential. While present, a stored refresh
/// token is not used to obtain a new one; only a completed consent clears it.
pub const CREDENTIAL_REJECTED_KEY: &str = "youtube_credential_rejected";

/// Key-value storage that survives the OAuth redirect.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Removes and returns a value. Of several concurrent callers at most one
    /// receives it.
    async fn take(&self, key: &str) -> Result<Option<String>, StorageError>;
}

pub async fn load_json<T: DeserializeOwned>(
    storage: &dyn SessionStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn store_json<T: Serialize>(
    storage: &dyn SessionStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    storage.set(key, &json).await
}

pub async fn take_json<T: DeserializeOwned>(
    storage: &dyn SessionStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.take(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// One JSON file per key in the local data directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage under `<data_local_dir>/playconv/session`.
    pub fn in_data_dir() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("playconv/session");
        Self::new(path)
    }

    fn get_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match async_fs::read_to_string(self.get_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        async_fs::create_dir_all(&self.root).await?;
        async_fs::write(self.get_path(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match async_fs::remove_file(self.get_path(key)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(StorageError::Io(e)),
            _ => Ok(()),
        }
    }

    async fn take(&self, key: &str) -> Result<Option<String>, StorageError> {
        // rename is atomic, so only one process can claim the file
        let claimed = self
            .root
            .join(format!("{key}.{}.taken", utils::generate_state_token()));
        match async_fs::rename(self.get_path(key), &claimed).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        }

        let content = async_fs::read_to_string(&claimed).await;
        async_fs::remove_file(&claimed).await?;
        Ok(Some(content?))
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.remove(key))
    }
}
