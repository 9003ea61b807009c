use std::sync::Arc;

use playconv::management::{FileStorage, MemoryStorage, SessionStorage};
use tempfile::TempDir;

#[tokio::test]
async fn test_file_storage_missing_key() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    assert!(storage.get("youtube_oauth_session").await.unwrap().is_none());
    assert!(storage.take("youtube_oauth_session").await.unwrap().is_none());
    storage.remove("youtube_oauth_session").await.unwrap();
}

#[tokio::test]
async fn test_file_storage_set_and_get() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join("nested/session"));

    storage.set("key", "{\"a\":1}").await.unwrap();
    assert_eq!(storage.get("key").await.unwrap().as_deref(), Some("{\"a\":1}"));

    storage.set("key", "{\"a\":2}").await.unwrap();
    assert_eq!(storage.get("key").await.unwrap().as_deref(), Some("{\"a\":2}"));

    storage.remove("key").await.unwrap();
    assert!(storage.get("key").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_storage_take_is_single_use() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    storage.set("key", "value").await.unwrap();

    assert_eq!(storage.take("key").await.unwrap().as_deref(), Some("value"));
    assert!(storage.take("key").await.unwrap().is_none());
    assert!(storage.get("key").await.unwrap().is_none());
    // no claimed leftovers
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_file_storage_concurrent_take_yields_one_value() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    storage.set("key", "value").await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move { storage.take("key").await.unwrap() })
        })
        .collect();

    let mut taken = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            taken += 1;
        }
    }
    assert_eq!(taken, 1);
}

#[tokio::test]
async fn test_file_storage_survives_new_instance() {
    let dir = TempDir::new().unwrap();
    FileStorage::new(dir.path()).set("key", "value").await.unwrap();

    let reopened = FileStorage::new(dir.path());
    assert_eq!(reopened.get("key").await.unwrap().as_deref(), Some("value"));
}

#[tokio::test]
async fn test_memory_storage() {
    let storage = MemoryStorage::new();

    assert!(storage.get("key").await.unwrap().is_none());
    storage.set("key", "value").await.unwrap();
    assert_eq!(storage.get("key").await.unwrap().as_deref(), Some("value"));
    assert_eq!(storage.take("key").await.unwrap().as_deref(), Some("value"));
    assert!(storage.take("key").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_storage_failed_take_leaves_no_claimed_file() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    std::fs::write(dir.path().join("key.json"), [0xff, 0xfe, 0xfd]).unwrap();

    assert!(storage.take("key").await.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
