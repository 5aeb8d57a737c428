use serde::{Deserialize, Serialize};

use triage_storage::error::StorageError;
use triage_storage::memory::MemoryStore;
use triage_storage::state::{load_state, save_state};
use triage_storage::store::KeyValueStore;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Marker {
    step: usize,
    note: String,
}

#[tokio::test]
async fn get_put_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("k").await.unwrap(), None);

    store.put("k", b"v1".to_vec()).await.unwrap();
    store.put("k", b"v2".to_vec()).await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(b"v2".to_vec()));
    assert_eq!(store.len().await, 1);

    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
    assert!(store.is_empty().await);

    // Removing again is fine.
    store.remove("k").await.unwrap();
}

#[tokio::test]
async fn json_state_roundtrip() {
    let store = MemoryStore::new();
    let marker = Marker {
        step: 2,
        note: "demam".to_string(),
    };

    save_state(&store, "sessions/a", &marker).await.unwrap();
    let loaded: Option<Marker> = load_state(&store, "sessions/a").await.unwrap();
    assert_eq!(loaded, Some(marker));

    let missing: Option<Marker> = load_state(&store, "sessions/b").await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn corrupt_state_is_a_serialization_error() {
    let store = MemoryStore::new();
    store.put("bad", b"not json".to_vec()).await.unwrap();

    let result: Result<Option<Marker>, _> = load_state(&store, "bad").await;
    assert!(matches!(result, Err(StorageError::Serialization(_))));
}
