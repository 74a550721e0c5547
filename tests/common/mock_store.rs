//! Mock RemoteStore for integration tests
//!
//! Hand-written fake with switchable failure modes and manual snapshot
//! emission, so tests can drive the synchronizer through connection
//! failures, timeouts, and authoritative updates without a real backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use feed_sync::store::{
    Document, FieldUpdate, RemoteStore, SnapshotEvent, SortDirection, StoreError, Subscription,
};

/// Recorded update call: (collection, document id, field updates).
pub type RecordedUpdate = (String, String, Vec<(String, FieldUpdate)>);

pub struct MockStore {
    /// Sender side of the most recent subscription, if any
    snapshots: Mutex<Option<mpsc::Sender<SnapshotEvent>>>,
    pub fail_subscribe: AtomicBool,
    pub fail_updates: AtomicBool,
    pub fail_creates: AtomicBool,
    created: Mutex<Vec<(String, Value)>>,
    updates: Mutex<Vec<RecordedUpdate>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            snapshots: Mutex::new(None),
            fail_subscribe: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fail_creates: AtomicBool::new(false),
            created: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Deliver a snapshot to the active subscription. Returns false when no
    /// subscriber is listening (never subscribed, or already torn down).
    pub async fn emit(&self, documents: Vec<Document>) -> bool {
        let sender = self.snapshots.lock().unwrap().clone();
        match sender {
            Some(sender) => sender.send(Ok(documents)).await.is_ok(),
            None => false,
        }
    }

    /// Deliver a stream error to the active subscription.
    pub async fn emit_error(&self, err: StoreError) -> bool {
        let sender = self.snapshots.lock().unwrap().clone();
        match sender {
            Some(sender) => sender.send(Err(err)).await.is_ok(),
            None => false,
        }
    }

    pub fn created(&self) -> Vec<(String, Value)> {
        self.created.lock().unwrap().clone()
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().unwrap().clone()
    }

    /// Shorthand for a committed post document as a snapshot would carry it.
    pub fn post_doc(id: &str, text: &str, author_id: &str, likes: &[&str]) -> Document {
        Document {
            id: id.to_string(),
            fields: json!({
                "text": text,
                "authorId": author_id,
                "authorName": if author_id == "demo" { "LinkedIn Demo" } else { "Test User" },
                "likes": likes,
                "comments": [],
                "createdAt": "2024-05-01T12:00:00Z",
            }),
        }
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn create_document(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("create rejected".to_string()));
        }
        self.created
            .lock()
            .unwrap()
            .push((collection.to_string(), fields));
        Ok(format!("doc-{}", Uuid::new_v4()))
    }

    fn subscribe_query(
        &self,
        _collection: &str,
        _order_by: &str,
        _direction: SortDirection,
    ) -> Result<Subscription, StoreError> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("subscribe rejected".to_string()));
        }
        let (tx, rx) = mpsc::channel(16);
        *self.snapshots.lock().unwrap() = Some(tx);
        Ok(Subscription::new(rx))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<(String, FieldUpdate)>,
    ) -> Result<(), StoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("update rejected".to_string()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((collection.to_string(), id.to_string(), updates));
        Ok(())
    }
}
