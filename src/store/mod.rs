/// Remote document store gateway
///
/// Thin abstraction over the external realtime database: document creation,
/// field-level partial updates, and live queries delivering full snapshots.
/// The store itself is an external collaborator; this crate only defines
/// the contract and the shared wire types.
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors surfaced by the remote store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// A document as materialized by a snapshot: store-assigned id plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

/// Field-level partial update operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Add the value to an array field unless already present
    ArrayUnion(Value),
    /// Remove every occurrence of the value from an array field
    ArrayRemove(Value),
    /// Overwrite the field with a literal value
    Set(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One event on a live query: a full ordered snapshot, or a stream error.
pub type SnapshotEvent = Result<Vec<Document>, StoreError>;

/// Handle to an active live query. Dropping it stops delivery.
pub struct Subscription {
    events: mpsc::Receiver<SnapshotEvent>,
}

impl Subscription {
    pub fn new(events: mpsc::Receiver<SnapshotEvent>) -> Self {
        Self { events }
    }

    /// Next snapshot event, or `None` once the store closes the stream.
    pub async fn recv(&mut self) -> Option<SnapshotEvent> {
        self.events.recv().await
    }
}

/// Contract the external document store must satisfy.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create a document and return its store-assigned id.
    async fn create_document(&self, collection: &str, fields: Value) -> Result<String, StoreError>;

    /// Establish a live query over a collection, ordered by the given field.
    /// Setup failures are reported synchronously; stream failures arrive as
    /// `Err` events on the subscription.
    fn subscribe_query(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Subscription, StoreError>;

    /// Apply field-level updates to a single document.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<(String, FieldUpdate)>,
    ) -> Result<(), StoreError>;
}

/// Key marking a field value as "assign the timestamp server-side".
pub const SERVER_TIMESTAMP_SENTINEL: &str = "__server_timestamp__";

/// Sentinel value the store replaces with its own commit timestamp.
pub fn server_timestamp() -> Value {
    let mut map = serde_json::Map::new();
    map.insert(SERVER_TIMESTAMP_SENTINEL.to_string(), Value::Bool(true));
    Value::Object(map)
}
