/// Feed synchronizer
///
/// Owns the live subscription to the posts collection: full-replace snapshot
/// handling, a bounded wait for the first snapshot with a demo fallback, and
/// idempotent seeding of the canonical demo posts. All failures degrade to
/// an advisory plus fallback data; none propagate to the caller.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::error::AppError;
use crate::models::{Post, DEMO_AUTHOR_ID, DEMO_AUTHOR_NAME, DEMO_POST_TEXTS};
use crate::services::feed::{FeedHandle, FeedView};
use crate::session::Session;
use crate::store::{server_timestamp, Document, RemoteStore, SortDirection, Subscription};

pub struct FeedSynchronizer {
    store: Arc<dyn RemoteStore>,
    session: Session,
    collection: String,
    snapshot_timeout: Duration,
    feed: FeedHandle,
    active: Mutex<Option<ActiveSubscription>>,
}

struct ActiveSubscription {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl FeedSynchronizer {
    pub fn new(store: Arc<dyn RemoteStore>, session: Session, config: &StoreConfig) -> Self {
        Self {
            store,
            session,
            collection: config.collection.clone(),
            snapshot_timeout: Duration::from_millis(config.snapshot_timeout_ms),
            feed: FeedHandle::new(),
            active: Mutex::new(None),
        }
    }

    /// Handle for interaction handlers and tests; mutation goes through the
    /// fallback-patch operation only.
    pub fn feed(&self) -> FeedHandle {
        self.feed.clone()
    }

    pub fn watch_view(&self) -> watch::Receiver<FeedView> {
        self.feed.watch_view()
    }

    /// Establish the live subscription, atomically replacing any previous
    /// one. The demo-seeding latch is owned by the spawned task, so a
    /// resubscribe starts with a fresh latch.
    pub async fn subscribe(&self) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            stop(previous).await;
        }

        // Show the fallback list right away so the UI renders before the
        // first snapshot lands.
        self.feed.substitute_fallback(None).await;

        let subscription = match self.store.subscribe_query(
            &self.collection,
            "createdAt",
            SortDirection::Descending,
        ) {
            Ok(subscription) => subscription,
            Err(err) => {
                let err = AppError::SubscriptionSetup(err.to_string());
                error!(user_id = %self.session.user_id, "{}", err);
                self.feed.substitute_fallback(Some(err.advisory())).await;
                return;
            }
        };

        info!(
            user_id = %self.session.user_id,
            collection = %self.collection,
            "subscribed to live post feed"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_subscription(
            self.store.clone(),
            self.feed.clone(),
            self.collection.clone(),
            self.snapshot_timeout,
            subscription,
            shutdown_rx,
        ));
        *active = Some(ActiveSubscription {
            shutdown: shutdown_tx,
            task,
        });
    }

    /// Stop snapshot delivery and clear the pending first-snapshot timeout.
    /// Returns once the subscription task is fully torn down.
    pub async fn unsubscribe(&self) {
        if let Some(previous) = self.active.lock().await.take() {
            stop(previous).await;
            debug!(collection = %self.collection, "unsubscribed from live post feed");
        }
    }
}

async fn stop(subscription: ActiveSubscription) {
    let _ = subscription.shutdown.send(true);
    subscription.task.abort();
    // Wait for the task future to drop so the stream receiver is gone and
    // no further snapshot can be delivered.
    let _ = subscription.task.await;
}

async fn run_subscription(
    store: Arc<dyn RemoteStore>,
    feed: FeedHandle,
    collection: String,
    snapshot_timeout: Duration,
    mut subscription: Subscription,
    mut shutdown: watch::Receiver<bool>,
) {
    // One-shot seeding latch, scoped to this subscription lifetime.
    let mut seeded = false;
    // Armed until the first snapshot event or until it fires once; a stale
    // timeout must never overwrite fresher authoritative data.
    let mut timeout_armed = true;
    let deadline = tokio::time::sleep(snapshot_timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = &mut deadline, if timeout_armed => {
                timeout_armed = false;
                let err = AppError::SnapshotTimeout;
                warn!(collection = %collection, timeout_ms = snapshot_timeout.as_millis() as u64, "{}", err);
                feed.substitute_fallback(Some(err.advisory())).await;
            }
            event = subscription.recv() => match event {
                Some(Ok(documents)) => {
                    timeout_armed = false;
                    let posts = decode_documents(&documents);
                    debug!(collection = %collection, count = posts.len(), "snapshot received");
                    feed.replace_all(posts.clone()).await;
                    if !seeded {
                        seeded = true;
                        // Seeding failures leave the feed usable; log and move on.
                        if let Err(err) = ensure_demo_posts(store.as_ref(), &collection, &posts).await {
                            warn!(collection = %collection, "demo post seeding failed: {}", err);
                        }
                    }
                }
                Some(Err(err)) => {
                    timeout_armed = false;
                    let err = AppError::Snapshot(err.to_string());
                    error!(collection = %collection, "{}", err);
                    feed.substitute_fallback(Some(err.advisory())).await;
                }
                None => {
                    debug!(collection = %collection, "snapshot stream closed");
                    break;
                }
            }
        }
    }
}

/// Decode snapshot documents in store order. Malformed documents are
/// skipped; the collection schema is not under this crate's control.
fn decode_documents(documents: &[Document]) -> Vec<Post> {
    documents
        .iter()
        .filter_map(|doc| match Post::from_document(doc) {
            Ok(post) => Some(post),
            Err(err) => {
                warn!(doc_id = %doc.id, "skipping malformed post document: {}", err);
                None
            }
        })
        .collect()
}

/// Create one demo post per canonical text missing from the snapshot.
/// Idempotent against the provided snapshot: texts already present are
/// never recreated.
async fn ensure_demo_posts(
    store: &dyn RemoteStore,
    collection: &str,
    posts: &[Post],
) -> crate::Result<()> {
    let existing: Vec<&str> = posts
        .iter()
        .filter(|post| post.is_demo())
        .map(|post| post.text.as_str())
        .collect();

    for text in DEMO_POST_TEXTS {
        if existing.contains(&text) {
            continue;
        }
        let mut fields = serde_json::Map::new();
        fields.insert("text".to_string(), text.into());
        fields.insert("authorId".to_string(), DEMO_AUTHOR_ID.into());
        fields.insert("authorName".to_string(), DEMO_AUTHOR_NAME.into());
        fields.insert("likes".to_string(), serde_json::Value::Array(Vec::new()));
        fields.insert("comments".to_string(), serde_json::Value::Array(Vec::new()));
        fields.insert("createdAt".to_string(), server_timestamp());

        let id = store
            .create_document(collection, serde_json::Value::Object(fields))
            .await
            .map_err(|err| AppError::Mutation(err.to_string()))?;
        info!(doc_id = %id, "seeded demo post");
    }
    Ok(())
}
