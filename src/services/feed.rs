/// Shared feed state
///
/// The synchronizer owns this state; interaction handlers mutate it only
/// through [`FeedHandle::apply_post_patch`]. Every change republishes a
/// [`FeedView`] on a watch channel for the presentation layer.
use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::models::{default_demo_posts, Post};

/// Per-post reconciliation state. A local patch is a temporary visual
/// bridge only; the next authoritative snapshot replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Matches the last authoritative snapshot
    Synced,
    /// Carries an unconfirmed local mutation
    LocallyPatched,
}

#[derive(Debug, Clone)]
struct PostEntry {
    post: Post,
    sync: SyncState,
}

/// What the presentation layer renders: the selected post list, the current
/// advisory banner (at most one), and whether the first load is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    pub posts: Vec<Post>,
    pub advisory: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct FeedState {
    entries: Vec<PostEntry>,
    advisory: Option<String>,
    loaded: bool,
}

impl FeedState {
    /// Display selection: demo-authored posts whenever any exist, else the
    /// fixed fallback list. Genuine user posts are hidden as long as demo
    /// content is present; the upstream product kept this narrowing and its
    /// intent is unclear, so it is preserved rather than fixed.
    fn view(&self) -> FeedView {
        let demo: Vec<Post> = self
            .entries
            .iter()
            .filter(|entry| entry.post.is_demo())
            .map(|entry| entry.post.clone())
            .collect();
        let posts = if demo.is_empty() {
            default_demo_posts()
        } else {
            demo
        };
        FeedView {
            posts,
            advisory: self.advisory.clone(),
            loading: !self.loaded,
        }
    }
}

/// Cloneable handle to the feed state and its published view.
#[derive(Clone)]
pub struct FeedHandle {
    state: Arc<RwLock<FeedState>>,
    view_tx: Arc<watch::Sender<FeedView>>,
}

impl FeedHandle {
    pub(crate) fn new() -> Self {
        let state = FeedState::default();
        let (view_tx, _) = watch::channel(state.view());
        Self {
            state: Arc::new(RwLock::new(state)),
            view_tx: Arc::new(view_tx),
        }
    }

    /// Subscribe to view updates. The receiver always holds a current view.
    pub fn watch_view(&self) -> watch::Receiver<FeedView> {
        self.view_tx.subscribe()
    }

    /// Full-replace semantics for an authoritative snapshot: every entry
    /// becomes `Synced` (optimistic patches are discarded) and any sticky
    /// advisory clears.
    pub(crate) async fn replace_all(&self, posts: Vec<Post>) {
        {
            let mut state = self.state.write().await;
            state.entries = posts
                .into_iter()
                .map(|post| PostEntry {
                    post,
                    sync: SyncState::Synced,
                })
                .collect();
            state.advisory = None;
            state.loaded = true;
        }
        self.publish().await;
    }

    /// Substitute the fixed fallback list. `advisory = None` leaves the
    /// current banner untouched (used to prime the feed on subscribe).
    pub(crate) async fn substitute_fallback(&self, advisory: Option<&str>) {
        {
            let mut state = self.state.write().await;
            state.entries = default_demo_posts()
                .into_iter()
                .map(|post| PostEntry {
                    post,
                    sync: SyncState::Synced,
                })
                .collect();
            if let Some(message) = advisory {
                state.advisory = Some(message.to_string());
            }
            state.loaded = true;
        }
        self.publish().await;
    }

    pub(crate) async fn set_advisory(&self, message: &str) {
        {
            let mut state = self.state.write().await;
            state.advisory = Some(message.to_string());
        }
        self.publish().await;
    }

    /// The fallback-patch operation: mutate a single post in place and mark
    /// it locally patched. Returns false when the post is not in the feed.
    pub(crate) async fn apply_post_patch<F>(&self, post_id: &str, patch: F) -> bool
    where
        F: FnOnce(&mut Post),
    {
        let patched = {
            let mut state = self.state.write().await;
            match state
                .entries
                .iter_mut()
                .find(|entry| entry.post.id == post_id)
            {
                Some(entry) => {
                    patch(&mut entry.post);
                    entry.sync = SyncState::LocallyPatched;
                    true
                }
                None => false,
            }
        };
        if patched {
            self.publish().await;
        }
        patched
    }

    /// Current copy of a post, regardless of display selection.
    pub async fn post(&self, post_id: &str) -> Option<Post> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|entry| entry.post.id == post_id)
            .map(|entry| entry.post.clone())
    }

    pub async fn sync_state(&self, post_id: &str) -> Option<SyncState> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|entry| entry.post.id == post_id)
            .map(|entry| entry.sync)
    }

    /// All posts currently held, including ones the view hides.
    pub async fn posts(&self) -> Vec<Post> {
        let state = self.state.read().await;
        state.entries.iter().map(|entry| entry.post.clone()).collect()
    }

    async fn publish(&self) {
        let view = self.state.read().await.view();
        self.view_tx.send_replace(view);
    }
}
