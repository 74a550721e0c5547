/// Interaction handlers for likes and comments
///
/// Each handler writes through the remote store and, when the write is
/// rejected, falls back to an optimistic patch of the local copy of that
/// post only. Failed mutations are never retried; the patch is a visual
/// bridge until the next authoritative snapshot.
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::StoreConfig;
use crate::error::AppError;
use crate::models::Comment;
use crate::services::feed::FeedHandle;
use crate::session::Session;
use crate::store::{FieldUpdate, RemoteStore};

pub struct InteractionService {
    store: Arc<dyn RemoteStore>,
    feed: FeedHandle,
    session: Session,
    collection: String,
}

impl InteractionService {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        feed: FeedHandle,
        session: Session,
        config: &StoreConfig,
    ) -> Self {
        Self {
            store,
            feed,
            session,
            collection: config.collection.clone(),
        }
    }

    /// Toggle the session user's like on a post. `currently_liked` is the
    /// caller-observed pre-state; the remote side gets an array-union or
    /// array-remove, the local fallback computes the toggle explicitly.
    pub async fn toggle_like(&self, post_id: &str, currently_liked: bool) {
        let user = Value::String(self.session.user_id.clone());
        let update = if currently_liked {
            FieldUpdate::ArrayRemove(user)
        } else {
            FieldUpdate::ArrayUnion(user)
        };

        let result = self
            .store
            .update_document(&self.collection, post_id, vec![("likes".to_string(), update)])
            .await;

        if let Err(err) = result {
            let err = AppError::Mutation(err.to_string());
            warn!(post_id = %post_id, "like update failed, patching locally: {}", err);
            let user_id = self.session.user_id.clone();
            let patched = self
                .feed
                .apply_post_patch(post_id, |post| {
                    post.apply_like_toggle(&user_id, currently_liked)
                })
                .await;
            if patched {
                self.feed.set_advisory(err.advisory()).await;
            } else {
                debug!(post_id = %post_id, "like fallback target not in feed state");
            }
        }
    }

    /// Append a comment authored by the session user. Text is trimmed;
    /// empty input is dropped (the caller is expected to pre-validate).
    pub async fn add_comment(&self, post_id: &str, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!(post_id = %post_id, "ignoring empty comment");
            return;
        }

        let comment = Comment {
            text: text.to_string(),
            author_id: self.session.user_id.clone(),
            author_name: self.session.author_name().to_string(),
            created_at: Utc::now().timestamp_millis(),
        };
        let fields = match serde_json::to_value(&comment) {
            Ok(fields) => fields,
            Err(err) => {
                error!(post_id = %post_id, "comment serialization failed: {}", err);
                return;
            }
        };

        let result = self
            .store
            .update_document(
                &self.collection,
                post_id,
                vec![("comments".to_string(), FieldUpdate::ArrayUnion(fields))],
            )
            .await;

        if let Err(err) = result {
            let err = AppError::Mutation(err.to_string());
            warn!(post_id = %post_id, "comment update failed, patching locally: {}", err);
            let patched = self
                .feed
                .apply_post_patch(post_id, |post| post.push_comment(comment))
                .await;
            if patched {
                self.feed.set_advisory(err.advisory()).await;
            } else {
                debug!(post_id = %post_id, "comment fallback target not in feed state");
            }
        }
    }
}
