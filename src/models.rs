/// Data models for the feed sync service
///
/// `Post` and `Comment` mirror the document schema of the remote store
/// (camelCase field names). Likes are a duplicate-free set of user ids;
/// comments are append-only in insertion order.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

/// Author id reserved for seeded demo content.
pub const DEMO_AUTHOR_ID: &str = "demo";

/// Display name attached to seeded demo content.
pub const DEMO_AUTHOR_NAME: &str = "LinkedIn Demo";

/// Canonical demo post texts. Seeding guarantees one post per text exists.
pub const DEMO_POST_TEXTS: [&str; 3] = [
    "Welcome to the demo feed! Share your first update.",
    "Hiring: We are looking for a frontend engineer. DM if interested!",
    "Tip: Use Firestore for a realtime, universal feed across users.",
];

/// A comment on a post. Append-only; no edit or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub author_id: String,
    pub author_name: String,
    /// Epoch milliseconds, assigned client-side at creation
    pub created_at: i64,
}

/// A social feed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned document id, or a synthesized id for fallback data
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub author_id: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// `None` while the server-assigned timestamp is still pending
    #[serde(default, deserialize_with = "de_created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Decode a post from a store document. The document id wins over any
    /// id embedded in the fields.
    pub fn from_document(doc: &Document) -> serde_json::Result<Post> {
        let mut post: Post = serde_json::from_value(doc.fields.clone())?;
        post.id = doc.id.clone();
        Ok(post)
    }

    pub fn is_demo(&self) -> bool {
        self.author_id == DEMO_AUTHOR_ID
    }

    pub fn has_like(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    /// Local equivalent of the remote array-union/array-remove like toggle.
    /// The caller reports the pre-state; no server round-trip confirms it,
    /// so both directions are computed explicitly and stay idempotent.
    pub fn apply_like_toggle(&mut self, user_id: &str, currently_liked: bool) {
        if currently_liked {
            self.likes.retain(|id| id != user_id);
        } else if !self.has_like(user_id) {
            self.likes.push(user_id.to_string());
        }
    }

    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

/// The fixed fallback list shown whenever no demo posts are available from
/// the store (connection failure, timeout, or an empty collection).
pub fn default_demo_posts() -> Vec<Post> {
    DEMO_POST_TEXTS
        .iter()
        .enumerate()
        .map(|(idx, text)| Post {
            id: format!("demo-{}", idx + 1),
            text: (*text).to_string(),
            author_id: DEMO_AUTHOR_ID.to_string(),
            author_name: DEMO_AUTHOR_NAME.to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Some(Utc::now()),
        })
        .collect()
}

/// Tolerant `createdAt` decoding: the store delivers an RFC 3339 string for
/// committed documents but a sentinel object while the server timestamp is
/// pending. Anything that is not a parseable string maps to `None`.
fn de_created_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::server_timestamp;
    use serde_json::json;

    fn post(likes: &[&str]) -> Post {
        Post {
            id: "p1".to_string(),
            text: "hello".to_string(),
            author_id: "u9".to_string(),
            author_name: "Someone".to_string(),
            likes: likes.iter().map(|s| s.to_string()).collect(),
            comments: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn like_toggle_round_trips() {
        let mut p = post(&[]);
        p.apply_like_toggle("u1", false);
        assert_eq!(p.likes, vec!["u1"]);
        p.apply_like_toggle("u1", true);
        assert!(p.likes.is_empty());
    }

    #[test]
    fn like_toggle_is_idempotent() {
        let mut p = post(&["u1"]);
        p.apply_like_toggle("u1", false);
        assert_eq!(p.likes, vec!["u1"]);

        let mut p = post(&[]);
        p.apply_like_toggle("u1", true);
        assert!(p.likes.is_empty());
    }

    #[test]
    fn comments_keep_insertion_order() {
        let mut p = post(&[]);
        for text in ["first", "second", "third"] {
            p.push_comment(Comment {
                text: text.to_string(),
                author_id: "u1".to_string(),
                author_name: "Alice".to_string(),
                created_at: 0,
            });
        }
        let texts: Vec<&str> = p.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn decodes_committed_document() {
        let doc = Document {
            id: "abc".to_string(),
            fields: json!({
                "text": "hi",
                "authorId": "u1",
                "authorName": "Alice",
                "likes": ["u2"],
                "comments": [{
                    "text": "nice",
                    "authorId": "u2",
                    "authorName": "Bob",
                    "createdAt": 1700000000000i64,
                }],
                "createdAt": "2024-05-01T12:00:00Z",
            }),
        };
        let post = Post::from_document(&doc).unwrap();
        assert_eq!(post.id, "abc");
        assert_eq!(post.likes, vec!["u2"]);
        assert_eq!(post.comments[0].author_name, "Bob");
        assert!(post.created_at.is_some());
    }

    #[test]
    fn pending_server_timestamp_decodes_as_none() {
        let doc = Document {
            id: "abc".to_string(),
            fields: json!({
                "text": "hi",
                "authorId": "demo",
                "createdAt": server_timestamp(),
            }),
        };
        let post = Post::from_document(&doc).unwrap();
        assert!(post.created_at.is_none());
        assert!(post.likes.is_empty());
        assert!(post.is_demo());
    }

    #[test]
    fn fallback_list_matches_canonical_texts() {
        let posts = default_demo_posts();
        assert_eq!(posts.len(), 3);
        for (post, text) in posts.iter().zip(DEMO_POST_TEXTS) {
            assert_eq!(post.text, text);
            assert_eq!(post.author_id, DEMO_AUTHOR_ID);
            assert_eq!(post.author_name, DEMO_AUTHOR_NAME);
            assert!(post.likes.is_empty());
            assert!(post.comments.is_empty());
        }
    }
}
