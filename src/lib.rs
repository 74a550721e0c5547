/// Feed Sync Service Library
///
/// Keeps an in-memory social feed (posts, likes, comments) synchronized
/// against an external realtime document store, and applies optimistic local
/// patches when remote mutations fail so the UI never blocks on the network.
///
/// # Modules
///
/// - `config`: Configuration management
/// - `error`: Error types and handling
/// - `models`: Data structures for posts and comments
/// - `session`: Authenticated session context
/// - `services`: Feed synchronizer and interaction handlers
/// - `store`: Remote document store gateway
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{FeedSynchronizer, FeedView, InteractionService};
pub use session::Session;
