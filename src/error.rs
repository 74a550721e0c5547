/// Error types for the feed sync service
///
/// Failures fall into three classes: live-query setup errors, snapshot
/// stream errors, and mutation (create/update) errors. None of them is
/// allowed to reach the presentation layer as an error value; each is
/// converted at the service boundary into a user-facing advisory plus a
/// safe data fallback.
use thiserror::Error;

/// Result type for feed sync operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Establishing the live query failed synchronously
    #[error("subscription setup failed: {0}")]
    SubscriptionSetup(String),

    /// The snapshot stream delivered an error
    #[error("snapshot stream error: {0}")]
    Snapshot(String),

    /// No snapshot arrived within the configured interval
    #[error("timed out waiting for first snapshot")]
    SnapshotTimeout,

    /// A remote create or update call was rejected
    #[error("mutation failed: {0}")]
    Mutation(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// One-line advisory shown to the user when this error degrades the
    /// feed to fallback or locally patched data.
    pub fn advisory(&self) -> &'static str {
        match self {
            AppError::SubscriptionSetup(_) | AppError::Config(_) => {
                "Failed to connect to database. Using demo data."
            }
            AppError::Snapshot(_) => "Failed to load posts. Using demo data.",
            AppError::SnapshotTimeout => "Connection timeout. Using demo data.",
            AppError::Mutation(_) => "Failed to sync your change. Showing it locally.",
        }
    }
}
