pub mod feed;
pub mod interactions;
pub mod synchronizer;

pub use feed::{FeedHandle, FeedView, SyncState};
pub use interactions::InteractionService;
pub use synchronizer::FeedSynchronizer;
