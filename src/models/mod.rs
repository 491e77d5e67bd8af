// Declare modules
pub mod event;
pub mod feed;
pub mod refresh;

// Re-export all public types to keep imports flat for external callers.
pub use event::NormalizedEvent;
pub use feed::FeedDescriptor;
pub use refresh::{FeedFailure, RefreshSummary};
