// Proxy gateway seam
// The engine never talks to feed hosts directly; all fetches go through
// the same-origin calendar proxy, abstracted behind this trait.

use crate::error::CalendarResult;
use async_trait::async_trait;

pub mod proxy;

pub use proxy::ProxyGateway;

/// Fetches raw ICS text for a feed URL.
///
/// Implementations own transport policy (timeouts, retries); the ingestion
/// engine only sees text or a fetch error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedGateway: Send + Sync {
    async fn fetch_calendar(&self, feed_url: &str) -> CalendarResult<String>;
}
