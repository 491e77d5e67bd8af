// Refresh-cycle orchestration.
// One cycle: clear the engine, then import each enabled feed in registry
// order, sequentially. A failing feed is logged and recorded; the cycle
// always runs to the end so healthy feeds keep their events.

use crate::gateway::FeedGateway;
use crate::ingest::CalendarIngest;
use crate::models::{FeedDescriptor, RefreshSummary};
use crate::utils::logging;
use log::info;
use std::time::Instant;

pub async fn run_refresh_cycle(
    engine: &mut CalendarIngest,
    gateway: &dyn FeedGateway,
    feeds: &[FeedDescriptor],
) -> RefreshSummary {
    info!("Starting calendar refresh cycle");
    let mut summary = RefreshSummary::new();

    engine.clear();

    for feed in feeds.iter().filter(|f| f.enabled) {
        summary.feeds_attempted += 1;
        let started = Instant::now();
        let before = engine.events().len();

        match engine.import_from_feed(gateway, &feed.url).await {
            Ok(()) => {
                let imported = engine.events().len() - before;
                logging::log_feed_import(&feed.name, imported, started.elapsed().as_millis() as u64);
            }
            Err(e) => {
                logging::log_error_with_context(&e, &format!("Failed to load {}", feed.name));
                summary.record_failure(feed.name.clone(), e.to_string());
            }
        }
    }

    summary.events_total = engine.events().len();
    info!(
        "Calendar refresh completed: {} events from {} feeds ({} failed)",
        summary.events_total, summary.feeds_attempted, summary.feeds_failed
    );
    summary
}
