// arrcal - release calendar refresh CLI
// Runs one refresh cycle over the configured feeds and prints the merged
// event list through the title heuristics.

use arrcal::titles::DisplayEvent;
use arrcal::utils::logging;
use arrcal::{config, run_refresh_cycle, CalendarIngest, ProxyGateway};
use log::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging()?;

    let feeds = config::calendar_feeds();
    config::validate_config(&feeds);

    let endpoint = config::proxy_endpoint();
    info!("Using calendar proxy at {}", endpoint);

    let gateway = ProxyGateway::new(&endpoint)
        .map_err(|e| anyhow::anyhow!("Failed to create proxy gateway: {}", e))?;

    let mut engine = CalendarIngest::new();
    let summary = run_refresh_cycle(&mut engine, &gateway, &feeds).await;

    for failure in &summary.errors {
        error!("{}: {}", failure.feed_name, failure.message);
    }

    for event in engine.events() {
        let display = DisplayEvent::from_event(event);
        let source = display.event.source.as_deref().unwrap_or("unknown");
        // All-day releases get a bare date; past ones are marked as out
        let when = if display.event.is_all_day() {
            display.event.start.format("%Y-%m-%d      ").to_string()
        } else {
            display.event.start.format("%Y-%m-%d %H:%M").to_string()
        };
        let marker = if display.event.is_past() { " (released)" } else { "" };
        match &display.episode {
            Some(ep) => println!(
                "{}  [{}] {} {} ({}){}",
                when, source, display.display_title, ep.episode, ep.episode_name, marker
            ),
            None => println!("{}  [{}] {}{}", when, source, display.display_title, marker),
        }
    }

    if !summary.all_succeeded() {
        info!(
            "{} of {} feeds failed; listing is partial",
            summary.feeds_failed, summary.feeds_attempted
        );
    }

    Ok(())
}
