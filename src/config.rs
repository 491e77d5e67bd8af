//! Environment-driven configuration.
//!
//! The feed registry is static: Sonarr and Radarr release feeds, URLs
//! taken from the environment, in fixed order. A feed with no configured
//! URL stays in the registry; its import fails and is logged like any
//! other feed failure.

use crate::gateway::proxy::validate_feed_url;
use crate::models::FeedDescriptor;
use log::{info, warn};
use std::env;

pub const DEFAULT_PROXY_ENDPOINT: &str = "http://localhost:3000/api/calendar-proxy";

/// Base URL of the calendar proxy endpoint.
pub fn proxy_endpoint() -> String {
    env::var("ARRCAL_PROXY_URL").unwrap_or_else(|_| DEFAULT_PROXY_ENDPOINT.to_string())
}

/// The ordered feed registry. Iteration order here is refresh order.
pub fn calendar_feeds() -> Vec<FeedDescriptor> {
    vec![
        FeedDescriptor {
            id: "sonarr".to_string(),
            name: "Sonarr TV Shows".to_string(),
            url: env::var("SONARR_CALENDAR_URL").unwrap_or_default(),
            enabled: true,
        },
        FeedDescriptor {
            id: "radarr".to_string(),
            name: "Radarr Movies".to_string(),
            url: env::var("RADARR_CALENDAR_URL").unwrap_or_default(),
            enabled: true,
        },
    ]
}

/// Validates the configured registry, warning on feeds that cannot work.
/// Never fails: a broken feed URL degrades to a per-feed import failure.
pub fn validate_config(feeds: &[FeedDescriptor]) {
    info!("Validating {} configured calendar feeds", feeds.len());

    for feed in feeds {
        if !feed.enabled {
            continue;
        }
        if let Err(e) = validate_feed_url(&feed.url) {
            warn!("Feed '{}' has an unusable URL: {}", feed.name, e);
        }
    }
}
