// Title heuristics for release-feed event names.
// Sonarr publishes "Series - 3x07 - Episode Name"; Radarr publishes
// "Movie Title (2023)". Pure string parsing, never fails.

use crate::models::NormalizedEvent;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // Everything before a " - 3x07"-shaped marker
    static ref EPISODE_MARKER: Regex = Regex::new(r"^(.*?)\s*-\s*\d+x\d+").unwrap();
}

/// Structured episode fields split out of a Sonarr-style title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDetails {
    pub title: String,
    pub episode: String,
    pub episode_name: String,
}

/// Presentation-facing shape: cleaned display title plus optional episode
/// info, derived without mutating the stored event title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayEvent {
    pub display_title: String,
    pub episode: Option<EpisodeDetails>,
    pub event: NormalizedEvent,
}

impl DisplayEvent {
    pub fn from_event(event: NormalizedEvent) -> Self {
        Self {
            display_title: parse_display_title(&event.title),
            episode: parse_episode_details(&event.title),
            event,
        }
    }
}

/// Strip the episode marker or a parenthesized suffix from a title.
///
/// Marker detection is a precise digit-x-digit match; a title with an
/// incidental "x" but no marker passes through unchanged.
pub fn parse_display_title(title: &str) -> String {
    if let Some(captures) = EPISODE_MARKER.captures(title) {
        return captures[1].trim().to_string();
    }
    if title.contains('(') {
        return title.split('(').next().unwrap_or(title).trim().to_string();
    }
    title.to_string()
}

/// Split a title into series / episode / episode-name parts.
///
/// Entered on any "x" in the title, deliberately looser than the marker
/// match above; a title without at least three " - " segments yields None.
pub fn parse_episode_details(title: &str) -> Option<EpisodeDetails> {
    if !title.contains('x') {
        return None;
    }

    let parts: Vec<&str> = title.split(" - ").collect();
    if parts.len() < 3 {
        return None;
    }

    Some(EpisodeDetails {
        title: parts[0].trim().to_string(),
        episode: parts[1].trim().to_string(),
        episode_name: parts[2..].join(" - ").trim().to_string(),
    })
}
