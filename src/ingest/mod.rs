// Calendar ingestion engine.
// Accumulates VEVENTs from any number of feed imports into one in-memory
// calendar document, then extracts them as normalized events on demand.

use crate::error::{CalendarError, CalendarResult};
use crate::gateway::FeedGateway;
use crate::models::NormalizedEvent;
use chrono::Utc;
use icalendar::{Calendar, Component, Event as IcsEvent, EventLike};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use uuid::Uuid;

pub mod datetime;

/// Extension property carrying the provenance tag on each merged VEVENT.
const SOURCE_PROPERTY: &str = "X-SOURCE";

const UNTITLED: &str = "Untitled Event";

/// Derive a provenance tag from the feed URL. Matched against the content
/// of the URL, never the ICS payload; radarr is checked first.
pub fn infer_source(feed_url: &str) -> &'static str {
    if feed_url.contains("radarr") {
        "radarr"
    } else if feed_url.contains("sonarr") {
        "sonarr"
    } else {
        "unknown"
    }
}

/// Owns the accumulated calendar document for one refresh session.
///
/// Single-writer by construction: each session holds its own instance and
/// nothing else mutates the document. Imports grow the document
/// monotonically until `clear` is called; events are never deduplicated.
pub struct CalendarIngest {
    accumulated: Calendar,
}

impl CalendarIngest {
    pub fn new() -> Self {
        Self {
            accumulated: Calendar::new(),
        }
    }

    /// Discard all imported events. Safe to call when already empty.
    pub fn clear(&mut self) {
        self.accumulated = Calendar::new();
    }

    /// Fetch one feed through the gateway and merge its events.
    ///
    /// Any failure (fetch, empty body, missing VCALENDAR marker, parse)
    /// surfaces wrapped as "Calendar import failed: <underlying message>"
    /// and leaves the accumulated document unchanged.
    pub async fn import_from_feed(
        &mut self,
        gateway: &dyn FeedGateway,
        feed_url: &str,
    ) -> CalendarResult<()> {
        match self.fetch_and_import(gateway, feed_url).await {
            Ok(()) => Ok(()),
            Err(e) => {
                log::error!("Error importing calendar feed: {}", e);
                Err(CalendarError::import(e))
            }
        }
    }

    async fn fetch_and_import(
        &mut self,
        gateway: &dyn FeedGateway,
        feed_url: &str,
    ) -> CalendarResult<()> {
        let ical_text = gateway.fetch_calendar(feed_url).await?;

        if ical_text.trim().is_empty() {
            return Err(CalendarError::EmptyFeed);
        }

        // Cheap sanity check before attempting a full parse
        if !ical_text.contains("BEGIN:VCALENDAR") {
            return Err(CalendarError::InvalidFormat);
        }

        self.import_document(&ical_text, infer_source(feed_url))
    }

    /// Parse `ical_text` and merge its VEVENTs, tagged with `source`.
    ///
    /// A parse failure fails the whole call with no partial merge. A single
    /// malformed event is logged and skipped; it never blocks the batch.
    pub fn import_document(&mut self, ical_text: &str, source: &str) -> CalendarResult<()> {
        // The parser can panic on truncated input (short or unterminated
        // final line); contain it so a corrupt feed stays a parse failure.
        let parsed = catch_unwind(AssertUnwindSafe(|| Calendar::from_str(ical_text)))
            .unwrap_or_else(|_| Err("malformed calendar text".to_string()))
            .map_err(CalendarError::parse)?;

        for component in parsed.components {
            if let Some(ics_event) = component.as_event() {
                if let Err(e) = self.merge_event(ics_event, source) {
                    log::warn!("Error processing event: {}", e);
                }
            }
        }

        Ok(())
    }

    fn merge_event(&mut self, ics_event: &IcsEvent, source: &str) -> CalendarResult<()> {
        if ics_event.get_start().is_none() {
            return Err(CalendarError::event("event must have a valid start date"));
        }

        let mut tagged = ics_event.clone();
        tagged.add_property(SOURCE_PROPERTY, source);
        self.accumulated.push(tagged);
        Ok(())
    }

    /// Extract every accumulated VEVENT as a `NormalizedEvent`, in
    /// insertion order (feed import order, then intra-feed order).
    ///
    /// Never fails outward: an unextractable event is logged and dropped,
    /// and the remainder is returned.
    pub fn events(&self) -> Vec<NormalizedEvent> {
        let mut events = Vec::new();

        for component in &self.accumulated.components {
            if let Some(ics_event) = component.as_event() {
                match extract_event(ics_event) {
                    Ok(event) => events.push(event),
                    Err(e) => log::warn!("Error processing event: {}", e),
                }
            }
        }

        events
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.components.is_empty()
    }
}

impl Default for CalendarIngest {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_event(ics_event: &IcsEvent) -> CalendarResult<NormalizedEvent> {
    let start = ics_event
        .get_start()
        .as_ref()
        .and_then(datetime::resolve_to_utc)
        .ok_or_else(|| CalendarError::event("event must have a valid start date"))?;

    let end = ics_event
        .get_end()
        .as_ref()
        .and_then(datetime::resolve_to_utc)
        .unwrap_or(start);

    // Fallback ids are not stable across calls; callers must not rely on
    // identity for events lacking a UID.
    let id = ics_event
        .get_uid()
        .map(|uid| uid.to_string())
        .unwrap_or_else(|| format!("event-{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4()));

    Ok(NormalizedEvent {
        id,
        title: ics_event.get_summary().unwrap_or(UNTITLED).to_string(),
        start,
        end,
        description: ics_event.get_description().map(|s| s.to_string()),
        location: ics_event.get_location().map(|s| s.to_string()),
        source: ics_event.property_value(SOURCE_PROPERTY).map(|s| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockFeedGateway;

    const SONARR_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Sonarr//EN\r\n\
BEGIN:VEVENT\r\n\
UID:ep-101\r\n\
SUMMARY:Show Name - 3x07 - Pilot\r\n\
DTSTART:20230615T200000Z\r\n\
DTEND:20230615T203000Z\r\n\
DESCRIPTION:Season premiere\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:ep-102\r\n\
SUMMARY:Other Show - 1x01 - First\r\n\
DTSTART:20230616T210000Z\r\n\
DTEND:20230616T213000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    const RADARR_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Radarr//EN\r\n\
BEGIN:VEVENT\r\n\
UID:movie-1\r\n\
SUMMARY:Movie Title (2023)\r\n\
DTSTART:20230701T000000Z\r\n\
LOCATION:Cinema\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    const MISSING_START_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:good-1\r\n\
SUMMARY:Good Event\r\n\
DTSTART:20230615T200000Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:bad-1\r\n\
SUMMARY:No Start Date\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:good-2\r\n\
SUMMARY:Also Good\r\n\
DTSTART:20230616T200000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    const ANONYMOUS_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20230615T200000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_infer_source() {
        assert_eq!(infer_source("http://host/sonarr/feed/calendar.ics"), "sonarr");
        assert_eq!(infer_source("http://host/radarr/feed/calendar.ics"), "radarr");
        assert_eq!(infer_source("http://host/other/calendar.ics"), "unknown");
    }

    #[test]
    fn test_import_document_returns_all_events_in_order() {
        let mut engine = CalendarIngest::new();
        engine.import_document(SONARR_ICS, "sonarr").unwrap();

        let events = engine.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "ep-101");
        assert_eq!(events[1].id, "ep-102");
        assert_eq!(events[0].title, "Show Name - 3x07 - Pilot");
        assert_eq!(events[0].description.as_deref(), Some("Season premiere"));
        assert_eq!(events[0].source.as_deref(), Some("sonarr"));
    }

    #[test]
    fn test_import_twice_without_clear_duplicates() {
        let mut engine = CalendarIngest::new();
        engine.import_document(SONARR_ICS, "sonarr").unwrap();
        engine.import_document(SONARR_ICS, "sonarr").unwrap();
        assert_eq!(engine.events().len(), 4);
    }

    #[test]
    fn test_clear_then_reimport_is_idempotent() {
        let mut engine = CalendarIngest::new();
        engine.import_document(SONARR_ICS, "sonarr").unwrap();
        let first = engine.events();

        engine.clear();
        assert!(engine.is_empty());
        engine.import_document(SONARR_ICS, "sonarr").unwrap();
        assert_eq!(engine.events(), first);
    }

    #[test]
    fn test_clear_when_empty_is_safe() {
        let mut engine = CalendarIngest::new();
        engine.clear();
        engine.clear();
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_event_without_start_is_skipped_not_fatal() {
        let mut engine = CalendarIngest::new();
        engine.import_document(MISSING_START_ICS, "unknown").unwrap();

        let events = engine.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "good-1");
        assert_eq!(events[1].id, "good-2");
    }

    #[test]
    fn test_missing_end_defaults_to_start() {
        let mut engine = CalendarIngest::new();
        engine.import_document(RADARR_ICS, "radarr").unwrap();

        let events = engine.events();
        assert_eq!(events[0].end, events[0].start);
        assert_eq!(events[0].location.as_deref(), Some("Cinema"));
        assert!(events[0].description.is_none());
    }

    #[test]
    fn test_missing_uid_gets_fallback_id_and_placeholder_title() {
        let mut engine = CalendarIngest::new();
        engine.import_document(ANONYMOUS_ICS, "unknown").unwrap();

        let events = engine.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].id.starts_with("event-"));
        assert_eq!(events[0].title, "Untitled Event");
    }

    #[test]
    fn test_events_from_multiple_feeds_keep_import_order() {
        let mut engine = CalendarIngest::new();
        engine.import_document(SONARR_ICS, "sonarr").unwrap();
        engine.import_document(RADARR_ICS, "radarr").unwrap();

        let events = engine.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].source.as_deref(), Some("sonarr"));
        assert_eq!(events[2].source.as_deref(), Some("radarr"));
    }

    #[test]
    fn test_unparseable_document_fails_with_no_partial_merge() {
        let mut engine = CalendarIngest::new();
        let result = engine.import_document("BEGIN:VCALENDAR\r\ngarbage", "unknown");
        assert!(matches!(result, Err(CalendarError::Parse(_))));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_truncated_final_line_is_a_parse_error() {
        // Inputs this short make the parser abort mid-token; they must
        // surface as Parse errors like any other malformed document.
        for text in ["BEGIN:VCALENDAR\r\nX", "BEGIN:VCALENDAR\r\nDTST", "BEGIN:VCALENDAR\n:"] {
            let mut engine = CalendarIngest::new();
            let result = engine.import_document(text, "unknown");
            assert!(matches!(result, Err(CalendarError::Parse(_))), "input: {:?}", text);
            assert!(engine.is_empty());
        }
    }

    #[tokio::test]
    async fn test_import_from_feed_tags_source_from_url() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_fetch_calendar()
            .returning(|_| Ok(RADARR_ICS.to_string()));

        let mut engine = CalendarIngest::new();
        engine
            .import_from_feed(&gateway, "http://localhost:7878/radarr/feed.ics")
            .await
            .unwrap();

        assert_eq!(engine.events()[0].source.as_deref(), Some("radarr"));
    }

    #[tokio::test]
    async fn test_import_from_feed_unknown_source() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_fetch_calendar()
            .returning(|_| Ok(SONARR_ICS.to_string()));

        let mut engine = CalendarIngest::new();
        engine
            .import_from_feed(&gateway, "http://example.com/some/feed.ics")
            .await
            .unwrap();

        assert_eq!(engine.events()[0].source.as_deref(), Some("unknown"));
    }

    #[tokio::test]
    async fn test_empty_feed_fails_before_parse() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_fetch_calendar()
            .returning(|_| Ok("   \r\n ".to_string()));

        let mut engine = CalendarIngest::new();
        let err = engine
            .import_from_feed(&gateway, "http://example.com/feed.ics")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Calendar import failed: Received empty calendar feed"
        );
        assert!(engine.is_empty());
    }

    #[tokio::test]
    async fn test_missing_vcalendar_marker_fails_as_format_error() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_fetch_calendar()
            .returning(|_| Ok("this is not a calendar".to_string()));

        let mut engine = CalendarIngest::new();
        engine.import_document(SONARR_ICS, "sonarr").unwrap();
        let before = engine.events();

        let err = engine
            .import_from_feed(&gateway, "http://example.com/feed.ics")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Calendar import failed: Invalid calendar format received"
        );
        // Accumulated document unchanged from before the failed call
        assert_eq!(engine.events(), before);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_gateway_message() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_fetch_calendar()
            .returning(|_| Err(CalendarError::fetch("Failed to fetch calendar: 404 Not Found")));

        let mut engine = CalendarIngest::new();
        let err = engine
            .import_from_feed(&gateway, "http://example.com/feed.ics")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Calendar import failed: Failed to fetch calendar: 404 Not Found"
        );
    }
}
