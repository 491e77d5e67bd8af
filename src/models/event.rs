use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event extracted from the accumulated calendar document.
///
/// `id` comes from the source UID when present; otherwise a fallback id is
/// synthesized at extraction time and is not stable across calls. `source`
/// is the provenance tag inferred from the feed URL at import time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
}

impl NormalizedEvent {
    pub fn is_past(&self) -> bool {
        self.end < Utc::now()
    }

    /// Release feeds publish date-only entries; anything spanning a full
    /// day or more is treated as all-day for display purposes.
    pub fn is_all_day(&self) -> bool {
        (self.end - self.start).num_hours() >= 24
    }
}
