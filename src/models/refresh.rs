use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one refresh cycle across the feed registry.
///
/// A failing feed is recorded here and logged, never propagated; partial
/// data from healthy feeds always survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub feeds_attempted: usize,
    pub feeds_failed: usize,
    pub events_total: usize,
    pub errors: Vec<FeedFailure>,
    pub refresh_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedFailure {
    pub feed_name: String,
    pub message: String,
}

impl RefreshSummary {
    pub fn new() -> Self {
        Self {
            feeds_attempted: 0,
            feeds_failed: 0,
            events_total: 0,
            errors: Vec::new(),
            refresh_time: Utc::now(),
        }
    }

    pub fn record_failure<S: Into<String>>(&mut self, feed_name: S, message: S) {
        self.feeds_failed += 1;
        self.errors.push(FeedFailure {
            feed_name: feed_name.into(),
            message: message.into(),
        });
    }

    pub fn all_succeeded(&self) -> bool {
        self.feeds_failed == 0
    }
}

impl Default for RefreshSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_failure() {
        let mut summary = RefreshSummary::new();
        summary.feeds_attempted = 2;
        summary.record_failure("Radarr Movies", "Calendar import failed: Received empty calendar feed");

        assert_eq!(summary.feeds_failed, 1);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.errors[0].feed_name, "Radarr Movies");
    }

    #[test]
    fn test_empty_summary_succeeded() {
        assert!(RefreshSummary::new().all_succeeded());
    }
}
