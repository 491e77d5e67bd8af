use thiserror::Error;

/// Errors raised while importing calendar feeds.
///
/// Per-event problems (`Event`) are always recovered inside the engine:
/// the offending VEVENT is logged and dropped, siblings keep processing.
/// Everything else aborts the single feed it occurred in; the refresh
/// cycle catches per feed and continues.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("{0}")]
    Fetch(String),

    #[error("Received empty calendar feed")]
    EmptyFeed,

    #[error("Invalid calendar format received")]
    InvalidFormat,

    #[error("Failed to parse calendar: {0}")]
    Parse(String),

    #[error("Event error: {0}")]
    Event(String),

    #[error("Calendar import failed: {0}")]
    Import(#[source] Box<CalendarError>),
}

impl CalendarError {
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    pub fn event<S: Into<String>>(msg: S) -> Self {
        Self::Event(msg.into())
    }

    /// Wraps an error the way `import_from_feed` surfaces it to callers,
    /// keeping the inner message text intact.
    pub fn import(inner: CalendarError) -> Self {
        Self::Import(Box::new(inner))
    }

    /// True when the error is recoverable at the per-event level and must
    /// never cross the engine boundary.
    pub fn is_per_event(&self) -> bool {
        matches!(self, Self::Event(_))
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
