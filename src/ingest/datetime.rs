// ICS datetime resolution.
// DTSTART/DTEND values arrive as UTC, floating, TZID-qualified, or
// date-only; everything is normalized to UTC here.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use std::str::FromStr;

/// Resolve an ICS date-or-datetime to a UTC instant. Returns `None` when
/// the local interpretation is ambiguous (DST gaps) or invalid.
pub fn resolve_to_utc(value: &DatePerhapsTime) -> Option<DateTime<Utc>> {
    match value {
        DatePerhapsTime::DateTime(dt) => match dt {
            CalendarDateTime::Utc(utc) => Some(*utc),

            // No timezone specified: interpret as local system time
            CalendarDateTime::Floating(naive) => chrono::Local
                .from_local_datetime(naive)
                .single()
                .map(|local| local.with_timezone(&Utc)),

            CalendarDateTime::WithTimezone { date_time, tzid } => match chrono_tz::Tz::from_str(tzid) {
                Ok(tz) => tz
                    .from_local_datetime(date_time)
                    .single()
                    .map(|zoned| zoned.with_timezone(&Utc)),
                Err(_) => {
                    log::warn!("Unrecognized timezone '{}', treating as local time", tzid);
                    chrono::Local
                        .from_local_datetime(date_time)
                        .single()
                        .map(|local| local.with_timezone(&Utc))
                }
            },
        },

        // Date-only (typical for release feeds): midnight local time
        DatePerhapsTime::Date(date) => chrono::Local
            .with_ymd_and_hms(date.year(), date.month(), date.day(), 0, 0, 0)
            .single()
            .map(|local| local.with_timezone(&Utc)),
    }
}
