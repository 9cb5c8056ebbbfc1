//! Calendar-day grouping

use crate::types::DetectedBuild;
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

/// A contiguous run of detections sharing a calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarBucket {
    /// The shared date
    pub day: NaiveDate,
    /// Detections on that date, in input order
    pub entries: Vec<DetectedBuild>,
}

/// Group detections into calendar-day buckets
///
/// Dates are taken in `tz`. The input is expected newest-first and is not
/// re-sorted: a new bucket starts whenever the date differs from the previous
/// entry's, so buckets follow first-occurrence order.
pub fn bucket_by_day<Tz: TimeZone>(entries: &[DetectedBuild], tz: &Tz) -> Vec<CalendarBucket> {
    let day_of = |entry: &DetectedBuild| entry.detected_at.with_timezone(tz).date_naive();

    let Some(first) = entries.first() else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut current_day = day_of(first);
    let mut current: Vec<DetectedBuild> = Vec::new();

    for entry in entries {
        let day = day_of(entry);
        if day != current_day {
            buckets.push(CalendarBucket {
                day: current_day,
                entries: std::mem::take(&mut current),
            });
            current_day = day;
        }
        current.push(entry.clone());
    }

    buckets.push(CalendarBucket {
        day: current_day,
        entries: current,
    });

    buckets
}
