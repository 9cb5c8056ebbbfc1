//! Recent builds: the latest build per branch plus a day-by-day history

use crate::error::Result;
use crate::store::BuildStore;
use crate::timeline::{
    CalendarBucket, CollapsedEntry, HeaderSlot, LatestBuilds, TWIN_BRANCHES, bucket_by_day,
    collapse, is_current, latest_header,
};
use crate::types::APP_BRANCHES;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

/// A timeline entry with its highlight flag resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// The (possibly collapsed) entry
    pub entry: CollapsedEntry,
    /// Whether this build is live on its branch right now
    pub is_current: bool,
}

/// One calendar day of history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    /// The day
    pub day: NaiveDate,
    /// Detections on this day, before collapsing
    pub build_count: usize,
    /// Entries after collapsing twins (newest first)
    pub entries: Vec<TimelineEntry>,
}

/// Everything the recent builds page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentBuilds {
    /// Latest detection per app branch
    pub latest: LatestBuilds,
    /// Header badges derived from `latest`
    pub header: Vec<HeaderSlot>,
    /// History grouped by day (newest first)
    pub days: Vec<DayView>,
}

/// Fetch the latest detection on every app branch
pub async fn fetch_latest_builds(store: &dyn BuildStore) -> Result<LatestBuilds> {
    let mut latest = LatestBuilds::new();

    for branch in APP_BRANCHES {
        match store.latest_build_on_branch(branch).await? {
            Some(detected) => latest.insert(branch, detected),
            None => debug!("No detections on {branch} yet"),
        }
    }

    Ok(latest)
}

fn day_view(bucket: CalendarBucket, latest: &LatestBuilds) -> DayView {
    let entries = collapse(&TWIN_BRANCHES, &bucket.entries)
        .into_iter()
        .map(|entry| TimelineEntry {
            is_current: is_current(&entry, latest),
            entry,
        })
        .collect();

    DayView {
        day: bucket.day,
        build_count: bucket.entries.len(),
        entries,
    }
}

/// Load the recent builds view
///
/// The latest-per-branch lookups and the history window are independent, so
/// they are fetched concurrently. History covers `window` before `now`, and
/// days are taken in `tz`.
pub async fn load_recent_builds<Tz: TimeZone>(
    store: &dyn BuildStore,
    window: Duration,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<RecentBuilds> {
    let since = now - window;

    let (latest, history) =
        tokio::try_join!(fetch_latest_builds(store), store.detections_since(since))?;

    debug!(
        "Loaded {} detections since {} ({} branches with a latest build)",
        history.len(),
        since,
        APP_BRANCHES
            .iter()
            .filter(|branch| latest.get(**branch).is_some())
            .count()
    );

    let days = bucket_by_day(&history, tz)
        .into_iter()
        .map(|bucket| day_view(bucket, &latest))
        .collect();

    Ok(RecentBuilds {
        header: latest_header(&latest),
        latest,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Branch, Build, DetectedBuild};
    use chrono::TimeZone;

    fn make_detected(branch: Branch, number: u32, hour: u32) -> DetectedBuild {
        DetectedBuild {
            build: Build {
                id: format!("build_{number}"),
                number,
            },
            branch: branch.into(),
            detected_at: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_day_view_counts_before_collapsing() {
        let bucket = CalendarBucket {
            day: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            entries: vec![
                make_detected(Branch::Ptb, 8, 3),
                make_detected(Branch::Canary, 8, 2),
                make_detected(Branch::Stable, 7, 1),
            ],
        };
        let latest: LatestBuilds = [
            (Branch::Canary, make_detected(Branch::Canary, 8, 2)),
            (Branch::Ptb, make_detected(Branch::Ptb, 8, 3)),
            (Branch::Stable, make_detected(Branch::Stable, 6, 0)),
        ]
        .into_iter()
        .collect();

        let view = day_view(bucket, &latest);

        assert_eq!(view.build_count, 3);
        assert_eq!(view.entries.len(), 2);
        assert!(view.entries[0].entry.is_collapsed());
        assert!(view.entries[0].is_current);
        assert!(!view.entries[1].is_current);
    }
}
