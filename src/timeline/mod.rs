//! Timeline derivation
//!
//! Pure functions that turn an ordered stream of detections into display
//! structures. Nothing here performs I/O or holds state between calls.

mod calendar;
mod collapse;
mod latest;

pub use calendar::{CalendarBucket, bucket_by_day};
pub use collapse::{COLLAPSED_TAG, CollapsedEntry, TWIN_BRANCHES, collapse};
pub use latest::{
    Appearance, HeaderSlot, LatestBuilds, appearance, is_current, is_dual_lockstep, latest_header,
};
