//! Request-scoped views
//!
//! Each view fetches what it needs from a [`BuildStore`](crate::store::BuildStore),
//! runs the timeline components over the snapshot, and returns a plain,
//! serializable structure for rendering:
//! 1. Recent builds - latest per branch and the day-grouped history
//! 2. Build details - one build's detections, predecessors and assets

mod details;
mod distance;
mod recent;

pub use details::{BuildDetails, DetectionWithPrevious, load_build_details};
pub use distance::format_distance;
pub use recent::{DayView, RecentBuilds, TimelineEntry, fetch_latest_builds, load_recent_builds};
