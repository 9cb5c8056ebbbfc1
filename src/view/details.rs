//! Build details: where a build went and when

use crate::error::Result;
use crate::store::{BuildLookup, BuildStore};
use crate::timeline::{Appearance, appearance};
use crate::types::{Asset, Build, Detection};
use crate::view::format_distance;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// A detection paired with the build it replaced on that branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionWithPrevious {
    /// The detection
    #[serde(flatten)]
    pub detection: Detection,
    /// Build that was on the branch just before, if any
    pub previous: Option<Build>,
    /// Humanized time since the preceding detection; `None` for the first
    pub after_previous: Option<String>,
}

/// Everything the build details page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDetails {
    /// The build
    pub build: Build,
    /// Branch(es) the build is live on right now
    pub appearance: Option<Appearance>,
    /// Earliest detection
    pub first_detected_at: Option<DateTime<Utc>>,
    /// Whether the build was detected more than once
    pub multiple_detections: bool,
    /// Detections, oldest first
    pub detections: Vec<DetectionWithPrevious>,
    /// Assets linked directly from the branch page
    pub assets: Vec<Asset>,
}

/// Load the details view for a build
///
/// Returns `Ok(None)` when no build matches the lookup.
pub async fn load_build_details(
    store: &dyn BuildStore,
    lookup: &BuildLookup,
) -> Result<Option<BuildDetails>> {
    let Some(build) = store.fetch_build(lookup).await? else {
        debug!("No build with {lookup}");
        return Ok(None);
    };

    let (latest_ids, mut detections, mut assets) = tokio::try_join!(
        store.latest_build_ids(),
        store.fetch_detections(&build.id),
        store.fetch_build_assets(&build.id)
    )?;

    detections.sort_by_key(|detection| detection.detected_at);
    assets.retain(|asset| asset.surface);

    let mut with_previous = Vec::with_capacity(detections.len());
    let mut last_seen: Option<DateTime<Utc>> = None;
    for detection in detections {
        let previous = store
            .find_previous_build(&detection.branch, detection.detected_at)
            .await?;
        let after_previous =
            last_seen.map(|earlier| format_distance(earlier, detection.detected_at));
        last_seen = Some(detection.detected_at);

        with_previous.push(DetectionWithPrevious {
            detection,
            previous,
            after_previous,
        });
    }

    debug!(
        "Build {} has {} detections and {} surface assets",
        build.number,
        with_previous.len(),
        assets.len()
    );

    Ok(Some(BuildDetails {
        appearance: appearance(&build, &latest_ids),
        first_detected_at: with_previous.first().map(|d| d.detection.detected_at),
        multiple_detections: with_previous.len() > 1,
        detections: with_previous,
        assets,
        build,
    }))
}
