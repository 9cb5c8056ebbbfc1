//! Build storage
//!
//! Data access for detections, builds and assets. The timeline components
//! never see this layer; request handlers in [`crate::view`] fetch through a
//! [`BuildStore`] and hand decoded values over.

mod lookup;
mod sqlite;

pub use lookup::BuildLookup;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::{Asset, Branch, BranchTag, Build, DetectedBuild, Detection};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Read access to the detection log
///
/// Implementations are handed to request handlers explicitly; there is no
/// process-wide connection.
#[async_trait]
pub trait BuildStore: Send + Sync {
    /// Most recent detection on a branch
    ///
    /// Ties on `detected_at` go to the most recently recorded detection.
    async fn latest_build_on_branch(&self, branch: Branch) -> Result<Option<DetectedBuild>>;

    /// ID of the most recent build on each branch that has one
    async fn latest_build_ids(&self) -> Result<HashMap<Branch, String>>;

    /// Detections strictly after `since`, newest first
    async fn detections_since(&self, since: DateTime<Utc>) -> Result<Vec<DetectedBuild>>;

    /// The last build detected on a branch before an instant
    async fn find_previous_build(
        &self,
        branch: &BranchTag,
        before: DateTime<Utc>,
    ) -> Result<Option<Build>>;

    /// Every time a build was detected, on any branch
    async fn fetch_detections(&self, build_id: &str) -> Result<Vec<Detection>>;

    /// Look a build up by number or ID
    async fn fetch_build(&self, lookup: &BuildLookup) -> Result<Option<Build>>;

    /// Assets belonging to a build
    async fn fetch_build_assets(&self, build_id: &str) -> Result<Vec<Asset>>;
}
