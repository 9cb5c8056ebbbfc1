//! In-memory build store for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use spectacles::error::{Error, Result};
use spectacles::store::{BuildLookup, BuildStore};
use spectacles::types::{Asset, Branch, BranchTag, Build, DetectedBuild, Detection};
use std::collections::HashMap;
use std::sync::Mutex;

/// Simple mock build store for testing
///
/// Answers queries from an in-memory detection log with the same ordering
/// rules as the SQLite store: newest first, later insertions winning ties.
///
/// Features:
/// - Detection log and per-build assets
/// - Call tracking for verification
/// - Error injection for failure path testing
#[derive(Default)]
pub struct MockBuildStore {
    log: Mutex<Vec<DetectedBuild>>,
    assets: Mutex<HashMap<String, Vec<Asset>>>,
    // Call tracking
    calls: Mutex<Vec<String>>,
    previous_calls: Mutex<Vec<(String, DateTime<Utc>)>>,
    // Error injection
    error_on_history: Mutex<Option<String>>,
    error_on_latest: Mutex<Option<String>>,
    error_on_assets: Mutex<Option<String>>,
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::Io(std::io::Error::other(msg.clone()))),
        None => Ok(()),
    }
}

impl MockBuildStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given detections, in recording order
    pub fn with_detections(detections: impl IntoIterator<Item = DetectedBuild>) -> Self {
        let store = Self::new();
        for detected in detections {
            store.push(detected);
        }
        store
    }

    /// Record a detection
    pub fn push(&self, detected: DetectedBuild) {
        self.log.lock().unwrap().push(detected);
    }

    /// Attach assets to a build
    pub fn set_assets(&self, build_id: &str, assets: Vec<Asset>) {
        self.assets
            .lock()
            .unwrap()
            .insert(build_id.to_string(), assets);
    }

    // === Error injection methods ===

    /// Make `detections_since` return an error
    pub fn fail_history(&self, msg: &str) {
        *self.error_on_history.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `latest_build_on_branch` and `latest_build_ids` return an error
    pub fn fail_latest(&self, msg: &str) {
        *self.error_on_latest.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `fetch_build_assets` return an error
    pub fn fail_assets(&self, msg: &str) {
        *self.error_on_assets.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Names of every trait method called, in order
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times a trait method was called
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| *call == method)
            .count()
    }

    /// Branch and instant of every `find_previous_build` call
    pub fn get_previous_calls(&self) -> Vec<(String, DateTime<Utc>)> {
        self.previous_calls.lock().unwrap().clone()
    }

    fn track(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }

    /// Log sorted newest first; stable sort over the reversed log puts later
    /// insertions first among equal timestamps
    fn newest_first(&self) -> Vec<DetectedBuild> {
        let mut log: Vec<DetectedBuild> = self.log.lock().unwrap().iter().rev().cloned().collect();
        log.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
        log
    }
}

#[async_trait]
impl BuildStore for MockBuildStore {
    async fn latest_build_on_branch(&self, branch: Branch) -> Result<Option<DetectedBuild>> {
        self.track("latest_build_on_branch");
        injected(&self.error_on_latest)?;
        Ok(self
            .newest_first()
            .into_iter()
            .find(|detected| detected.branch.known() == Some(branch)))
    }

    async fn latest_build_ids(&self) -> Result<HashMap<Branch, String>> {
        self.track("latest_build_ids");
        injected(&self.error_on_latest)?;
        let mut ids = HashMap::new();
        for detected in self.newest_first() {
            if let Some(branch) = detected.branch.known() {
                ids.entry(branch).or_insert(detected.build.id);
            }
        }
        Ok(ids)
    }

    async fn detections_since(&self, since: DateTime<Utc>) -> Result<Vec<DetectedBuild>> {
        self.track("detections_since");
        injected(&self.error_on_history)?;
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|detected| detected.detected_at > since)
            .collect())
    }

    async fn find_previous_build(
        &self,
        branch: &BranchTag,
        before: DateTime<Utc>,
    ) -> Result<Option<Build>> {
        self.track("find_previous_build");
        self.previous_calls
            .lock()
            .unwrap()
            .push((branch.as_str().to_string(), before));
        Ok(self
            .newest_first()
            .into_iter()
            .find(|detected| detected.branch == *branch && detected.detected_at < before)
            .map(|detected| detected.build))
    }

    async fn fetch_detections(&self, build_id: &str) -> Result<Vec<Detection>> {
        self.track("fetch_detections");
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|detected| detected.build.id == build_id)
            .map(|detected| Detection {
                branch: detected.branch,
                detected_at: detected.detected_at,
            })
            .collect())
    }

    async fn fetch_build(&self, lookup: &BuildLookup) -> Result<Option<Build>> {
        self.track("fetch_build");
        Ok(self
            .log
            .lock()
            .unwrap()
            .iter()
            .map(|detected| &detected.build)
            .find(|build| match lookup {
                BuildLookup::Number(number) => u64::from(build.number) == *number,
                BuildLookup::Id(id) => build.id == *id,
            })
            .cloned())
    }

    async fn fetch_build_assets(&self, build_id: &str) -> Result<Vec<Asset>> {
        self.track("fetch_build_assets");
        injected(&self.error_on_assets)?;
        let mut assets = self
            .assets
            .lock()
            .unwrap()
            .get(build_id)
            .cloned()
            .unwrap_or_default();
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assets)
    }
}
