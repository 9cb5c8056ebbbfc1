//! Latest build resolution
//!
//! Answers "what is live right now" questions against a snapshot of the most
//! recent detection on each branch.

use crate::timeline::CollapsedEntry;
use crate::types::{Branch, Build, DetectedBuild};
use serde::Serialize;
use std::collections::HashMap;

/// Most recent detection per branch
///
/// Branches that have never been detected are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LatestBuilds(HashMap<Branch, DetectedBuild>);

impl LatestBuilds {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest detection for a branch
    pub fn insert(&mut self, branch: Branch, detected: DetectedBuild) {
        self.0.insert(branch, detected);
    }

    /// Latest detection on a branch
    pub fn get(&self, branch: Branch) -> Option<&DetectedBuild> {
        self.0.get(&branch)
    }

    /// Latest build number on a branch
    pub fn number(&self, branch: Branch) -> Option<u32> {
        self.get(branch).map(DetectedBuild::number)
    }

    /// Whether no branch has a detection
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Branch, DetectedBuild)> for LatestBuilds {
    fn from_iter<I: IntoIterator<Item = (Branch, DetectedBuild)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whether canary and PTB currently carry the same build
pub fn is_dual_lockstep(latest: &LatestBuilds) -> bool {
    matches!(
        (latest.number(Branch::Canary), latest.number(Branch::Ptb)),
        (Some(canary), Some(ptb)) if canary == ptb
    )
}

/// Whether a timeline entry is the build presently live on its branch
///
/// A collapsed entry is current only when both twins carry its number.
pub fn is_current(entry: &CollapsedEntry, latest: &LatestBuilds) -> bool {
    let number = entry.number();

    match entry {
        CollapsedEntry::Single(detected) => detected
            .branch
            .known()
            .is_some_and(|branch| latest.number(branch) == Some(number)),
        CollapsedEntry::Collapsed { .. } => {
            latest.number(Branch::Ptb) == Some(number)
                && latest.number(Branch::Canary) == Some(number)
        }
    }
}

/// One badge in the "latest builds" header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "slot", rename_all = "lowercase")]
pub enum HeaderSlot {
    /// Canary and PTB share a build
    Dual {
        /// The shared detection (canary's)
        detected: DetectedBuild,
    },
    /// A single branch
    Branch {
        /// Branch shown
        branch: Branch,
        /// Its latest detection
        detected: DetectedBuild,
    },
}

/// Lay out the header badges for the latest builds
///
/// Canary and PTB are folded into one dual badge when in lockstep. Branches
/// without a detection are left out.
pub fn latest_header(latest: &LatestBuilds) -> Vec<HeaderSlot> {
    let mut slots = Vec::new();

    let single = |branch: Branch| {
        latest.get(branch).map(|detected| HeaderSlot::Branch {
            branch,
            detected: detected.clone(),
        })
    };

    if is_dual_lockstep(latest) {
        if let Some(canary) = latest.get(Branch::Canary) {
            slots.push(HeaderSlot::Dual {
                detected: canary.clone(),
            });
        }
    } else {
        slots.extend(single(Branch::Canary));
        slots.extend(single(Branch::Ptb));
    }
    slots.extend(single(Branch::Stable));

    slots
}

/// Where a build is currently live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Live on both canary and PTB
    Dual,
    /// Live on a single branch
    Branch(Branch),
}

/// Determine which branch, if any, a build is currently live on
///
/// `latest_ids` maps each branch to the ID of its latest build.
pub fn appearance(build: &Build, latest_ids: &HashMap<Branch, String>) -> Option<Appearance> {
    let carries = |branch: Branch| latest_ids.get(&branch).is_some_and(|id| *id == build.id);

    if carries(Branch::Canary) && carries(Branch::Ptb) {
        return Some(Appearance::Dual);
    }

    Branch::ALL
        .into_iter()
        .find(|branch| carries(*branch))
        .map(Appearance::Branch)
}
