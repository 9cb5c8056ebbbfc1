//! Twin-branch collapsing
//!
//! Canary and PTB frequently receive the same build back to back. In a
//! timeline those two detections read better as a single entry.

use crate::types::{Branch, BranchTag, Build, DetectedBuild};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Branches whose adjacent detections of the same build are merged
pub const TWIN_BRANCHES: [Branch; 2] = [Branch::Ptb, Branch::Canary];

/// Pseudo-branch tag carried by a collapsed entry
pub const COLLAPSED_TAG: &str = "collapsed";

/// A timeline entry after collapsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CollapsedEntry {
    /// An untouched detection
    Single(DetectedBuild),
    /// Two adjacent twin-branch detections of the same build
    Collapsed {
        /// Build of the first detection of the pair
        build: Build,
        /// Timestamp of the first detection of the pair
        detected_at: DateTime<Utc>,
    },
}

impl CollapsedEntry {
    /// The build this entry displays
    pub const fn build(&self) -> &Build {
        match self {
            Self::Single(detected) => &detected.build,
            Self::Collapsed { build, .. } => build,
        }
    }

    /// Build number shortcut
    pub const fn number(&self) -> u32 {
        self.build().number
    }

    /// Detection timestamp
    pub const fn detected_at(&self) -> DateTime<Utc> {
        match self {
            Self::Single(detected) => detected.detected_at,
            Self::Collapsed { detected_at, .. } => *detected_at,
        }
    }

    /// Branch tag for styling; `"collapsed"` for merged entries
    pub fn branch_tag(&self) -> &str {
        match self {
            Self::Single(detected) => detected.branch.as_str(),
            Self::Collapsed { .. } => COLLAPSED_TAG,
        }
    }

    /// Whether this entry merges two detections
    pub const fn is_collapsed(&self) -> bool {
        matches!(self, Self::Collapsed { .. })
    }
}

fn is_member(collapsible: &[Branch], tag: &BranchTag) -> bool {
    tag.known().is_some_and(|branch| collapsible.contains(&branch))
}

fn collapsible_pair(collapsible: &[Branch], first: &DetectedBuild, second: &DetectedBuild) -> bool {
    is_member(collapsible, &first.branch)
        && is_member(collapsible, &second.branch)
        && first.number() == second.number()
}

/// Merge adjacent detections of the same build on collapsible branches
///
/// Only strictly adjacent pairs are considered: a run of three equal numbers
/// collapses the first two, and a pair split by any other entry is left alone.
/// The input order is preserved and nothing is dropped.
pub fn collapse(collapsible: &[Branch], entries: &[DetectedBuild]) -> Vec<CollapsedEntry> {
    let mut collapsed = Vec::with_capacity(entries.len());
    let mut index = 0;

    while index < entries.len() {
        let entry = &entries[index];

        match entries.get(index + 1) {
            Some(next) if collapsible_pair(collapsible, entry, next) => {
                collapsed.push(CollapsedEntry::Collapsed {
                    build: entry.build.clone(),
                    detected_at: entry.detected_at,
                });
                index += 2;
            }
            _ => {
                collapsed.push(CollapsedEntry::Single(entry.clone()));
                index += 1;
            }
        }
    }

    collapsed
}
