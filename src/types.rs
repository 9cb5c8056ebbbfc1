//! Core types for spectacles

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Discord release branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// Internal branch with no public frontend
    Development,
    /// Canary (earliest public branch)
    Canary,
    /// Public Test Build
    Ptb,
    /// Stable
    Stable,
}

/// Branches that have an accessible frontend, in display order
pub const APP_BRANCHES: [Branch; 3] = [Branch::Canary, Branch::Ptb, Branch::Stable];

impl Branch {
    /// Every branch, in declaration order
    pub const ALL: [Self; 4] = [Self::Development, Self::Canary, Self::Ptb, Self::Stable];

    /// Wire tag as stored in the database
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Canary => "canary",
            Self::Ptb => "ptb",
            Self::Stable => "stable",
        }
    }

    /// Label shown to humans
    pub const fn humanized(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Canary => "Canary",
            Self::Ptb => "PTB",
            Self::Stable => "Stable",
        }
    }

    /// Whether this branch has an accessible frontend
    pub const fn has_frontend(self) -> bool {
        !matches!(self, Self::Development)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Self::Development),
            "canary" => Ok(Self::Canary),
            "ptb" => Ok(Self::Ptb),
            "stable" => Ok(Self::Stable),
            _ => Err(Error::Parse(format!("unknown branch: {s}"))),
        }
    }
}

/// A branch column exactly as decoded from storage
///
/// Tags outside [`Branch`] are carried through untouched so that they can
/// still be displayed, just without a humanized label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BranchTag {
    /// A recognized branch
    Known(Branch),
    /// An unrecognized tag
    Raw(String),
}

impl BranchTag {
    /// The recognized branch, if any
    pub const fn known(&self) -> Option<Branch> {
        match self {
            Self::Known(branch) => Some(*branch),
            Self::Raw(_) => None,
        }
    }

    /// Raw tag string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(branch) => branch.as_str(),
            Self::Raw(tag) => tag,
        }
    }

    /// Humanized label, or the raw tag when unrecognized
    pub fn humanized(&self) -> &str {
        match self {
            Self::Known(branch) => branch.humanized(),
            Self::Raw(tag) => tag,
        }
    }
}

impl From<Branch> for BranchTag {
    fn from(branch: Branch) -> Self {
        Self::Known(branch)
    }
}

impl From<String> for BranchTag {
    fn from(tag: String) -> Self {
        tag.parse::<Branch>().map_or(Self::Raw(tag), Self::Known)
    }
}

impl From<BranchTag> for String {
    fn from(tag: BranchTag) -> Self {
        match tag {
            BranchTag::Known(branch) => branch.as_str().to_string(),
            BranchTag::Raw(tag) => tag,
        }
    }
}

impl fmt::Display for BranchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Discord frontend build
///
/// Both fields identify the same artifact; either can be used to look it up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Build {
    /// Build hash
    pub id: String,
    /// Build number
    pub number: u32,
}

/// An instance of a build being detected on a branch at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedBuild {
    /// The detected build
    #[serde(flatten)]
    pub build: Build,
    /// Branch it was detected on
    pub branch: BranchTag,
    /// When it was detected
    pub detected_at: DateTime<Utc>,
}

impl DetectedBuild {
    /// Build number shortcut
    pub const fn number(&self) -> u32 {
        self.build.number
    }
}

/// A single deploy of an already-known build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Branch the build was deployed to
    pub branch: BranchTag,
    /// When the deploy was detected
    pub detected_at: DateTime<Utc>,
}

/// Role a root script plays on the branch page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    /// Webpack chunk loader
    Chunkloader,
    /// CSS class mappings
    Classes,
    /// Vendor bundle
    Vendor,
    /// Application entrypoint
    Entrypoint,
}

impl ScriptType {
    /// Wire tag as stored in the database
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chunkloader => "chunkloader",
            Self::Classes => "classes",
            Self::Vendor => "vendor",
            Self::Entrypoint => "entrypoint",
        }
    }
}

impl FromStr for ScriptType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chunkloader" => Ok(Self::Chunkloader),
            "classes" => Ok(Self::Classes),
            "vendor" => Ok(Self::Vendor),
            "entrypoint" => Ok(Self::Entrypoint),
            _ => Err(Error::Parse(format!("unknown script type: {s}"))),
        }
    }
}

/// An asset referenced by a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// File name, relative to the assets root
    pub name: String,
    /// Whether the asset is linked directly from the branch page
    pub surface: bool,
    /// Script role, for surface scripts
    pub surface_script_type: Option<ScriptType>,
    /// Webpack chunk ID, for lazily loaded chunks
    pub script_chunk_id: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_roundtrips_through_wire_tag() {
        for branch in Branch::ALL {
            assert_eq!(branch.as_str().parse::<Branch>().unwrap(), branch);
        }
    }

    #[test]
    fn test_unknown_branch_tag_passes_through() {
        let tag = BranchTag::from("nightly".to_string());
        assert_eq!(tag, BranchTag::Raw("nightly".to_string()));
        assert_eq!(tag.humanized(), "nightly");
        assert!(tag.known().is_none());
    }

    #[test]
    fn test_known_branch_tag_is_humanized() {
        let tag = BranchTag::from("ptb".to_string());
        assert_eq!(tag.known(), Some(Branch::Ptb));
        assert_eq!(tag.humanized(), "PTB");
    }

    #[test]
    fn test_detected_build_serializes_flat() {
        let detected = DetectedBuild {
            build: Build {
                id: "abc".to_string(),
                number: 42,
            },
            branch: Branch::Canary.into(),
            detected_at: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let json = serde_json::to_value(&detected).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["number"], 42);
        assert_eq!(json["branch"], "canary");
    }

    #[test]
    fn test_development_has_no_frontend() {
        assert!(!Branch::Development.has_frontend());
        assert!(APP_BRANCHES.iter().all(|b| b.has_frontend()));
    }
}
