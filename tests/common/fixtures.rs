//! Test data factories for spectacles types
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use spectacles::types::{Asset, Branch, BranchTag, Build, DetectedBuild, ScriptType};

/// Create a build whose ID is derived from its number
pub fn make_build(number: u32) -> Build {
    Build {
        id: format!("build_{number:x}"),
        number,
    }
}

/// UTC instant from calendar parts
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
}

/// Create a detection of `number` on a known branch
pub fn make_detected(branch: Branch, number: u32, detected_at: DateTime<Utc>) -> DetectedBuild {
    DetectedBuild {
        build: make_build(number),
        branch: BranchTag::Known(branch),
        detected_at,
    }
}

/// Create a detection carrying an unrecognized branch tag
pub fn make_detected_raw(tag: &str, number: u32, detected_at: DateTime<Utc>) -> DetectedBuild {
    DetectedBuild {
        build: make_build(number),
        branch: BranchTag::Raw(tag.to_string()),
        detected_at,
    }
}

/// Asset linked from the branch page
pub fn make_surface_asset(name: &str, script_type: ScriptType) -> Asset {
    Asset {
        name: name.to_string(),
        surface: true,
        surface_script_type: Some(script_type),
        script_chunk_id: None,
    }
}

/// Lazily loaded chunk
pub fn make_chunk_asset(name: &str, chunk_id: u32) -> Asset {
    Asset {
        name: name.to_string(),
        surface: false,
        surface_script_type: None,
        script_chunk_id: Some(chunk_id),
    }
}
