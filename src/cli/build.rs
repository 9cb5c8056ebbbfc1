//! Build command - where and when a single build was detected

use crate::cli::style::{self, Stream, Stylize, arrow, cross, dot};
use anstream::{eprintln, println};
use chrono::Local;
use spectacles::config::Config;
use spectacles::error::Result;
use spectacles::store::{BuildLookup, BuildStore};
use spectacles::timeline::Appearance;
use spectacles::view::{BuildDetails, DetectionWithPrevious, load_build_details};

/// Run the build command
///
/// Returns `Ok(false)` when no build matches `key`.
pub async fn run_build(
    store: &dyn BuildStore,
    config: &Config,
    key: &str,
    json: bool,
) -> Result<bool> {
    let lookup = BuildLookup::parse(key);

    let Some(details) = load_build_details(store, &lookup).await? else {
        eprintln!(
            "{} {}",
            cross(),
            format!("build not found: {lookup}").error()
        );
        eprintln!(
            "{}",
            "Pass a build number or the full build hash".muted().for_stderr()
        );
        return Ok(false);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(true);
    }

    print_header(&details);
    println!();
    print_detections(&details);
    println!();
    print_assets(&details, config)?;

    Ok(true)
}

fn print_header(details: &BuildDetails) {
    let (label, tag) = match details.appearance {
        Some(Appearance::Dual) => ("Canary & PTB", "collapsed"),
        Some(Appearance::Branch(branch)) => (branch.humanized(), branch.as_str()),
        None => ("Build", ""),
    };

    println!(
        "{} {}",
        label.branch(tag).emphasis(),
        details.build.number.accent().highlighted()
    );

    if let Some(first) = details.first_detected_at {
        println!(
            "  {}",
            format!(
                "first detected {}",
                first.with_timezone(&Local).format("%a, %b %-d, %Y %H:%M")
            )
            .muted()
        );
    }
    println!("  {} {}", "hash".muted(), details.build.id);
}

fn describe_detection(entry: &DetectionWithPrevious) -> String {
    match &entry.after_previous {
        Some(distance) => format!("{distance} after"),
        None => format!(
            "on {}",
            entry
                .detection
                .detected_at
                .with_timezone(&Local)
                .format("%b %-d, %Y")
        ),
    }
}

fn print_detections(details: &BuildDetails) {
    let heading = if details.multiple_detections {
        "Detections"
    } else {
        "Detection"
    };
    println!("{}", heading.emphasis());

    if details.detections.is_empty() {
        println!("  {}", "Never detected on a branch".muted());
        return;
    }

    for entry in &details.detections {
        let branch = &entry.detection.branch;
        let previous = entry
            .previous
            .as_ref()
            .map(|build| format!(" (from {})", build.number))
            .unwrap_or_default();

        println!(
            "  {} {} {} {}{}",
            style::DOT.branch(branch.as_str()),
            branch.humanized().branch(branch.as_str()),
            dot(),
            describe_detection(entry),
            previous.muted()
        );
    }
}

fn print_assets(details: &BuildDetails, config: &Config) -> Result<()> {
    println!("{}", "Assets".emphasis());

    if details.assets.is_empty() {
        println!("  {}", "No surface assets recorded".muted());
        return Ok(());
    }

    for asset in &details.assets {
        let url = config.asset_url(&asset.name)?;
        let kind = asset
            .surface_script_type
            .map(|kind| format!(" ({})", kind.as_str()))
            .unwrap_or_default();

        println!(
            "  {} {}{}",
            arrow(),
            style::hyperlink(Stream::Stdout, &asset.name, url.as_str()),
            kind.muted()
        );
    }

    Ok(())
}
