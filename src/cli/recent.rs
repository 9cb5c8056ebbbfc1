//! Default recent command - latest builds header and day-grouped history

use crate::cli::style::{self, Stylize, dot};
use anstream::println;
use chrono::{DateTime, Local, Utc};
use spectacles::config::Config;
use spectacles::error::Result;
use spectacles::store::BuildStore;
use spectacles::timeline::HeaderSlot;
use spectacles::types::DetectedBuild;
use spectacles::view::{DayView, RecentBuilds, TimelineEntry, format_distance, load_recent_builds};

/// Entries printed per line before wrapping
const ENTRIES_PER_LINE: usize = 8;

/// Header labels are padded to this width so build numbers line up
const LABEL_WIDTH: usize = 14;

/// Run the recent command (default when no subcommand given)
pub async fn run_recent(
    store: &dyn BuildStore,
    config: &Config,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let window = days.map_or_else(
        || config.window(),
        |days| chrono::Duration::days(i64::from(days.max(1))),
    );
    let now = Utc::now();

    let recent = load_recent_builds(store, window, now, &Local).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recent)?);
        return Ok(());
    }

    print_latest(&recent, now);
    println!();
    print_history(&recent, window.num_days());

    Ok(())
}

fn print_header_line(label: &str, tag: &str, detected: &DetectedBuild, now: DateTime<Utc>) {
    let local = detected.detected_at.with_timezone(&Local);
    let label = format!("{label:<LABEL_WIDTH$}");
    println!(
        "  {}{}   {} {} {}",
        label.branch(tag).emphasis(),
        detected.number().accent(),
        format!("detected {} ago", format_distance(detected.detected_at, now)).muted(),
        dot(),
        local.format("%a, %b %-d, %Y").muted()
    );
}

fn print_latest(recent: &RecentBuilds, now: DateTime<Utc>) {
    println!("{}", "Latest Builds".emphasis());
    println!();

    if recent.header.is_empty() {
        println!("  {}", "No builds detected yet".muted());
        println!(
            "  {}",
            "Record one with: spectacles record <branch> <number> <hash>".muted()
        );
        return;
    }

    for slot in &recent.header {
        match slot {
            HeaderSlot::Dual { detected } => {
                print_header_line("Canary & PTB", "collapsed", detected, now);
            }
            HeaderSlot::Branch { branch, detected } => {
                print_header_line(branch.humanized(), branch.as_str(), detected, now);
            }
        }
    }
}

fn render_entry(entry: &TimelineEntry) -> String {
    let number = entry.entry.number();
    let tag = entry.entry.branch_tag();

    if entry.is_current {
        format!("{}{}", style::CURRENT.branch(tag), number.branch(tag).highlighted())
    } else {
        format!(" {}", number.branch(tag))
    }
}

fn print_day(day: &DayView) {
    println!(
        "{}  {}",
        day.day.format("%a, %b %-d").emphasis(),
        format!(
            "{} build{}",
            day.build_count,
            if day.build_count == 1 { "" } else { "s" }
        )
        .muted()
    );

    for line in day.entries.chunks(ENTRIES_PER_LINE) {
        let rendered: Vec<String> = line.iter().map(render_entry).collect();
        println!("  {}", rendered.join(" "));
    }
    println!();
}

fn print_history(recent: &RecentBuilds, window_days: i64) {
    println!(
        "{}",
        format!(
            "Last {} Day{} of Builds",
            window_days,
            if window_days == 1 { "" } else { "s" }
        )
        .emphasis()
    );
    println!();

    if recent.days.is_empty() {
        println!("  {}", "Nothing detected in this window".muted());
        println!();
        return;
    }

    for day in &recent.days {
        print_day(day);
    }

    println!(
        "{}",
        format!(
            "Legend: {} canary, {} ptb, {} stable, {} canary & ptb, {} = live now",
            "■".branch("canary"),
            "■".branch("ptb"),
            "■".branch("stable"),
            "■".branch("collapsed"),
            style::CURRENT
        )
        .muted()
    );
}
