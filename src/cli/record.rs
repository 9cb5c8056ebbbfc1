//! Record command - store a detection by hand

use crate::cli::style::{Stylize, check};
use anstream::println;
use chrono::{DateTime, Local, Utc};
use spectacles::error::Result;
use spectacles::store::SqliteStore;
use spectacles::types::{Branch, Build};

/// Run the record command
pub async fn run_record(
    store: &SqliteStore,
    branch: Branch,
    number: u32,
    id: String,
    detected_at: DateTime<Utc>,
) -> Result<()> {
    let build = Build { id, number };
    store
        .record_deploy(&build, &branch.into(), detected_at)
        .await?;

    println!(
        "{} {} {} on {}",
        check(),
        "Recorded build".success(),
        number.accent(),
        branch.humanized().branch(branch.as_str())
    );
    println!(
        "  {}",
        detected_at
            .with_timezone(&Local)
            .format("%a, %b %-d, %Y %H:%M")
            .muted()
    );

    Ok(())
}
