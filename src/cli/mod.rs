//! CLI commands
//!
//! Command implementations for the `spectacles` binary.

mod build;
mod recent;
mod record;
pub mod style;

pub use build::run_build;
pub use recent::run_recent;
pub use record::run_record;
