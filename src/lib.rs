//! spectacles - Discord build rollout tracking
//!
//! Turns a log of "build X was detected on branch Y at time T" into the views
//! a human wants to read: which builds are live right now, and what rolled out
//! over the last few days, grouped by calendar day with canary/PTB twins merged.
//!
//! The pure timeline logic lives in [`timeline`] and never touches storage.
//! [`store`] provides the data access it is fed from, and [`view`] composes the
//! two into request-scoped results.

pub mod config;
pub mod error;
pub mod store;
pub mod timeline;
pub mod types;
pub mod view;
