//! Course progression rules.
//!
//! Everything here is pure: functions take the catalog and a `ProgressState`
//! and return a verdict or a new state. Persistence and event wiring live in
//! the services crate.

mod aggregate;
mod cascade;
mod lock;
mod mutate;

pub use aggregate::{ItemCounts, counts, percentage};
pub use cascade::{all_items_unlocked, reconcile};
pub use lock::{ItemStatus, is_locked, is_unlocked, status};
pub use mutate::complete_item;

#[cfg(test)]
mod properties;
