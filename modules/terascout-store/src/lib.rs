//! Scout State Store — per-scout isolated persistence.
//!
//! Every table is keyed first by `scout_id`; every query is scoped by it.
//! This is how "one logical instance per scout, strictly isolated" is
//! realized on a single shared Postgres pool rather than a database per
//! scout (see `rootsignal-events`' single global `EventStore` for the
//! un-partitioned ancestor of this design).

mod error;
mod locks;
mod migrate;
mod store;

pub use error::StoreError;
pub use locks::ScoutLocks;
pub use migrate::migrate;
pub use store::ScoutStore;
