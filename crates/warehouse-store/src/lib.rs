//! File-backed object cache for the Warehouse system.
//!
//! This crate implements a local key-value persistence layer that
//! serializes structured [`Value`](warehouse_types::Value) trees to
//! individual JSON files, one file per key, under two retention tiers
//! (permanent and volatile). Entries may carry an expiry timestamp that is
//! evaluated lazily: nothing scans for stale data, but an existence check
//! on a past-due entry deletes it.
//!
//! # Modules
//!
//! - [`error`] — [`StoreError`] and the `StoreResult` alias
//! - [`paths`] — The injected [`PathProvider`] capability and path layout
//! - [`envelope`] — The on-disk [`Envelope`] codec (current JSON format
//!   plus a read-only legacy keyed format)
//! - [`warehouse`] — The [`Warehouse`] handle: writer, loader, expiry
//!   evaluator, typed extractors, removal
//! - [`diagnostics`] — Optional hook observing swallowed failures
//!
//! # Design Rules
//!
//! 1. Availability first: every failure degrades to "no data" (`None`,
//!    `false`, no-op) instead of propagating. The [`DiagnosticHook`] and
//!    [`Warehouse::try_write`] are the opt-in channels that expose causes.
//! 2. Writes are atomic replaces (temp file + rename); a reader never
//!    observes a torn file.
//! 3. Concurrent writers to one key: last rename wins. No merge, no
//!    conflict detection, and read-after-write visibility is not
//!    guaranteed under races. This is the provided consistency model, not
//!    a defect.
//! 4. Expired data is purged only by [`Warehouse::exists`]; plain loads
//!    return whatever is on disk.
//! 5. Legacy-format files are readable forever but never upgraded in
//!    place; only a fresh write produces the current format.

pub mod diagnostics;
pub mod envelope;
pub mod error;
pub mod paths;
pub mod warehouse;

pub use diagnostics::DiagnosticHook;
pub use envelope::Envelope;
pub use error::{StoreError, StoreResult};
pub use paths::{FixedPaths, PathProvider, PlatformPaths, NAMESPACE};
pub use warehouse::{keys, remove_tier, Warehouse};
