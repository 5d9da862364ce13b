//! Foundation types for the Warehouse object cache.
//!
//! This crate provides the value model, retention tiers, and expiry
//! policies used throughout the Warehouse system. Every other warehouse
//! crate depends on `warehouse-types`.
//!
//! # Key Types
//!
//! - [`Value`] — Tagged union over null/bool/int/float/string/array/object;
//!   the canonical in-memory form of anything stored or loaded
//! - [`FromValue`] — Exact-match conversion from a [`Value`] to a Rust
//!   primitive, with no cross-type coercion
//! - [`Tier`] — Retention class (Permanent or Volatile) selecting a storage
//!   location
//! - [`ExpiryPolicy`] — When a written entry stops being valid

pub mod error;
pub mod expiry;
pub mod tier;
pub mod value;

pub use error::ValueError;
pub use expiry::{unix_now, ExpiryPolicy};
pub use tier::{ParseTierError, Tier};
pub use value::{FromValue, Value};
