use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch, by the wall clock.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// When a written entry stops being valid.
///
/// A policy is resolved to an optional absolute timestamp at write time;
/// whether the entry has actually expired is evaluated lazily against the
/// wall clock whenever existence is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryPolicy {
    /// The entry never expires.
    Never,
    /// The entry expires this long after the write.
    After(Duration),
    /// The entry expires at an absolute Unix timestamp (seconds).
    At(u64),
}

impl ExpiryPolicy {
    /// Resolve to an absolute Unix timestamp, `None` meaning "never".
    pub fn resolve(&self) -> Option<u64> {
        match self {
            Self::Never => None,
            Self::After(ttl) => Some(unix_now().saturating_add(ttl.as_secs())),
            Self::At(timestamp) => Some(*timestamp),
        }
    }
}
