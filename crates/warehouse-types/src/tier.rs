use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Retention class for a stored entry.
///
/// The tier selects the base directory only; read and write semantics are
/// identical across tiers. `Permanent` entries live under the platform's
/// documents location, `Volatile` entries under the purgeable cache
/// location, where the operating system may reclaim them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Permanent,
    Volatile,
}

impl Tier {
    /// Both tiers, in a fixed order.
    pub const ALL: [Tier; 2] = [Tier::Permanent, Tier::Volatile];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::Volatile => write!(f, "volatile"),
        }
    }
}

/// Error parsing a [`Tier`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tier `{0}` (expected `permanent` or `volatile`)")]
pub struct ParseTierError(String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permanent" => Ok(Self::Permanent),
            "volatile" => Ok(Self::Volatile),
            other => Err(ParseTierError(other.to_owned())),
        }
    }
}
