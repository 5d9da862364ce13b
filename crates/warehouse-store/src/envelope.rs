use serde::{Deserialize, Serialize};
use tracing::debug;

use warehouse_types::Value;

/// The on-disk unit: a value paired with its optional expiry timestamp.
///
/// Current format (UTF-8 JSON, compact):
/// ```text
/// { "expires": <unix seconds, optional>, "storage": <any JSON value> }
/// ```
///
/// A missing `expires` means the entry never expires; entries written
/// before expiry support existed have no such field and must stay valid.
/// Unknown fields are ignored on read. Files in the legacy keyed format (a
/// TOML table carrying the same two logical keys) are read but never
/// produced — a legacy file is upgraded only when its key is next written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unix timestamp (seconds) after which the entry is invalid.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "expires_from_number"
    )]
    pub expires: Option<u64>,
    /// The stored value tree.
    pub storage: Value,
}

/// Older builds wrote fractional timestamps; accept any number and keep
/// whole seconds.
fn expires_from_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|secs| secs as u64))
}

impl Envelope {
    /// Wrap a value that never expires (in-memory contexts, legacy data
    /// without a timestamp).
    pub fn never(storage: Value) -> Self {
        Self {
            expires: None,
            storage,
        }
    }

    /// Whether the entry is past due at `now` (Unix seconds).
    ///
    /// A missing timestamp never expires; a present one is invalid from
    /// the exact moment it is reached.
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires.is_some_and(|t| t <= now)
    }

    /// Decode file contents, trying the legacy keyed format first, then
    /// the current JSON envelope.
    ///
    /// `None` on any mismatch: a missing `storage` key, a non-envelope
    /// JSON shape, or content in neither format is a cache miss, not an
    /// error.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        Self::from_legacy(text).or_else(|| Self::from_current(text))
    }

    fn from_current(text: &str) -> Option<Self> {
        match serde_json::from_str::<Envelope>(text) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                debug!(error = %e, "not a current-format envelope");
                None
            }
        }
    }

    fn from_legacy(text: &str) -> Option<Self> {
        let table: toml::Table = text.parse().ok()?;
        let storage = convert_toml(table.get("storage")?.clone());
        let expires = table.get("expires").and_then(toml_secs);
        Some(Self { expires, storage })
    }
}

fn toml_secs(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(n) => Some((*n).max(0) as u64),
        toml::Value::Float(f) => Some(*f as u64),
        _ => None,
    }
}

/// Map a legacy TOML value into the value model. TOML cannot express
/// null; datetimes carry over in their text form.
fn convert_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(n) => Value::Int(n),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(convert_toml).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, convert_toml(v)))
                .collect(),
        ),
    }
}
