//! Store timestamp normalization.
//!
//! The document store has written dates in four different shapes over the
//! product's history: the native `{seconds, nanos}` timestamp object, a
//! bare `{seconds}` object, an ISO-8601 string, and a raw epoch number.
//! The loader accepts all four and materializes a single `DateTime<Utc>`;
//! the writer always emits the native shape.
//!
//! Use via `#[serde(with = "concepto_core::timestamp")]` on timestamp
//! fields of persisted types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A timestamp as it may appear in a stored document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    /// Store-native `{seconds, nanos}` object; `nanos` may be absent or
    /// spelled `nanoseconds` depending on the writer generation.
    Native {
        seconds: i64,
        #[serde(default, alias = "nanoseconds")]
        nanos: u32,
    },
    /// Raw epoch seconds.
    Epoch(f64),
    /// ISO-8601 / RFC 3339 string.
    Iso(String),
}

impl StoredTimestamp {
    /// Materialize into a UTC date, or `None` if the stored value is
    /// out of range or unparseable.
    pub fn materialize(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Native { seconds, nanos } => DateTime::from_timestamp(*seconds, *nanos),
            Self::Epoch(secs) if secs.is_finite() => {
                DateTime::from_timestamp_millis((secs * 1000.0) as i64)
            }
            Self::Epoch(_) => None,
            Self::Iso(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
        }
    }
}

impl From<DateTime<Utc>> for StoredTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Native {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }
}

/// Current wall-clock time.
#[inline]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Replace a missing or invalid date with "now" so the stored
/// representation is never corrupted.
#[inline]
pub fn repair(ts: Option<DateTime<Utc>>) -> DateTime<Utc> {
    ts.unwrap_or_else(Utc::now)
}

/// Serialize as the store-native `{seconds, nanos}` shape.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Native {
        seconds: i64,
        nanos: u32,
    }
    Native {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos(),
    }
    .serialize(serializer)
}

/// Deserialize any of the four stored shapes. An unreadable date falls
/// back to "now" rather than failing the whole document load.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = StoredTimestamp::deserialize(deserializer)?;
    Ok(repair(stored.materialize()))
}
