use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error as ThisError;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

///
/// TimestampError
///

#[derive(Debug, ThisError)]
pub enum TimestampError {
    #[error("timestamp parse error: {0}")]
    Parse(String),

    #[error("timestamp before epoch")]
    BeforeEpoch,
}

///
/// Timestamp
/// (in seconds)
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);
    pub const MIN: Self = Self(u64::MIN);
    pub const MAX: Self = Self(u64::MAX);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    /// Construct from milliseconds (truncate to seconds).
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms / 1_000)
    }

    /// Current wall-clock time in whole seconds.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());

        Self(secs)
    }

    #[must_use]
    pub const fn as_seconds(&self) -> u64 {
        self.0
    }

    #[allow(clippy::cast_sign_loss)]
    pub fn parse_rfc3339(s: &str) -> Result<Self, TimestampError> {
        let dt = OffsetDateTime::parse(s, &Rfc3339)
            .map_err(|e| TimestampError::Parse(e.to_string()))?;
        let ts = dt.unix_timestamp();
        if ts < 0 {
            return Err(TimestampError::BeforeEpoch);
        }

        Ok(Self(ts as u64))
    }

    /// Render as RFC3339; saturates to the epoch when the value is not
    /// representable by the formatter.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_rfc3339(&self) -> String {
        OffsetDateTime::from_unix_timestamp(self.0 as i64)
            .ok()
            .and_then(|dt| dt.format(&Rfc3339).ok())
            .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string())
    }
}

///
/// TESTS
///
