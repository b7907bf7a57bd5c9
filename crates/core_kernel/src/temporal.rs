//! Time windows for policy coverage
//!
//! A policy covers incidents inside a half-open window `[effective, expiry)`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before end {end}")]
    InvalidPeriod { start: String, end: String },

    #[error("Duration out of range: {0} days")]
    DurationOutOfRange(u32),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

/// Converts host-supplied unix seconds into a UTC timestamp
pub fn from_unix_seconds(seconds: i64) -> Result<DateTime<Utc>, TemporalError> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or(TemporalError::TimestampOutOfRange(seconds))
}

/// A bounded validity window, start inclusive and end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ValidPeriod {
    /// Creates a new valid period
    pub fn bounded(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start >= end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a period of `days` whole days beginning at `start`
    pub fn for_days(start: DateTime<Utc>, days: u32) -> Result<Self, TemporalError> {
        if days == 0 {
            return Err(TemporalError::DurationOutOfRange(days));
        }
        let end = start
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or(TemporalError::DurationOutOfRange(days))?;
        Self::bounded(start, end)
    }

    /// Returns true if this period contains the given timestamp
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Returns true once `timestamp` has reached the end of the period
    pub fn has_ended(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
