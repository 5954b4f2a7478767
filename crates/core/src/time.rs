// Offset-shifted time snapshots reported by the MCP `get_current_time` tool

use crate::error::{TimeError, TimeResult};
use crate::types::DATE_FORMAT;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// The current instant shifted by a whole number of hours
///
/// All three fields describe the same shifted instant. `time_iso` keeps the
/// `Z` suffix even though the value has been moved off UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSnapshot {
    pub time_millis: i64,
    pub time_iso: String,
    pub time_gmt_offset: String,
}

impl TimeSnapshot {
    pub fn at(now: DateTime<Utc>, offset_hours: i32) -> TimeResult<Self> {
        if !(-23..=23).contains(&offset_hours) {
            return Err(TimeError::InvalidOffset(offset_hours));
        }

        let shifted = now
            .checked_add_signed(Duration::hours(i64::from(offset_hours)))
            .ok_or(TimeError::OutOfRange)?;

        Ok(Self {
            time_millis: shifted.timestamp_millis(),
            time_iso: shifted.to_rfc3339_opts(SecondsFormat::Millis, true),
            time_gmt_offset: shifted.format(DATE_FORMAT).to_string(),
        })
    }
}
