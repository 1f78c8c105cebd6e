// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session status tracking and transition logic.
//!
//! Sessions are generated in bulk as drafts, opened for booking by an
//! explicit admin action, and individually cancelled or reassigned once
//! conflicts arise.

use crate::error::DomainError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Generated but not yet visible or bookable by parents.
    Draft,
    /// Open for booking.
    Open,
    /// Cancelled; bookings were cancelled alongside.
    Cancelled,
    /// Handed to a replacement instructor during conflict resolution.
    Reassigned,
    /// The session has taken place.
    Completed,
}

impl SessionStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Open => "open",
            Self::Cancelled => "cancelled",
            Self::Reassigned => "reassigned",
            Self::Completed => "completed",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Validates a transition to another session status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Draft => matches!(new_status, Self::Open | Self::Cancelled),
            Self::Open => matches!(
                new_status,
                Self::Cancelled | Self::Reassigned | Self::Completed
            ),
            Self::Reassigned => matches!(new_status, Self::Cancelled | Self::Completed),
            Self::Cancelled | Self::Completed => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by session lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "open" => Ok(Self::Open),
            "cancelled" => Ok(Self::Cancelled),
            "reassigned" => Ok(Self::Reassigned),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidSessionStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lesson or assessment session.
///
/// Timestamps are RFC 3339 UTC strings; parsing happens at the point a
/// computation needs calendar or clock values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The canonical numeric identifier assigned by the database.
    pub session_id: Option<i64>,
    /// The assigned instructor.
    pub instructor_id: i64,
    /// Session start (RFC 3339 UTC).
    pub start_time: String,
    /// Session end (RFC 3339 UTC).
    pub end_time: String,
    /// Where the session takes place.
    pub location: String,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Generation batch this session belongs to, if bulk-generated.
    pub batch_id: Option<String>,
    /// Maximum swimmers per session.
    pub max_capacity: i32,
    /// Current confirmed booking count.
    pub booking_count: i32,
    /// Price in cents.
    pub price_cents: i64,
    /// Session type (`lesson`, `assessment`, ...).
    pub session_type: String,
    /// Whether this session belongs to a weekly recurring block.
    pub is_recurring: bool,
    /// When the session row was created (RFC 3339 UTC).
    pub created_at: String,
}

/// Formats a UTC datetime in the canonical storage form
/// (`YYYY-MM-DDTHH:MM:SSZ`).
///
/// Storing one fixed format keeps lexicographic comparisons on stored
/// timestamps equivalent to chronological ones.
#[must_use]
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parses an RFC 3339 timestamp into a UTC datetime.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the value does not parse.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::DateParseError {
            value: value.to_string(),
            error: e.to_string(),
        })
}

/// Recombines an edited date and start/end clock times into full UTC
/// timestamps for a single-session update.
///
/// The date is `YYYY-MM-DD` and the clock times are `HH:MM` wall-clock
/// values, interpreted as UTC.
///
/// # Errors
///
/// Returns an error if any component fails to parse or if the end time
/// is not after the start time.
pub fn recombine_session_times(
    date: &str,
    start_clock: &str,
    end_clock: &str,
) -> Result<(String, String), DomainError> {
    let day: NaiveDate =
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| DomainError::DateParseError {
            value: date.to_string(),
            error: e.to_string(),
        })?;

    let start: NaiveTime = NaiveTime::parse_from_str(start_clock, "%H:%M").map_err(|e| {
        DomainError::DateParseError {
            value: start_clock.to_string(),
            error: e.to_string(),
        }
    })?;

    let end: NaiveTime = NaiveTime::parse_from_str(end_clock, "%H:%M").map_err(|e| {
        DomainError::DateParseError {
            value: end_clock.to_string(),
            error: e.to_string(),
        }
    })?;

    if end <= start {
        return Err(DomainError::InvalidTimeRange {
            reason: format!("end time {end_clock} must be after start time {start_clock}"),
        });
    }

    let start_dt: DateTime<Utc> = day.and_time(start).and_utc();
    let end_dt: DateTime<Utc> = day.and_time(end).and_utc();

    Ok((format_timestamp(start_dt), format_timestamp(end_dt)))
}
