// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft session schedule generation.
//!
//! This module derives the concrete sessions a generation run produces:
//! - Daily time slots stepped by duration, skipping break windows
//! - Target calendar dates from requested weekdays minus blackouts
//! - Instructor overlap conflicts against existing sessions
//!
//! ## Invariants
//!
//! - Session timestamps are stored as UTC (RFC 3339)
//! - Slot times are wall-clock times in the declared timezone
//! - A slot that would run past the daily end time is not emitted
//! - Generated sessions are always drafts sharing one batch id

use crate::error::DomainError;
use crate::session::format_timestamp;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use std::collections::HashSet;

/// A daily time slot in wall-clock terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// Slot start (wall clock).
    pub start: NaiveTime,
    /// Slot end (wall clock).
    pub end: NaiveTime,
}

/// A break window during which no slots are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWindow {
    /// Break start (wall clock).
    pub start: NaiveTime,
    /// Break end (wall clock).
    pub end: NaiveTime,
}

/// One session the generation run will create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSession {
    /// The instructor to assign.
    pub instructor_id: i64,
    /// Session start (RFC 3339 UTC).
    pub start_time: String,
    /// Session end (RFC 3339 UTC).
    pub end_time: String,
}

/// A candidate slot skipped because of an instructor overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotConflict {
    /// The calendar date of the skipped slot.
    pub date: NaiveDate,
    /// The slot in wall-clock terms.
    pub slot: TimeSlot,
    /// The instructor with the overlap.
    pub instructor_id: i64,
}

/// An existing session window used for conflict detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingSession {
    /// The assigned instructor.
    pub instructor_id: i64,
    /// Session start (UTC).
    pub start: DateTime<Utc>,
    /// Session end (UTC).
    pub end: DateTime<Utc>,
}

/// Generates consecutive time slots between daily start and end.
///
/// Slots step by `duration_minutes`; any slot overlapping a break window
/// is skipped, and a slot that would run past the daily end is not
/// emitted.
///
/// # Errors
///
/// Returns an error if the duration is not positive or the daily end is
/// not after the daily start.
pub fn generate_time_slots(
    day_start: NaiveTime,
    day_end: NaiveTime,
    duration_minutes: i64,
    breaks: &[BreakWindow],
) -> Result<Vec<TimeSlot>, DomainError> {
    if duration_minutes <= 0 {
        return Err(DomainError::InvalidSlotDuration {
            minutes: duration_minutes,
        });
    }
    if day_end <= day_start {
        return Err(DomainError::InvalidTimeRange {
            reason: format!("daily end {day_end} must be after daily start {day_start}"),
        });
    }

    let duration = Duration::minutes(duration_minutes);
    let mut slots = Vec::new();
    let mut current = day_start;

    while current + duration <= day_end {
        let slot_end = current + duration;
        let overlaps_break = breaks
            .iter()
            .any(|brk| current < brk.end && slot_end > brk.start);

        if !overlaps_break {
            slots.push(TimeSlot {
                start: current,
                end: slot_end,
            });
        }

        current = slot_end;
        // Guard against wrap-around past midnight.
        if current <= day_start {
            break;
        }
    }

    Ok(slots)
}

/// Derives the calendar dates matching the requested weekdays within a
/// range, excluding blackout dates.
#[must_use]
pub fn target_dates(
    range_start: NaiveDate,
    range_end: NaiveDate,
    days_of_week: &[Weekday],
    blackout_dates: &HashSet<NaiveDate>,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = range_start;

    while current <= range_end {
        if days_of_week.contains(&current.weekday()) && !blackout_dates.contains(&current) {
            dates.push(current);
        }
        let Some(next) = current.succ_opt() else {
            break;
        };
        current = next;
    }

    dates
}

/// Filters an explicit date list against blackout dates.
#[must_use]
pub fn explicit_dates(
    dates: &[NaiveDate],
    blackout_dates: &HashSet<NaiveDate>,
) -> Vec<NaiveDate> {
    dates
        .iter()
        .copied()
        .filter(|d| !blackout_dates.contains(d))
        .collect()
}

/// Returns the first and last day of the month after `today`.
///
/// # Errors
///
/// Returns an error if the computed dates are out of range.
pub fn next_month_range(today: NaiveDate) -> Result<(NaiveDate, NaiveDate), DomainError> {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        DomainError::DateParseError {
            value: format!("{year}-{month:02}-01"),
            error: "invalid month start".to_string(),
        }
    })?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| DomainError::DateParseError {
            value: format!("{next_year}-{next_month:02}-01"),
            error: "invalid month end".to_string(),
        })?;

    Ok((start, end))
}

/// Plans the sessions for a generation run.
///
/// For each date × instructor × slot the candidate is checked against
/// existing non-cancelled sessions; overlapping candidates are reported
/// as conflicts and skipped. Wall-clock slot times are resolved in the
/// declared timezone and stored as UTC.
///
/// # Errors
///
/// Returns an error if the timezone is invalid or a wall-clock time is
/// ambiguous/non-existent due to a DST transition.
pub fn plan_sessions(
    dates: &[NaiveDate],
    instructor_ids: &[i64],
    slots: &[TimeSlot],
    timezone: &str,
    existing: &[ExistingSession],
) -> Result<(Vec<PlannedSession>, Vec<SlotConflict>), DomainError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;

    let mut planned = Vec::new();
    let mut conflicts = Vec::new();

    for date in dates {
        for instructor_id in instructor_ids {
            for slot in slots {
                let start_utc = resolve_local(tz, *date, slot.start)?;
                let end_utc = resolve_local(tz, *date, slot.end)?;

                let has_conflict = existing.iter().any(|session| {
                    session.instructor_id == *instructor_id
                        && start_utc < session.end
                        && end_utc > session.start
                });

                if has_conflict {
                    conflicts.push(SlotConflict {
                        date: *date,
                        slot: *slot,
                        instructor_id: *instructor_id,
                    });
                    continue;
                }

                planned.push(PlannedSession {
                    instructor_id: *instructor_id,
                    start_time: format_timestamp(start_utc),
                    end_time: format_timestamp(end_utc),
                });
            }
        }
    }

    Ok((planned, conflicts))
}

/// Resolves a wall-clock date+time in a timezone to UTC.
fn resolve_local(tz: Tz, date: NaiveDate, clock: NaiveTime) -> Result<DateTime<Utc>, DomainError> {
    let naive = date.and_time(clock);
    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| DomainError::InvalidTimeRange {
            reason: format!(
                "could not resolve {naive} in {tz} (ambiguous or non-existent due to DST)"
            ),
        })
}
