// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft session batch grouping and selection.
//!
//! Bulk-generated sessions share a `batch_id`. Admins review them grouped
//! by batch, select a subset, and open or delete the selection.

use crate::error::DomainError;
use crate::session::{Session, parse_timestamp};
use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Display name for sessions whose instructor profile is missing.
pub const UNKNOWN_INSTRUCTOR: &str = "Unknown Instructor";

/// The first-to-last session date range of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest session start (RFC 3339 UTC).
    pub start: String,
    /// Latest session start (RFC 3339 UTC).
    pub end: String,
}

/// One generation run's worth of draft sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftBatch {
    /// The shared batch identifier.
    pub batch_id: String,
    /// When the batch was created (RFC 3339 UTC).
    pub created_at: String,
    /// Number of sessions in the batch.
    pub session_count: usize,
    /// First-to-last session date range.
    pub date_range: DateRange,
    /// Where the sessions take place.
    pub location: String,
    /// The batch instructor's profile id.
    pub instructor_id: i64,
    /// The batch instructor's display name.
    pub instructor_name: String,
    /// The sessions, ordered by start time.
    pub sessions: Vec<Session>,
}

/// Groups draft sessions by `batch_id` into review-ready batches.
///
/// Sessions without a batch id are skipped. Batches are ordered
/// newest-created first; sessions within a batch by start time.
/// Instructors missing from `instructor_names` surface as
/// [`UNKNOWN_INSTRUCTOR`].
#[must_use]
pub fn group_draft_sessions(
    sessions: &[Session],
    instructor_names: &HashMap<i64, String>,
) -> Vec<DraftBatch> {
    let mut batches: HashMap<String, DraftBatch> = HashMap::new();

    for session in sessions {
        let Some(batch_id) = session.batch_id.clone() else {
            continue;
        };

        let batch = batches.entry(batch_id.clone()).or_insert_with(|| {
            let instructor_name = instructor_names
                .get(&session.instructor_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_INSTRUCTOR.to_string());
            DraftBatch {
                batch_id,
                created_at: session.created_at.clone(),
                session_count: 0,
                date_range: DateRange {
                    start: session.start_time.clone(),
                    end: session.start_time.clone(),
                },
                location: session.location.clone(),
                instructor_id: session.instructor_id,
                instructor_name,
                sessions: Vec::new(),
            }
        });

        batch.session_count += 1;
        if session.start_time < batch.date_range.start {
            batch.date_range.start = session.start_time.clone();
        }
        if session.start_time > batch.date_range.end {
            batch.date_range.end = session.start_time.clone();
        }
        batch.sessions.push(session.clone());
    }

    let mut result: Vec<DraftBatch> = batches.into_values().collect();
    for batch in &mut result {
        batch
            .sessions
            .sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }
    result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    result
}

/// Derives the display title of a batch.
///
/// The title is `"{Month} - {DayLabel} - {FirstName}"`: the month name
/// comes from the first session's start date, the day label is
/// `"<Weekday>s"` when every session falls on the same weekday and
/// `"Mixed"` otherwise, and the instructor's first name is appended.
/// An empty batch titles as `"Empty Batch"`.
///
/// # Errors
///
/// Returns an error if a session start time does not parse.
pub fn batch_title(batch: &DraftBatch) -> Result<String, DomainError> {
    let Some(first) = batch.sessions.first() else {
        return Ok(String::from("Empty Batch"));
    };

    let first_start = parse_timestamp(&first.start_time)?;
    let month = month_name(first_start.month());

    let mut weekdays: HashSet<Weekday> = HashSet::new();
    for session in &batch.sessions {
        weekdays.insert(parse_timestamp(&session.start_time)?.weekday());
    }

    let day_label = if weekdays.len() == 1 {
        format!("{}s", weekday_name(first_start.weekday()))
    } else {
        String::from("Mixed")
    };

    let first_name = batch
        .instructor_name
        .split_whitespace()
        .next()
        .unwrap_or(UNKNOWN_INSTRUCTOR);

    Ok(format!("{month} - {day_label} - {first_name}"))
}

const fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A client-local selection of session ids across batches.
///
/// Selection is purely transient state; it is never persisted or shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<i64>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Selects or deselects a single session.
    pub fn select_session(&mut self, session_id: i64, selected: bool) {
        if selected {
            self.ids.insert(session_id);
        } else {
            self.ids.remove(&session_id);
        }
    }

    /// Selects or deselects every session in a batch.
    ///
    /// Adds or removes exactly the batch's session ids and no others.
    pub fn select_batch(&mut self, batch: &DraftBatch, selected: bool) {
        for session in &batch.sessions {
            if let Some(id) = session.session_id {
                self.select_session(id, selected);
            }
        }
    }

    /// Toggles between an empty selection and the full id set.
    ///
    /// When every id is already selected the selection clears; otherwise
    /// it becomes the full set. Toggling twice restores the prior state.
    pub fn toggle_select_all(&mut self, all_ids: &BTreeSet<i64>) {
        if self.all_selected(all_ids) {
            self.ids.clear();
        } else {
            self.ids = all_ids.clone();
        }
    }

    /// Returns true if every id in `all_ids` is selected.
    ///
    /// An empty universe never counts as all-selected.
    #[must_use]
    pub fn all_selected(&self, all_ids: &BTreeSet<i64>) -> bool {
        !all_ids.is_empty() && all_ids.iter().all(|id| self.ids.contains(id))
    }

    /// Returns true if the session is selected.
    #[must_use]
    pub fn is_selected(&self, session_id: i64) -> bool {
        self.ids.contains(&session_id)
    }

    /// Returns the selected ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    /// Number of selected sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
