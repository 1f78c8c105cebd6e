// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk session open/delete and booking cancellation behavior.

use crate::tests::helpers::{
    create_booking, create_profile, create_session, create_swimmer, test_db,
};
use crate::{NewCancellation, PersistenceError};

#[test]
fn test_open_draft_sessions_all_or_nothing() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let a = create_session(&mut db, instructor, "2026-03-02T17:00:00Z", "draft", Some("b1"));
    let b = create_session(&mut db, instructor, "2026-03-09T17:00:00Z", "draft", Some("b1"));

    let opened = db
        .open_draft_sessions(&[a, b], "2026-02-20T00:00:00Z")
        .unwrap();
    assert_eq!(opened, 2);

    let statuses = db.get_session_statuses(&[a, b]).unwrap();
    assert!(statuses.iter().all(|(_, s)| s == "open"));
}

#[test]
fn test_open_rolls_back_when_member_is_not_draft() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let a = create_session(&mut db, instructor, "2026-03-02T17:00:00Z", "draft", Some("b1"));
    let b = create_session(&mut db, instructor, "2026-03-09T17:00:00Z", "open", Some("b1"));

    let result = db.open_draft_sessions(&[a, b], "2026-02-20T00:00:00Z");
    assert!(matches!(
        result,
        Err(PersistenceError::BulkOperationFailed(_))
    ));

    // The valid member must not have been opened.
    let statuses = db.get_session_statuses(&[a]).unwrap();
    assert_eq!(statuses[0].1, "draft");
}

#[test]
fn test_delete_draft_sessions_all_or_nothing() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let a = create_session(&mut db, instructor, "2026-03-02T17:00:00Z", "draft", Some("b1"));
    let b = create_session(&mut db, instructor, "2026-03-09T17:00:00Z", "open", Some("b1"));

    assert!(db.delete_draft_sessions(&[a, b]).is_err());
    assert_eq!(db.get_session_statuses(&[a, b]).unwrap().len(), 2);

    assert_eq!(db.delete_draft_sessions(&[a]).unwrap(), 1);
    assert_eq!(db.get_session_statuses(&[a]).unwrap().len(), 0);
}

#[test]
fn test_update_draft_session_schedule_requires_draft() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let replacement = create_profile(&mut db, "r@pool.test", "Riley Chen", &["instructor"]);

    let draft = create_session(&mut db, instructor, "2026-03-02T17:00:00Z", "draft", Some("b1"));
    let open = create_session(&mut db, instructor, "2026-03-09T17:00:00Z", "open", Some("b1"));

    db.update_draft_session_schedule(
        draft,
        "2026-03-03T17:00:00Z",
        "2026-03-03T17:30:00Z",
        replacement,
    )
    .unwrap();
    let row = db.get_session(draft).unwrap();
    assert_eq!(row.start_time, "2026-03-03T17:00:00Z");
    assert_eq!(row.instructor_id, replacement);

    assert!(
        db.update_draft_session_schedule(
            open,
            "2026-03-10T17:00:00Z",
            "2026-03-10T17:30:00Z",
            replacement,
        )
        .is_err()
    );
}

#[test]
fn test_cancel_session_cancels_confirmed_bookings() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let session = create_session(&mut db, instructor, "2026-03-02T17:00:00Z", "open", None);
    create_booking(&mut db, session, swimmer, parent);

    let notified = db
        .cancel_session_with_bookings(
            session,
            "Instructor unavailable",
            admin,
            "2026-02-25T00:00:00Z",
        )
        .unwrap();
    assert_eq!(notified, 1);

    let row = db.get_session(session).unwrap();
    assert_eq!(row.status, "cancelled");
    assert_eq!(row.booking_count, 0);
    assert_eq!(db.count_confirmed_bookings(session).unwrap(), 0);
}

#[test]
fn test_replace_session_instructor_marks_reassigned() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let replacement = create_profile(&mut db, "r@pool.test", "Riley Chen", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let session = create_session(&mut db, instructor, "2026-03-02T17:00:00Z", "open", None);
    create_booking(&mut db, session, swimmer, parent);

    let notified = db.replace_session_instructor(session, replacement).unwrap();
    assert_eq!(notified, 1);

    let row = db.get_session(session).unwrap();
    assert_eq!(row.status, "reassigned");
    assert_eq!(row.instructor_id, replacement);
}

#[test]
fn test_cancel_booking_decrements_count_and_records() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let session = create_session(&mut db, instructor, "2026-03-05T17:00:00Z", "open", None);
    let booking = create_booking(&mut db, session, swimmer, parent);
    assert_eq!(db.get_session(session).unwrap().booking_count, 1);

    let record = NewCancellation {
        booking_id: booking,
        session_id: session,
        swimmer_id: swimmer,
        parent_id: parent,
        canceled_by: parent,
        cancellation_type: String::from("single"),
        session_start_time: String::from("2026-03-05T17:00:00Z"),
        hours_before_session: 72.0,
        was_late_cancellation: 0,
        cancel_reason: Some(String::from("schedule change")),
        cancel_source: String::from("parent"),
        block_cancel_id: None,
        created_at: String::from("2026-03-02T17:00:00Z"),
    };
    db.cancel_booking(booking, session, &record).unwrap();

    assert_eq!(db.get_booking(booking).unwrap().status, "cancelled");
    assert_eq!(db.get_session(session).unwrap().booking_count, 0);

    // A second cancel of the same booking is rejected.
    assert!(db.cancel_booking(booking, session, &record).is_err());
}
