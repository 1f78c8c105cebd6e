// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parent-facing booking cancellation rules.

use crate::error::ApiError;
use crate::handlers::{cancel_block, cancel_booking};
use crate::request_response::{CancelBlockRequest, CancelBookingRequest};
use crate::tests::helpers::{
    admin_actor, create_booking, create_profile, create_session, create_swimmer, now,
    parent_actor, test_db,
};

#[test]
fn test_cancel_far_future_booking_succeeds() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);
    // 48 hours out from the fixed test clock.
    let session = create_session(
        &mut db,
        instructor,
        "2026-03-03T09:00:00Z",
        "2026-03-03T09:30:00Z",
        "open",
        None,
    );
    let booking = create_booking(&mut db, session, swimmer, parent);

    let response = cancel_booking(
        &mut db,
        &CancelBookingRequest {
            booking_id: booking,
            reason: Some(String::from("schedule change")),
        },
        &parent_actor(parent),
        now(),
    )
    .unwrap();

    assert!((response.hours_before_session - 48.0).abs() < f64::EPSILON);
    assert_eq!(db.get_booking(booking).unwrap().status, "cancelled");
    assert_eq!(db.get_session(session).unwrap().booking_count, 0);
}

#[test]
fn test_cancel_inside_cutoff_is_rejected_with_late_indicator() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);
    // 23 hours out: inside the 24-hour window.
    let session = create_session(
        &mut db,
        instructor,
        "2026-03-02T08:00:00Z",
        "2026-03-02T08:30:00Z",
        "open",
        None,
    );
    let booking = create_booking(&mut db, session, swimmer, parent);

    let result = cancel_booking(
        &mut db,
        &CancelBookingRequest {
            booking_id: booking,
            reason: None,
        },
        &parent_actor(parent),
        now(),
    );

    match result {
        Err(ApiError::LateCancellation {
            hours_before_session,
            contact_phone,
            ..
        }) => {
            assert!((hours_before_session - 23.0).abs() < f64::EPSILON);
            assert!(!contact_phone.is_empty());
        }
        other => panic!("expected late cancellation, got {other:?}"),
    }

    // The booking is untouched.
    assert_eq!(db.get_booking(booking).unwrap().status, "confirmed");
}

#[test]
fn test_past_session_cannot_be_cancelled() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);
    let session = create_session(
        &mut db,
        instructor,
        "2026-02-27T09:00:00Z",
        "2026-02-27T09:30:00Z",
        "open",
        None,
    );
    let booking = create_booking(&mut db, session, swimmer, parent);

    let result = cancel_booking(
        &mut db,
        &CancelBookingRequest {
            booking_id: booking,
            reason: None,
        },
        &parent_actor(parent),
        now(),
    );

    match result {
        Err(ApiError::LateCancellation {
            hours_before_session,
            ..
        }) => assert!(hours_before_session < 0.0),
        other => panic!("expected late cancellation, got {other:?}"),
    }
}

#[test]
fn test_admin_bypasses_the_cutoff() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let swimmer = create_swimmer(&mut db, parent, None);
    let session = create_session(
        &mut db,
        instructor,
        "2026-03-01T12:00:00Z",
        "2026-03-01T12:30:00Z",
        "open",
        None,
    );
    let booking = create_booking(&mut db, session, swimmer, parent);

    let response = cancel_booking(
        &mut db,
        &CancelBookingRequest {
            booking_id: booking,
            reason: Some(String::from("pool closure")),
        },
        &admin_actor(admin),
        now(),
    )
    .unwrap();
    assert_eq!(response.booking_id, booking);
}

#[test]
fn test_stranger_cannot_cancel_someone_elses_booking() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let stranger = create_profile(&mut db, "s@home.test", "Skye Nguyen", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);
    let session = create_session(
        &mut db,
        instructor,
        "2026-03-05T09:00:00Z",
        "2026-03-05T09:30:00Z",
        "open",
        None,
    );
    let booking = create_booking(&mut db, session, swimmer, parent);

    let result = cancel_booking(
        &mut db,
        &CancelBookingRequest {
            booking_id: booking,
            reason: None,
        },
        &parent_actor(stranger),
        now(),
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_block_cancel_requires_future_first_session() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    // First session already started at the fixed clock.
    for start in ["2026-03-01T08:00:00Z", "2026-03-08T08:00:00Z"] {
        let end = start.replace("T08:00", "T08:30");
        let session = create_session(&mut db, instructor, start, &end, "open", Some("blk1"));
        create_booking(&mut db, session, swimmer, parent);
    }

    let result = cancel_block(
        &mut db,
        &CancelBlockRequest {
            swimmer_id: swimmer,
            batch_id: String::from("blk1"),
            reason: None,
        },
        &parent_actor(parent),
        now(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "block_cancel_window"
    ));
}

#[test]
fn test_block_cancel_cancels_future_and_skips_started() {
    let mut db = test_db();
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let starts = [
        "2026-03-01T08:00:00Z", // already started
        "2026-03-08T08:00:00Z",
        "2026-03-15T08:00:00Z",
    ];
    let mut bookings = Vec::new();
    for start in starts {
        let end = start.replace("T08:00", "T08:30");
        let session = create_session(&mut db, instructor, start, &end, "open", Some("blk1"));
        bookings.push(create_booking(&mut db, session, swimmer, parent));
    }

    // Parent is blocked (first session started); admin may proceed.
    let response = cancel_block(
        &mut db,
        &CancelBlockRequest {
            swimmer_id: swimmer,
            batch_id: String::from("blk1"),
            reason: Some(String::from("moving away")),
        },
        &admin_actor(admin),
        now(),
    )
    .unwrap();

    assert_eq!(response.canceled, 2);
    assert_eq!(response.skipped, 1);
    assert_eq!(db.get_booking(bookings[0]).unwrap().status, "confirmed");
    assert_eq!(db.get_booking(bookings[1]).unwrap().status, "cancelled");
    assert_eq!(db.get_booking(bookings[2]).unwrap().status, "cancelled");
}

#[test]
fn test_block_cancel_with_no_active_bookings_is_not_found() {
    let mut db = test_db();
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let result = cancel_block(
        &mut db,
        &CancelBlockRequest {
            swimmer_id: swimmer,
            batch_id: String::from("missing"),
            reason: None,
        },
        &parent_actor(parent),
        now(),
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
