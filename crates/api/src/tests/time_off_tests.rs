// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-off review and per-session conflict resolution.

use crate::error::ApiError;
use crate::handlers::{
    cancel_conflict_session, get_time_off_conflicts, list_time_off_requests,
    replace_conflict_instructor, review_time_off,
};
use crate::request_response::{
    CancelSessionRequest, ReplaceInstructorRequest, ReviewTimeOffRequest,
};
use crate::tests::helpers::{
    admin_actor, create_booking, create_profile, create_session, create_swimmer, create_time_off,
    now, test_db,
};

const WINDOW_START: &str = "2026-03-09T00:00:00Z";
const WINDOW_END: &str = "2026-03-13T23:59:59Z";

#[test]
fn test_conflicts_cover_window_and_mark_actionability() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let inside = create_session(
        &mut db,
        instructor,
        "2026-03-10T17:00:00Z",
        "2026-03-10T17:30:00Z",
        "open",
        None,
    );
    create_booking(&mut db, inside, swimmer, parent);
    // Already cancelled: listed but not actionable.
    create_session(
        &mut db,
        instructor,
        "2026-03-11T17:00:00Z",
        "2026-03-11T17:30:00Z",
        "cancelled",
        None,
    );
    // Outside the window: not listed.
    create_session(
        &mut db,
        instructor,
        "2026-03-20T17:00:00Z",
        "2026-03-20T17:30:00Z",
        "open",
        None,
    );
    // Drafts are not parent-visible and never conflict.
    create_session(
        &mut db,
        instructor,
        "2026-03-12T17:00:00Z",
        "2026-03-12T17:30:00Z",
        "draft",
        Some("b1"),
    );

    let request = create_time_off(&mut db, instructor, WINDOW_START, WINDOW_END);
    let response = get_time_off_conflicts(&mut db, request, &admin_actor(admin)).unwrap();

    assert_eq!(response.conflict_count, 2);
    assert!(response.has_conflicts);

    let open_conflict = response
        .conflicts
        .iter()
        .find(|c| c.session_id == inside)
        .unwrap();
    assert!(open_conflict.actionable);
    assert_eq!(open_conflict.swimmer_count, 1);

    let cancelled_conflict = response
        .conflicts
        .iter()
        .find(|c| c.status == "cancelled")
        .unwrap();
    assert!(!cancelled_conflict.actionable);
}

#[test]
fn test_replace_instructor_resolves_conflict() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let replacement = create_profile(&mut db, "r@pool.test", "Riley Chen", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let session = create_session(
        &mut db,
        instructor,
        "2026-03-10T17:00:00Z",
        "2026-03-10T17:30:00Z",
        "open",
        None,
    );
    create_booking(&mut db, session, swimmer, parent);
    let request = create_time_off(&mut db, instructor, WINDOW_START, WINDOW_END);

    let response = replace_conflict_instructor(
        &mut db,
        &ReplaceInstructorRequest {
            session_id: session,
            replacement_instructor_id: replacement,
            notify_parents: true,
        },
        &admin_actor(admin),
    )
    .unwrap();
    assert_eq!(response.status, "reassigned");
    assert_eq!(response.parents_notified, 1);

    // The re-fetched conflict list shows the session resolved with no
    // further action available.
    let conflicts = get_time_off_conflicts(&mut db, request, &admin_actor(admin)).unwrap();
    let resolved = conflicts
        .conflicts
        .iter()
        .find(|c| c.session_id == session)
        .unwrap();
    assert_eq!(resolved.status, "reassigned");
    assert!(!resolved.actionable);

    // A second resolution attempt is rejected.
    let again = replace_conflict_instructor(
        &mut db,
        &ReplaceInstructorRequest {
            session_id: session,
            replacement_instructor_id: replacement,
            notify_parents: true,
        },
        &admin_actor(admin),
    );
    assert!(matches!(
        again,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "conflict_resolved"
    ));
}

#[test]
fn test_replacement_must_differ_from_requester() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let session = create_session(
        &mut db,
        instructor,
        "2026-03-10T17:00:00Z",
        "2026-03-10T17:30:00Z",
        "open",
        None,
    );

    let result = replace_conflict_instructor(
        &mut db,
        &ReplaceInstructorRequest {
            session_id: session,
            replacement_instructor_id: instructor,
            notify_parents: true,
        },
        &admin_actor(admin),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_cancel_conflict_session_uses_fixed_reason() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let session = create_session(
        &mut db,
        instructor,
        "2026-03-10T17:00:00Z",
        "2026-03-10T17:30:00Z",
        "open",
        None,
    );
    let booking = create_booking(&mut db, session, swimmer, parent);

    let response = cancel_conflict_session(
        &mut db,
        &CancelSessionRequest {
            session_id: session,
            notify_parents: true,
        },
        &admin_actor(admin),
        now(),
    )
    .unwrap();
    assert_eq!(response.status, "cancelled");
    assert_eq!(response.parents_notified, 1);

    let row = db.get_booking(booking).unwrap();
    assert_eq!(row.status, "cancelled");
    assert_eq!(row.cancel_reason.as_deref(), Some("Instructor unavailable"));
}

#[test]
fn test_review_submits_independently_of_conflicts() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    // One unresolved conflict in the window.
    create_session(
        &mut db,
        instructor,
        "2026-03-10T17:00:00Z",
        "2026-03-10T17:30:00Z",
        "open",
        None,
    );
    let request = create_time_off(&mut db, instructor, WINDOW_START, WINDOW_END);

    let response = review_time_off(
        &mut db,
        &ReviewTimeOffRequest {
            time_off_id: request,
            status: String::from("approved"),
            admin_notes: Some(String::from("coverage arranged separately")),
        },
        &admin_actor(admin),
        now(),
    )
    .unwrap();

    // Approval goes through; the unresolved conflict is surfaced, not
    // blocking.
    assert_eq!(response.status, "approved");
    assert_eq!(response.unresolved_conflicts, 1);

    let row = db.get_time_off_request(request).unwrap();
    assert_eq!(row.status, "approved");
    assert_eq!(row.reviewed_by, Some(admin));
    assert_eq!(
        row.admin_notes.as_deref(),
        Some("coverage arranged separately")
    );
}

#[test]
fn test_review_decision_is_final() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let request = create_time_off(&mut db, instructor, WINDOW_START, WINDOW_END);

    review_time_off(
        &mut db,
        &ReviewTimeOffRequest {
            time_off_id: request,
            status: String::from("declined"),
            admin_notes: None,
        },
        &admin_actor(admin),
        now(),
    )
    .unwrap();

    let result = review_time_off(
        &mut db,
        &ReviewTimeOffRequest {
            time_off_id: request,
            status: String::from("approved"),
            admin_notes: None,
        },
        &admin_actor(admin),
        now(),
    );
    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_listing_orders_pending_first() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let reviewed = create_time_off(&mut db, instructor, WINDOW_START, WINDOW_END);
    review_time_off(
        &mut db,
        &ReviewTimeOffRequest {
            time_off_id: reviewed,
            status: String::from("approved"),
            admin_notes: None,
        },
        &admin_actor(admin),
        now(),
    )
    .unwrap();
    let pending = create_time_off(&mut db, instructor, "2026-04-01T00:00:00Z", "2026-04-03T23:59:59Z");

    let response = list_time_off_requests(&mut db, &admin_actor(admin)).unwrap();
    assert_eq!(response.requests[0].time_off_id, pending);
    assert_eq!(response.requests[0].status, "pending");
    assert_eq!(response.requests[1].time_off_id, reviewed);
    assert_eq!(response.requests[1].reviewer_name.as_deref(), Some("Alex Admin"));
}
