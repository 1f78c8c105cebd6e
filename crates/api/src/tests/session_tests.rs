// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft batch review, bulk open/delete, per-session edit, and
//! generation.

use crate::error::ApiError;
use crate::handlers::{
    delete_selected_sessions, generate_sessions, list_draft_batches, open_selected_sessions,
    update_draft_session,
};
use crate::request_response::{
    DeleteSessionsRequest, GenerateSessionsRequest, OpenSessionsRequest, UpdateSessionRequest,
};
use crate::tests::helpers::{
    admin_actor, create_profile, create_session, now, parent_actor, test_db,
};

fn generator_request() -> GenerateSessionsRequest {
    GenerateSessionsRequest {
        mode: String::from("custom_range"),
        start_date: Some(String::from("2026-03-02")),
        end_date: Some(String::from("2026-03-15")),
        days_of_week: vec![1], // Mondays: Mar 2, 9
        start_time: String::from("09:00"),
        end_time: String::from("10:00"),
        session_duration: 30,
        instructor_ids: Vec::new(),
        breaks: Vec::new(),
        session_type: String::from("lesson"),
        location: String::from("Main Pool"),
        price_cents: 9500,
        blackout_dates: Vec::new(),
        additional_dates: None,
        timezone: String::from("America/Los_Angeles"),
    }
}

#[test]
fn test_listing_groups_batches_with_titles() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    // Mondays in March 2026.
    for start in ["2026-03-02T17:00:00Z", "2026-03-09T17:00:00Z"] {
        let end = start.replace("17:00", "17:30");
        create_session(&mut db, instructor, start, &end, "draft", Some("b1"));
    }
    // Session without a batch id is skipped.
    create_session(
        &mut db,
        instructor,
        "2026-03-04T17:00:00Z",
        "2026-03-04T17:30:00Z",
        "draft",
        None,
    );

    let response = list_draft_batches(&mut db, &admin_actor(admin)).unwrap();
    assert_eq!(response.batches.len(), 1);
    assert_eq!(response.total_sessions, 2);

    let batch = &response.batches[0];
    assert_eq!(batch.title, "March - Mondays - Jordan");
    assert_eq!(batch.session_count, 2);
    assert_eq!(batch.instructor.name, "Jordan Avila");
    assert_eq!(batch.date_range.start, "2026-03-02T17:00:00Z");
    assert_eq!(batch.date_range.end, "2026-03-09T17:00:00Z");
}

#[test]
fn test_open_selected_requires_a_selection() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);

    let result = open_selected_sessions(
        &mut db,
        &OpenSessionsRequest {
            session_ids: Vec::new(),
        },
        &admin_actor(admin),
        now(),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_open_selected_opens_and_reports_count() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let a = create_session(
        &mut db,
        instructor,
        "2026-03-02T17:00:00Z",
        "2026-03-02T17:30:00Z",
        "draft",
        Some("b1"),
    );
    let b = create_session(
        &mut db,
        instructor,
        "2026-03-09T17:00:00Z",
        "2026-03-09T17:30:00Z",
        "draft",
        Some("b1"),
    );

    let response = open_selected_sessions(
        &mut db,
        &OpenSessionsRequest {
            session_ids: vec![a, b],
        },
        &admin_actor(admin),
        now(),
    )
    .unwrap();
    assert_eq!(response.count, 2);

    // The listing no longer shows them.
    let listing = list_draft_batches(&mut db, &admin_actor(admin)).unwrap();
    assert_eq!(listing.total_sessions, 0);
}

#[test]
fn test_partial_failure_rolls_back_the_whole_open() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let draft = create_session(
        &mut db,
        instructor,
        "2026-03-02T17:00:00Z",
        "2026-03-02T17:30:00Z",
        "draft",
        Some("b1"),
    );
    let already_open = create_session(
        &mut db,
        instructor,
        "2026-03-09T17:00:00Z",
        "2026-03-09T17:30:00Z",
        "open",
        Some("b1"),
    );

    let result = open_selected_sessions(
        &mut db,
        &OpenSessionsRequest {
            session_ids: vec![draft, already_open],
        },
        &admin_actor(admin),
        now(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "bulk_all_or_nothing"
    ));
    assert_eq!(db.get_session(draft).unwrap().status, "draft");
}

#[test]
fn test_delete_selected_requires_confirmation() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let session = create_session(
        &mut db,
        instructor,
        "2026-03-02T17:00:00Z",
        "2026-03-02T17:30:00Z",
        "draft",
        Some("b1"),
    );

    let result = delete_selected_sessions(
        &mut db,
        &DeleteSessionsRequest {
            session_ids: vec![session],
            confirm: false,
        },
        &admin_actor(admin),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "confirm"));

    let response = delete_selected_sessions(
        &mut db,
        &DeleteSessionsRequest {
            session_ids: vec![session],
            confirm: true,
        },
        &admin_actor(admin),
    )
    .unwrap();
    assert_eq!(response.count, 1);
    assert!(db.get_session(session).is_err());
}

#[test]
fn test_edit_recombines_date_and_clock_times() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let replacement = create_profile(&mut db, "r@pool.test", "Riley Chen", &["instructor"]);
    let session = create_session(
        &mut db,
        instructor,
        "2026-03-02T17:00:00Z",
        "2026-03-02T17:30:00Z",
        "draft",
        Some("b1"),
    );

    let response = update_draft_session(
        &mut db,
        &UpdateSessionRequest {
            session_id: session,
            date: String::from("2026-03-04"),
            start_time: String::from("10:15"),
            end_time: String::from("10:45"),
            instructor_id: replacement,
        },
        &admin_actor(admin),
    )
    .unwrap();

    assert_eq!(response.start_time, "2026-03-04T10:15:00Z");
    assert_eq!(response.end_time, "2026-03-04T10:45:00Z");

    let row = db.get_session(session).unwrap();
    assert_eq!(row.instructor_id, replacement);
    assert_eq!(row.start_time, "2026-03-04T10:15:00Z");
}

#[test]
fn test_edit_rejects_inverted_times() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);
    let session = create_session(
        &mut db,
        instructor,
        "2026-03-02T17:00:00Z",
        "2026-03-02T17:30:00Z",
        "draft",
        Some("b1"),
    );

    let result = update_draft_session(
        &mut db,
        &UpdateSessionRequest {
            session_id: session,
            date: String::from("2026-03-04"),
            start_time: String::from("11:00"),
            end_time: String::from("10:00"),
            instructor_id: instructor,
        },
        &admin_actor(admin),
    );
    assert!(result.is_err());
}

#[test]
fn test_generation_creates_a_shared_draft_batch() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let mut request = generator_request();
    request.instructor_ids = vec![instructor];

    let response = generate_sessions(&mut db, &request, &admin_actor(admin), now()).unwrap();

    // Two Mondays x two 30-minute slots.
    assert_eq!(response.created, 4);
    assert_eq!(response.skipped, 0);

    let sessions = db.list_sessions_in_batch(&response.batch_id).unwrap();
    assert_eq!(sessions.len(), 4);
    assert!(sessions.iter().all(|s| s.status == "draft"));
    // 09:00 America/Los_Angeles is 17:00 UTC in early March.
    assert_eq!(sessions[0].start_time, "2026-03-02T17:00:00Z");
}

#[test]
fn test_generation_skips_instructor_conflicts() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    // Existing open session covering the Mar 2 09:00 PT slot.
    create_session(
        &mut db,
        instructor,
        "2026-03-02T17:00:00Z",
        "2026-03-02T17:30:00Z",
        "open",
        None,
    );

    let mut request = generator_request();
    request.instructor_ids = vec![instructor];

    let response = generate_sessions(&mut db, &request, &admin_actor(admin), now()).unwrap();
    assert_eq!(response.created, 3);
    assert_eq!(response.skipped, 1);
    assert_eq!(response.conflicts[0].reason, "Instructor conflict");
    assert_eq!(response.conflicts[0].time, "09:00-09:30");
}

#[test]
fn test_generation_honors_blackout_dates() {
    let mut db = test_db();
    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    let instructor = create_profile(&mut db, "i@pool.test", "Jordan Avila", &["instructor"]);

    let mut request = generator_request();
    request.instructor_ids = vec![instructor];
    request.blackout_dates = vec![String::from("2026-03-09")];

    let response = generate_sessions(&mut db, &request, &admin_actor(admin), now()).unwrap();
    // One Monday remains, two slots.
    assert_eq!(response.created, 2);
}

#[test]
fn test_session_management_is_admin_only() {
    let mut db = test_db();
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);

    assert!(matches!(
        list_draft_batches(&mut db, &parent_actor(parent)),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        open_selected_sessions(
            &mut db,
            &OpenSessionsRequest {
                session_ids: vec![1],
            },
            &parent_actor(parent),
            now(),
        ),
        Err(ApiError::Unauthorized { .. })
    ));
}
