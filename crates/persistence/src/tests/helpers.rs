// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures for the persistence suite.

use crate::{
    NewBooking, NewFundingSource, NewProfile, NewPurchaseOrder, NewSession, NewSwimmer,
    Persistence, encode_domains,
};

pub const T0: &str = "2026-03-01T00:00:00Z";

pub fn test_db() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_profile(db: &mut Persistence, email: &str, name: &str, roles: &[&str]) -> i64 {
    let profile = NewProfile {
        email: email.to_string(),
        full_name: name.to_string(),
        phone: None,
        created_at: T0.to_string(),
    };
    let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
    db.create_profile(&profile, &roles).unwrap()
}

pub fn create_funding_source(db: &mut Persistence, name: &str, short_name: &str) -> i64 {
    let source = NewFundingSource {
        name: name.to_string(),
        short_name: short_name.to_string(),
        allowed_email_domains: encode_domains(&[String::from("@regional-center.net")]).unwrap(),
        assessment_sessions: 2,
        lessons_per_po: 12,
        authorization_months: 6,
        renewal_alert_threshold: 11,
        lesson_rate_cents: 9500,
        billing_contact_name: None,
        billing_contact_email: None,
        billing_contact_phone: None,
        is_active: 1,
    };
    db.create_funding_source(&source).unwrap()
}

pub fn create_swimmer(
    db: &mut Persistence,
    parent_id: i64,
    funding_source_id: Option<i64>,
) -> i64 {
    let swimmer = NewSwimmer {
        first_name: String::from("Mia"),
        last_name: String::from("Lopez"),
        date_of_birth: String::from("2019-04-05"),
        enrollment_status: String::from("enrolled"),
        payment_type: if funding_source_id.is_some() {
            String::from("funded")
        } else {
            String::from("private_pay")
        },
        funding_source_id,
        parent_id,
        coordinator_id: None,
        waiver_signed: 1,
        waiver_signed_at: Some(T0.to_string()),
    };
    db.create_swimmer(&swimmer).unwrap()
}

pub fn create_session(
    db: &mut Persistence,
    instructor_id: i64,
    start_time: &str,
    status: &str,
    batch_id: Option<&str>,
) -> i64 {
    let session = NewSession {
        instructor_id,
        start_time: start_time.to_string(),
        end_time: start_time.replace(":00:00Z", ":30:00Z"),
        location: String::from("Main Pool"),
        status: status.to_string(),
        batch_id: batch_id.map(ToString::to_string),
        max_capacity: 1,
        booking_count: 0,
        price_cents: 9500,
        session_type: String::from("lesson"),
        is_recurring: 1,
        open_at: None,
        created_at: T0.to_string(),
    };
    db.create_session(&session).unwrap()
}

pub fn create_booking(db: &mut Persistence, session_id: i64, swimmer_id: i64, parent_id: i64) -> i64 {
    let booking = NewBooking {
        session_id,
        swimmer_id,
        parent_id,
        status: String::from("confirmed"),
        booking_type: String::from("lesson"),
        created_at: T0.to_string(),
    };
    db.create_booking(&booking).unwrap()
}

pub fn create_purchase_order(
    db: &mut Persistence,
    swimmer_id: i64,
    funding_source_id: i64,
    status: &str,
    sessions_used: i32,
) -> i64 {
    let order = NewPurchaseOrder {
        swimmer_id,
        funding_source_id,
        coordinator_id: None,
        po_type: String::from("lessons"),
        status: status.to_string(),
        authorization_number: None,
        sessions_authorized: 12,
        sessions_booked: sessions_used,
        sessions_used,
        start_date: String::from("2026-01-01"),
        end_date: String::from("2026-06-30"),
        notes: None,
        billing_status: String::from("unbilled"),
        due_date: None,
        created_at: T0.to_string(),
        updated_at: T0.to_string(),
    };
    db.create_purchase_order(&order).unwrap()
}
