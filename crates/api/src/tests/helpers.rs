// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures for the API suite.

use chrono::{DateTime, TimeZone, Utc};
use swimops_domain::Role;
use swimops_persistence::{
    NewBooking, NewFundingSource, NewProfile, NewPurchaseOrder, NewSession, NewSwimmer,
    NewTimeOffRequest, Persistence, encode_domains,
};

use crate::auth::AuthenticatedActor;
use crate::request_response::FundingSourceForm;

pub const T0: &str = "2026-03-01T00:00:00Z";

/// A fixed "now" for time-dependent handlers: March 1, 2026, 09:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub fn test_db() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn admin_actor(user_id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(user_id, vec![Role::Admin])
}

pub fn parent_actor(user_id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(user_id, Vec::new())
}

pub fn create_profile(db: &mut Persistence, email: &str, name: &str, roles: &[&str]) -> i64 {
    let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
    db.create_profile(
        &NewProfile {
            email: email.to_string(),
            full_name: name.to_string(),
            phone: None,
            created_at: T0.to_string(),
        },
        &roles,
    )
    .unwrap()
}

pub fn create_funding_source(db: &mut Persistence) -> i64 {
    db.create_funding_source(&NewFundingSource {
        name: String::from("Valley Regional Center"),
        short_name: String::from("VMRC"),
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
    })
    .unwrap()
}

pub fn create_swimmer(db: &mut Persistence, parent_id: i64, funding: Option<i64>) -> i64 {
    db.create_swimmer(&NewSwimmer {
        first_name: String::from("Mia"),
        last_name: String::from("Lopez"),
        date_of_birth: String::from("2019-04-05"),
        enrollment_status: String::from("enrolled"),
        payment_type: if funding.is_some() {
            String::from("funded")
        } else {
            String::from("private_pay")
        },
        funding_source_id: funding,
        parent_id,
        coordinator_id: None,
        waiver_signed: 1,
        waiver_signed_at: Some(T0.to_string()),
    })
    .unwrap()
}

pub fn create_session(
    db: &mut Persistence,
    instructor_id: i64,
    start_time: &str,
    end_time: &str,
    status: &str,
    batch_id: Option<&str>,
) -> i64 {
    db.create_session(&NewSession {
        instructor_id,
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
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
    })
    .unwrap()
}

pub fn create_booking(db: &mut Persistence, session_id: i64, swimmer_id: i64, parent_id: i64) -> i64 {
    db.create_booking(&NewBooking {
        session_id,
        swimmer_id,
        parent_id,
        status: String::from("confirmed"),
        booking_type: String::from("lesson"),
        created_at: T0.to_string(),
    })
    .unwrap()
}

pub fn create_po(
    db: &mut Persistence,
    swimmer_id: i64,
    funding_source_id: i64,
    status: &str,
    sessions_used: i32,
) -> i64 {
    db.create_purchase_order(&NewPurchaseOrder {
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
        notes: Some(String::from("initial referral")),
        billing_status: String::from("unbilled"),
        due_date: None,
        created_at: T0.to_string(),
        updated_at: T0.to_string(),
    })
    .unwrap()
}

pub fn create_time_off(
    db: &mut Persistence,
    instructor_id: i64,
    start_at: &str,
    end_at: &str,
) -> i64 {
    db.create_time_off_request(&NewTimeOffRequest {
        instructor_id,
        start_at: start_at.to_string(),
        end_at: end_at.to_string(),
        all_day: 1,
        reason_type: String::from("vacation"),
        status: String::from("pending"),
        created_at: T0.to_string(),
    })
    .unwrap()
}

pub fn valid_funding_form() -> FundingSourceForm {
    FundingSourceForm {
        name: String::from("Valley Regional Center"),
        short_name: String::from("VMRC"),
        allowed_email_domains: String::from("@regional-center.net, @funding.org"),
        assessment_sessions: 2,
        lessons_per_po: 12,
        authorization_months: 6,
        renewal_alert_threshold: 11,
        lesson_rate_cents: 9500,
        billing_contact_name: None,
        billing_contact_email: None,
        billing_contact_phone: None,
        is_active: true,
    }
}
