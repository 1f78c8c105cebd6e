// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the swimops platform.
//!
//! Handlers receive an explicit request-scoped identity, enforce
//! role-based authorization, validate input against the domain rules,
//! and translate domain/persistence errors into the API contract.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod billing_export;
mod csv_preview;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, authenticate, has_role};
pub use billing_export::{export_file_name, render_billing_xml};
pub use csv_preview::{CsvFormatError, CsvPreviewResult, CsvRowResult, CsvRowStatus};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    CONTACT_TEXT_LINE, bulk_approve_time_entries, cancel_block, cancel_booking,
    cancel_conflict_session, complete_purchase_order, create_billing_period,
    create_funding_source, create_profile, create_purchase_order, create_swimmer,
    delete_funding_source, delete_profile, delete_selected_sessions, export_billing_xml,
    generate_billing, generate_sessions, get_billing_period_summary, get_time_off_conflicts,
    list_billing_periods, list_draft_batches, list_funding_sources, list_instructors,
    list_line_items, list_purchase_orders, list_time_entries, list_time_off_requests,
    open_selected_sessions, preview_roster_csv, replace_conflict_instructor, review_line_item,
    review_purchase_order, review_time_off, sign_waiver, transfer_client,
    update_billing_period_status, update_draft_session, update_funding_source,
    update_purchase_order_billing, update_purchase_order_usage, update_swimmer_enrollment,
    update_time_entry,
};
pub use request_response::*;
