// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, LeaveStatus};

#[test]
fn test_missing_field_display() {
    let err = DomainError::MissingField { field: "Email" };
    assert_eq!(err.to_string(), "Email is required");
}

#[test]
fn test_not_found_display() {
    let err = DomainError::NotFound {
        entity: "Inspector",
        id: String::from("INSP-404"),
    };
    assert_eq!(err.to_string(), "Inspector 'INSP-404' not found");
}

#[test]
fn test_payment_required_display_names_item() {
    let err = DomainError::PaymentRequiredBeforeClose {
        pdi_id: String::from("PDI-24001"),
    };
    assert!(err.to_string().contains("PDI-24001"));
    assert!(err.to_string().starts_with("Payment required"));
}

#[test]
fn test_leave_not_pending_display_includes_status() {
    let err = DomainError::LeaveRequestNotPending {
        request_id: String::from("LVR-0001"),
        status: LeaveStatus::Approved,
    };
    assert_eq!(
        err.to_string(),
        "Leave request 'LVR-0001' is approved; only pending requests can be decided"
    );
}

#[test]
fn test_role_in_use_display() {
    let err = DomainError::RoleInUse {
        role_id: String::from("finance"),
        user_count: 2,
    };
    assert!(err.to_string().contains("2 user(s)"));
}

#[test]
fn test_domain_error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&DomainError::InvalidTimezone(String::from("Mars/Olympus")));
}
