// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_actor, create_test_finance, create_test_ops_admin, create_test_reason,
    create_test_store, create_test_viewer,
};
use crate::{
    ApiError, AuthenticatedActor, CreateInspectorRequest, ListInspectorsRequest,
    ListInspectorsResponse, ListLeaveRequestsResponse, MutationResponse, SubmitLeaveRequest,
    UpdateInspectorRequest, approve_leave_request, create_inspector, list_inspectors,
    list_leave_requests, reject_leave_request, submit_leave_request, update_inspector,
};
use pdi_ops::{Outcome, Store};
use pdi_ops_domain::{Inspector, InspectorStatus, LeaveStatus, OperationalState, VehicleType};

fn onboarding_form() -> CreateInspectorRequest {
    CreateInspectorRequest {
        name: String::from("Deepa R."),
        phone: String::from("9000000106"),
        email: String::from("deepa@carnalysis.local"),
        join_date: String::from("2026-02-01"),
        employment_type: String::from("contract"),
        location_ids: vec![String::from("LOC-PUN-01")],
        skills: vec![VehicleType::New],
        reason: String::from("New hire"),
        ..CreateInspectorRequest::default()
    }
}

fn leave(from_date: &str, to_date: &str, reason: &str) -> SubmitLeaveRequest {
    SubmitLeaveRequest {
        inspector_id: String::from("INSP-005"),
        from_date: from_date.to_string(),
        to_date: to_date.to_string(),
        reason: reason.to_string(),
    }
}

#[test]
fn test_create_inspector_defaults_status() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let response: MutationResponse =
        create_inspector(&mut store, &ops, onboarding_form()).unwrap();

    assert_eq!(
        response.outcome,
        Outcome::Created {
            id: String::from("INSP-006")
        }
    );
    let inspector: &Inspector = store.state().inspector("INSP-006").unwrap();
    assert_eq!(inspector.status, InspectorStatus::Active);
    assert_eq!(inspector.state, OperationalState::Idle);
    assert_eq!(inspector.utilization_pct, 0);
}

#[test]
fn test_create_inspector_requires_employment_type() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);
    let form: CreateInspectorRequest = CreateInspectorRequest {
        employment_type: String::new(),
        ..onboarding_form()
    };

    let err: ApiError = create_inspector(&mut store, &ops, form).unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "Employment type"
    ));
}

#[test]
fn test_create_inspector_with_taken_id() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);
    let form: CreateInspectorRequest = CreateInspectorRequest {
        id: Some(String::from("INSP-001")),
        ..onboarding_form()
    };

    let err: ApiError = create_inspector(&mut store, &ops, form).unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "unique_id"
    ));
}

#[test]
fn test_finance_cannot_onboard_inspectors() {
    let mut store: Store = create_test_store();
    let finance: AuthenticatedActor = create_test_finance(&store);

    let err: ApiError = create_inspector(&mut store, &finance, onboarding_form()).unwrap_err();

    assert_eq!(
        err,
        ApiError::Unauthorized {
            action: String::from("create_inspector"),
            required_permission: String::from("inspectors:create"),
        }
    );
}

#[test]
fn test_update_inspector_changes_only_given_fields() {
    let mut store: Store = create_test_store();
    let manager: AuthenticatedActor = create_test_actor(&store, "USR-LM-1");

    update_inspector(
        &mut store,
        &manager,
        "INSP-002",
        UpdateInspectorRequest {
            phone: Some(String::from("9000000199")),
            reason: String::from("Number changed"),
            ..UpdateInspectorRequest::default()
        },
    )
    .unwrap();

    let inspector: &Inspector = store.state().inspector("INSP-002").unwrap();
    assert_eq!(inspector.phone, "9000000199");
    assert_eq!(inspector.name, "Ravi K.");
}

#[test]
fn test_empty_inspector_update_records_nothing() {
    let mut store: Store = create_test_store();
    let manager: AuthenticatedActor = create_test_actor(&store, "USR-LM-1");
    let entries_before: usize = store.audit().len();

    let response: MutationResponse = update_inspector(
        &mut store,
        &manager,
        "INSP-002",
        UpdateInspectorRequest {
            reason: String::from("Nothing to change"),
            ..UpdateInspectorRequest::default()
        },
    )
    .unwrap();

    assert!(response.audit_event_ids.is_empty());
    assert_eq!(store.audit().len(), entries_before);
}

#[test]
fn test_list_inspectors_by_location() {
    let store: Store = create_test_store();
    let viewer: AuthenticatedActor = create_test_viewer(&store);

    let response: ListInspectorsResponse = list_inspectors(
        &store,
        &viewer,
        &ListInspectorsRequest {
            location_id: Some(String::from("LOC-HYD-01")),
        },
    )
    .unwrap();

    let ids: Vec<&str> = response.inspectors.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["INSP-003", "INSP-004"]);
}

#[test]
fn test_submit_leave_request() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let response: MutationResponse = submit_leave_request(
        &mut store,
        &ops,
        leave("2026-03-02", "2026-03-04", "Wedding"),
    )
    .unwrap();

    assert_eq!(
        response.outcome,
        Outcome::Created {
            id: String::from("LVR-0002")
        }
    );
    let listed: ListLeaveRequestsResponse = list_leave_requests(&store, &ops).unwrap();
    assert_eq!(listed.leave_requests.len(), 2);
    assert_eq!(listed.leave_requests[0].id, "LVR-0002");
    assert_eq!(listed.leave_requests[0].days(), 3);
}

#[test]
fn test_leave_range_must_not_end_before_start() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let backwards: ApiError =
        submit_leave_request(&mut store, &ops, leave("2026-03-04", "2026-03-02", "Travel"))
            .unwrap_err();
    let garbled: ApiError =
        submit_leave_request(&mut store, &ops, leave("03/04/2026", "2026-03-05", "Travel"))
            .unwrap_err();

    assert!(matches!(
        backwards,
        ApiError::InvalidInput { ref field, .. } if field == "to_date"
    ));
    assert!(matches!(
        garbled,
        ApiError::InvalidInput { ref field, .. } if field == "date"
    ));
}

#[test]
fn test_reject_needs_reason_and_decides_once() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let blank: ApiError = reject_leave_request(
        &mut store,
        &ops,
        "LVR-0001",
        &create_test_reason("  "),
    )
    .unwrap_err();
    reject_leave_request(
        &mut store,
        &ops,
        "LVR-0001",
        &create_test_reason("Peak week"),
    )
    .unwrap();
    let again: ApiError =
        approve_leave_request(&mut store, &ops, "LVR-0001", &create_test_reason(""))
            .unwrap_err();

    assert!(matches!(blank, ApiError::InvalidInput { .. }));
    assert!(matches!(
        again,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "leave_request_pending"
    ));
    let status: LeaveStatus = store.state().leave_request("LVR-0001").unwrap().status;
    assert_eq!(status, LeaveStatus::Rejected);
}
