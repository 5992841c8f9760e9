// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_finance, create_test_intake, create_test_ops_admin, create_test_reason,
    create_test_store, create_test_viewer,
};
use crate::{
    ApiError, AssignInspectorRequest, AuthenticatedActor, AutoAssignRequest,
    CreateQueueItemRequest, ListCommissionsRequest, ListCommissionsResponse, ListQueueRequest,
    ListQueueResponse, MutationResponse, OverridePriceRequest, SetQueueStatusRequest,
    approve_commission, assign_inspector, auto_assign, create_queue_item, get_dashboard,
    list_audit, list_commissions, list_queue, override_price, record_payment, set_queue_status,
};
use pdi_ops::{Dashboard, Outcome, Store};
use pdi_ops_audit::{AuditEntry, AuditFilter};
use pdi_ops_domain::{CommissionStatus, QueueItem, QueueStatus, VehicleType};

fn queue_item<'a>(store: &'a Store, id: &str) -> &'a QueueItem {
    store.state().queue_item(id).unwrap()
}

#[test]
fn test_create_queue_item_returns_id_and_audit_ids() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let response: MutationResponse =
        create_queue_item(&mut store, &ops, create_test_intake()).unwrap();

    assert_eq!(
        response.outcome,
        Outcome::Created {
            id: String::from("PDI-24006")
        }
    );
    assert_eq!(response.audit_event_ids, vec![String::from("EVT-1002")]);
    assert_eq!(response.message, "Created 'PDI-24006'");

    let item: &QueueItem = queue_item(&store, "PDI-24006");
    assert_eq!(item.vehicle_number, "MH12AB9090");
    assert_eq!(item.price_inr, store.state().pricing.default_inr);
    assert_eq!(store.state().queue[0].id, "PDI-24006");
}

#[test]
fn test_create_queue_item_requires_customer_name() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);
    let mut intake: CreateQueueItemRequest = create_test_intake();
    intake.customer_name = String::from("   ");

    let err: ApiError = create_queue_item(&mut store, &ops, intake).unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "Customer name"
    ));
}

#[test]
fn test_close_requires_payment() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let err: ApiError = set_queue_status(
        &mut store,
        &ops,
        "PDI-24001",
        SetQueueStatusRequest {
            status: QueueStatus::Closed,
            reason: String::new(),
        },
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "payment_before_close"
    ));
    assert_eq!(queue_item(&store, "PDI-24001").status, QueueStatus::Pending);
}

#[test]
fn test_payment_requires_assigned_inspector() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let err: ApiError =
        record_payment(&mut store, &ops, "PDI-24001", &create_test_reason("")).unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "inspector_before_payment"
    ));
}

#[test]
fn test_assign_pay_and_close() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    assign_inspector(
        &mut store,
        &ops,
        "PDI-24001",
        AssignInspectorRequest {
            inspector_id: Some(String::from(" INSP-002 ")),
            reason: String::from("Customer waiting"),
        },
    )
    .unwrap();
    record_payment(&mut store, &ops, "PDI-24001", &create_test_reason("Card")).unwrap();
    set_queue_status(
        &mut store,
        &ops,
        "PDI-24001",
        SetQueueStatusRequest {
            status: QueueStatus::Closed,
            reason: String::new(),
        },
    )
    .unwrap();

    let item: &QueueItem = queue_item(&store, "PDI-24001");
    assert_eq!(item.status, QueueStatus::Closed);
    assert_eq!(item.assigned_inspector_id.as_deref(), Some("INSP-002"));
    assert!(item.payment_at.is_some());
    assert!(store.state().commission_for("PDI-24001").is_some());
}

#[test]
fn test_blank_inspector_id_unassigns() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let response: MutationResponse = assign_inspector(
        &mut store,
        &ops,
        "PDI-24003",
        AssignInspectorRequest {
            inspector_id: Some(String::from("  ")),
            reason: String::from("Inspector called away"),
        },
    )
    .unwrap();

    let item: &QueueItem = queue_item(&store, "PDI-24003");
    assert_eq!(item.assigned_inspector_id, None);
    assert_eq!(item.status, QueueStatus::Pending);
    let latest_action: &str = &store.audit().latest().unwrap().event.action;
    assert_eq!(latest_action, "manual_unassign");
    assert_eq!(response.audit_event_ids.len(), 1);
}

#[test]
fn test_assign_unknown_inspector_is_not_found() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let err: ApiError = assign_inspector(
        &mut store,
        &ops,
        "PDI-24001",
        AssignInspectorRequest {
            inspector_id: Some(String::from("INSP-404")),
            reason: String::new(),
        },
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Inspector"
    ));
}

#[test]
fn test_auto_assign_reports_batch() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let response: MutationResponse =
        auto_assign(&mut store, &ops, AutoAssignRequest::default()).unwrap();

    let Outcome::Assigned {
        assigned,
        correlation_id,
    } = response.outcome
    else {
        panic!("expected an assignment outcome");
    };
    assert_eq!(assigned, 1);
    assert_eq!(response.audit_event_ids.len(), 1);
    assert!(correlation_id.starts_with("AUTO-"));
}

#[test]
fn test_list_queue_filters() {
    let store: Store = create_test_store();
    let viewer: AuthenticatedActor = create_test_viewer(&store);

    let bengaluru: ListQueueResponse = list_queue(
        &store,
        &viewer,
        &ListQueueRequest {
            location_id: Some(String::from("LOC-BLR-01")),
            vehicle_type: None,
        },
    )
    .unwrap();
    let new_in_bengaluru: ListQueueResponse = list_queue(
        &store,
        &viewer,
        &ListQueueRequest {
            location_id: Some(String::from("LOC-BLR-01")),
            vehicle_type: Some(VehicleType::New),
        },
    )
    .unwrap();

    assert_eq!(bengaluru.queue.len(), 2);
    assert_eq!(bengaluru.inspectors.len(), 2);
    assert_eq!(bengaluru.locations.len(), 3);
    assert_eq!(new_in_bengaluru.queue.len(), 1);
    assert_eq!(new_in_bengaluru.queue[0].id, "PDI-24001");
}

#[test]
fn test_unknown_location_is_not_found() {
    let store: Store = create_test_store();
    let viewer: AuthenticatedActor = create_test_viewer(&store);

    let dashboard: Result<Dashboard, ApiError> = get_dashboard(&store, &viewer, Some("LOC-XXX"));
    let queue: Result<ListQueueResponse, ApiError> = list_queue(
        &store,
        &viewer,
        &ListQueueRequest {
            location_id: Some(String::from("LOC-XXX")),
            vehicle_type: None,
        },
    );

    assert!(matches!(dashboard, Err(ApiError::ResourceNotFound { .. })));
    assert!(matches!(queue, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_dashboard_for_location() {
    let store: Store = create_test_store();
    let viewer: AuthenticatedActor = create_test_viewer(&store);

    let dashboard: Dashboard = get_dashboard(&store, &viewer, Some("LOC-HYD-01")).unwrap();

    assert_eq!(dashboard.queue_load.len(), 3);
    assert_eq!(dashboard.trend.len(), 12);
}

#[test]
fn test_finance_cannot_dispatch() {
    let mut store: Store = create_test_store();
    let finance: AuthenticatedActor = create_test_finance(&store);

    let err: ApiError =
        auto_assign(&mut store, &finance, AutoAssignRequest::default()).unwrap_err();

    assert_eq!(
        err,
        ApiError::Unauthorized {
            action: String::from("auto_assign"),
            required_permission: String::from("queue:update"),
        }
    );
}

#[test]
fn test_finance_overrides_price() {
    let mut store: Store = create_test_store();
    let finance: AuthenticatedActor = create_test_finance(&store);

    override_price(
        &mut store,
        &finance,
        "PDI-24002",
        OverridePriceRequest {
            price_inr: 700,
            reason: String::from("Second opinion requested"),
        },
    )
    .unwrap();

    assert_eq!(queue_item(&store, "PDI-24002").price_inr, 700);
}

#[test]
fn test_list_and_approve_commissions() {
    let mut store: Store = create_test_store();
    let finance: AuthenticatedActor = create_test_finance(&store);

    let all: ListCommissionsResponse =
        list_commissions(&store, &finance, &ListCommissionsRequest::default()).unwrap();
    let hyderabad: ListCommissionsResponse = list_commissions(
        &store,
        &finance,
        &ListCommissionsRequest {
            location_id: Some(String::from("LOC-HYD-01")),
        },
    )
    .unwrap();
    approve_commission(&mut store, &finance, "COM-9001", &create_test_reason("")).unwrap();

    assert_eq!(all.commissions.len(), 2);
    assert_eq!(hyderabad.commissions.len(), 1);
    assert_eq!(hyderabad.commissions[0].id, "COM-9002");
    assert_eq!(
        store.state().commission("COM-9001").unwrap().status,
        CommissionStatus::Approved
    );
}

#[test]
fn test_list_audit_filters_by_action() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);
    create_queue_item(&mut store, &ops, create_test_intake()).unwrap();
    let viewer: AuthenticatedActor = create_test_viewer(&store);

    let filter: AuditFilter = AuditFilter {
        action: Some(String::from("create_queue_item")),
        ..AuditFilter::default()
    };
    let entries: Vec<AuditEntry> = list_audit(&store, &viewer, &filter).unwrap().entries;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event.entity.id, "PDI-24006");
    assert_eq!(entries[0].event.actor.user_id, "USR-OPS-1");
    assert_eq!(entries[0].event.reason, "Walk-in");
}
