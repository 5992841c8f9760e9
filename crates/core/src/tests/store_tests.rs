// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{ScriptedDrift, create_test_actor, create_test_store, test_now};
use crate::{
    Command, CoreError, Dashboard, FixedClock, Outcome, State, Store, StoreConfig, UserPatch,
};
use pdi_ops_audit::{Actor, AuditEntry, AuditFilter};
use pdi_ops_domain::{DomainError, Priority, QueueStatus};
use std::sync::Arc;
use time::Duration;

#[test]
fn test_seeded_store_starts_with_history() {
    let (store, _clock) = create_test_store();

    let latest: &AuditEntry = store.audit().latest().unwrap();

    assert_eq!(store.audit().len(), 1);
    assert_eq!(latest.id, "EVT-1001");
    assert_eq!(latest.event.correlation_id.as_deref(), Some("BULK-0001"));
    assert_eq!(latest.event.at, test_now() - Duration::minutes(18));
}

#[test]
fn test_execute_commits_state_and_audit() {
    let (mut store, _clock) = create_test_store();

    let outcome: Outcome = store
        .execute(
            Command::SetPriority {
                pdi_id: String::from("PDI-24005"),
                priority: Priority::P0,
            },
            create_test_actor(),
            "  VIP walk-in ",
        )
        .unwrap();

    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(
        store.state().queue_item("PDI-24005").unwrap().priority,
        Priority::P0
    );
    let latest: &AuditEntry = store.audit().latest().unwrap();
    assert_eq!(latest.id, "EVT-1002");
    assert_eq!(latest.event.reason, "VIP walk-in");
    assert_eq!(latest.event.location_id.as_deref(), Some("LOC-PUN-01"));
}

#[test]
fn test_failed_execute_changes_nothing() {
    let (mut store, _clock) = create_test_store();
    let before: State = store.state().clone();

    let result = store.execute(
        Command::SetQueueStatus {
            pdi_id: String::from("PDI-24001"),
            status: QueueStatus::Closed,
        },
        create_test_actor(),
        "Done",
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::PaymentRequiredBeforeClose { .. }
        ))
    ));
    assert_eq!(store.state(), &before);
    assert_eq!(store.audit().len(), 1);
}

#[test]
fn test_events_use_clock_time() {
    let (mut store, clock) = create_test_store();
    clock.advance(Duration::minutes(7));

    store
        .execute(
            Command::SetDefaultPricing { default_inr: 550 },
            create_test_actor(),
            "Price revision",
        )
        .unwrap();

    let latest: &AuditEntry = store.audit().latest().unwrap();
    assert_eq!(latest.event.at, test_now() + Duration::minutes(7));
    assert_eq!(store.state().pricing.default_inr, 550);
}

#[test]
fn test_auto_assign_entries_share_correlation() {
    let (mut store, _clock) = create_test_store();

    let outcome: Outcome = store
        .execute(
            Command::AutoAssign {
                location_id: None,
                vehicle_type: None,
            },
            create_test_actor(),
            "",
        )
        .unwrap();

    let Outcome::Assigned { correlation_id, .. } = outcome else {
        panic!("expected an assignment outcome");
    };
    let filter = AuditFilter {
        correlation_id: Some(correlation_id),
        ..AuditFilter::default()
    };
    assert_eq!(store.audit().query(&filter).len(), 1);
}

#[test]
fn test_actor_resolves_known_active_user() {
    let (store, _clock) = create_test_store();

    let actor: Actor = store.actor("USR-FIN-1").unwrap();

    assert_eq!(actor.name, "Finance");
    assert_eq!(actor.role, "finance");
}

#[test]
fn test_actor_rejects_unknown_and_inactive_users() {
    let (mut store, _clock) = create_test_store();
    store
        .execute(
            Command::UpdateUser {
                user_id: String::from("USR-RO-1"),
                patch: UserPatch {
                    active: Some(false),
                    ..UserPatch::default()
                },
            },
            create_test_actor(),
            "Left the company",
        )
        .unwrap();

    assert_eq!(
        store.actor("USR-NOPE"),
        Err(CoreError::UnknownActor(String::from("USR-NOPE")))
    );
    assert_eq!(
        store.actor("USR-RO-1"),
        Err(CoreError::InactiveActor(String::from("USR-RO-1")))
    );
}

#[test]
fn test_dashboard_reads_at_clock_time() {
    let (store, clock) = create_test_store();
    clock.advance(Duration::minutes(20));

    let dashboard: Dashboard = store.dashboard(None);

    // Every pending job is 20 minutes older.
    assert_eq!(dashboard.kpi.avg_wait_minutes, 51);
    assert_eq!(dashboard.queue_load.len(), 3);
    assert_eq!(dashboard.trend.len(), 12);
}

#[test]
fn test_drift_is_not_audited() {
    let (mut store, _clock) = create_test_store();
    let mut source = ScriptedDrift::new(&[3, 99, 3, 99, 3, 99, 3, 99, 0, 0, 0, 0, 0, 0]);

    let report = store.drift(&mut source);

    assert_eq!(report.new_item.as_deref(), Some("PDI-24006"));
    assert_eq!(store.state().queue.len(), 6);
    assert_eq!(store.audit().len(), 1);
}

#[test]
fn test_unseeded_store_has_empty_log() {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    let store = Store::new(State::new(Vec::new()), clock, StoreConfig::default());

    assert!(store.audit().is_empty());
    assert!(store.dashboard(None).alerts.is_empty());
}
