// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::metrics::{
    Alert, AlertType, Kpis, QueueLoad, Severity, TrendPoint, VehicleRatio, alerts, kpis,
    queue_load, throughput_trend, vehicle_ratio,
};
use crate::tests::helpers::{apply_ok, create_test_state, test_now};
use crate::{Command, State};
use pdi_ops_domain::{BusinessCalendar, QueueItem, QueueStatus};
use time::Duration;

fn closed_state() -> State {
    let state: State = create_test_state();
    apply_ok(
        &state,
        Command::SetQueueStatus {
            pdi_id: String::from("PDI-24003"),
            status: QueueStatus::Closed,
        },
    )
    .new_state
}

/// Adds `count` fresh pending walk-ins at Pune.
fn crowd_pune(state: &mut State, count: usize) {
    let template: QueueItem = state.queue_item("PDI-24005").unwrap().clone();
    for n in 0..count {
        state.queue.push(QueueItem {
            id: format!("PDI-9{n:04}"),
            ..template.clone()
        });
    }
}

#[test]
fn test_global_kpis_on_seed() {
    let state: State = create_test_state();

    let kpi: Kpis = kpis(&state, test_now(), &BusinessCalendar::default(), None);

    assert_eq!(
        kpi,
        Kpis {
            total_inspections_today: 1,
            queue_length: 4,
            postponed_count: 0,
            avg_wait_minutes: 31,
            inspector_utilization_pct: 61,
            idle_inspectors_count: 1,
            sla_breaches_count: 1,
            sla_met_pct: 75,
        }
    );
}

#[test]
fn test_location_kpis_only_count_that_location() {
    let state: State = create_test_state();

    let kpi: Kpis = kpis(
        &state,
        test_now(),
        &BusinessCalendar::default(),
        Some("LOC-BLR-01"),
    );

    assert_eq!(kpi.queue_length, 2);
    assert_eq!(kpi.avg_wait_minutes, 45);
    assert_eq!(kpi.inspector_utilization_pct, 65);
    assert_eq!(kpi.sla_met_pct, 50);
    assert_eq!(kpi.total_inspections_today, 0);
}

#[test]
fn test_empty_queue_meets_sla() {
    let mut state: State = create_test_state();
    state.queue.clear();

    let kpi: Kpis = kpis(&state, test_now(), &BusinessCalendar::default(), None);

    assert_eq!(kpi.queue_length, 0);
    assert_eq!(kpi.avg_wait_minutes, 0);
    assert_eq!(kpi.sla_met_pct, 100);
}

#[test]
fn test_closing_counts_as_done_today() {
    let state: State = closed_state();

    let kpi: Kpis = kpis(&state, test_now(), &BusinessCalendar::default(), None);

    assert_eq!(kpi.total_inspections_today, 1);
    assert_eq!(kpi.queue_length, 4);
}

#[test]
fn test_seed_alerts_flag_slow_queue_and_idle_inspector() {
    let state: State = create_test_state();

    let list: Vec<Alert> = alerts(&state, test_now(), None);

    let ids: Vec<&str> = list.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["ALERT-QL-LOC-BLR-01", "ALERT-IDLE-INSP-002"]);
    assert_eq!(list[0].alert_type, AlertType::QueueOverload);
    assert_eq!(list[0].severity, Severity::Warning);
    assert_eq!(list[0].message, "Bengaluru - HSR: 2 waiting, avg wait 45m");
    assert_eq!(list[1].severity, Severity::Info);
    assert_eq!(list[1].message, "Ravi K. idle for 30m");
}

#[test]
fn test_alerts_can_be_scoped_to_location() {
    let state: State = create_test_state();

    let list: Vec<Alert> = alerts(&state, test_now(), Some("LOC-HYD-01"));

    assert!(list.is_empty());
}

#[test]
fn test_long_queue_escalates_to_critical() {
    let mut warning: State = create_test_state();
    crowd_pune(&mut warning, 5);
    let mut critical: State = create_test_state();
    crowd_pune(&mut critical, 7);

    let warning_alerts: Vec<Alert> = alerts(&warning, test_now(), Some("LOC-PUN-01"));
    let critical_alerts: Vec<Alert> = alerts(&critical, test_now(), Some("LOC-PUN-01"));

    assert_eq!(warning_alerts[0].severity, Severity::Warning);
    assert_eq!(
        warning_alerts[0].message,
        "Pune - Hinjewadi: 6 waiting, avg wait 15m"
    );
    assert_eq!(critical_alerts[0].severity, Severity::Critical);
}

#[test]
fn test_long_idle_becomes_warning() {
    let mut state: State = create_test_state();
    state.inspectors[1].last_state_change_at = test_now() - Duration::minutes(45);

    let list: Vec<Alert> = alerts(&state, test_now(), Some("LOC-BLR-01"));

    let idle: &Alert = list
        .iter()
        .find(|a| a.alert_type == AlertType::InspectorIdle)
        .unwrap();
    assert_eq!(idle.severity, Severity::Warning);
}

#[test]
fn test_queue_load_covers_every_location() {
    let state: State = create_test_state();

    let load: Vec<QueueLoad> = queue_load(&state);

    let hyd: &QueueLoad = load.iter().find(|l| l.location_id == "LOC-HYD-01").unwrap();
    assert_eq!(load.len(), 3);
    assert_eq!(hyd.waiting, 1);
    assert_eq!(hyd.in_progress, 1);
    assert_eq!(hyd.postponed, 0);
}

#[test]
fn test_vehicle_ratio_ignores_closed_items() {
    let state: State = closed_state();

    let ratio: Vec<VehicleRatio> = vehicle_ratio(&state);

    assert_eq!(
        ratio,
        vec![
            VehicleRatio {
                name: "New",
                value: 3
            },
            VehicleRatio {
                name: "Pre-owned",
                value: 1
            },
        ]
    );
}

#[test]
fn test_trend_buckets_closures_by_local_hour() {
    let state: State = closed_state();

    let trend: Vec<TrendPoint> =
        throughput_trend(&state, test_now(), &BusinessCalendar::default(), None);

    assert_eq!(trend.len(), 12);
    assert_eq!(trend[0].label, "00:00");
    let last: &TrendPoint = &trend[11];
    assert_eq!(last.label, "11:00");
    assert_eq!(last.inspections, 1);
    assert_eq!(last.avg_wait_minutes, 80);
    assert_eq!(trend.iter().map(|p| p.inspections).sum::<usize>(), 1);
}

#[test]
fn test_trend_of_other_location_is_empty() {
    let state: State = closed_state();

    let trend: Vec<TrendPoint> = throughput_trend(
        &state,
        test_now(),
        &BusinessCalendar::default(),
        Some("LOC-PUN-01"),
    );

    assert!(trend.iter().all(|p| p.inspections == 0 && p.avg_wait_minutes == 0));
}

/// Leaves a single pending job at `location_id`, created `age` minutes ago.
fn single_pending(location_id: &str, pdi_id: &str, age: i64) -> State {
    let mut state: State = create_test_state();
    let mut item: QueueItem = state.queue_item(pdi_id).unwrap().clone();
    item.created_at = test_now() - Duration::minutes(age);
    state.queue.retain(|q| q.location_id != location_id);
    state.queue.push(item);
    state
}

fn overload_alerts(state: &State, location_id: &str) -> Vec<Alert> {
    alerts(state, test_now(), Some(location_id))
        .into_iter()
        .filter(|a| a.alert_type == AlertType::QueueOverload)
        .collect()
}

#[test]
fn test_job_past_sla_is_a_breach() {
    // Bengaluru allows 45 minutes.
    let state: State = single_pending("LOC-BLR-01", "PDI-24001", 50);

    let kpi: Kpis = kpis(
        &state,
        test_now(),
        &BusinessCalendar::default(),
        Some("LOC-BLR-01"),
    );

    assert_eq!(kpi.queue_length, 1);
    assert_eq!(kpi.sla_breaches_count, 1);
    assert_eq!(kpi.sla_met_pct, 0);
}

#[test]
fn test_job_exactly_at_sla_is_not_a_breach() {
    let state: State = single_pending("LOC-BLR-01", "PDI-24001", 45);

    let kpi: Kpis = kpis(
        &state,
        test_now(),
        &BusinessCalendar::default(),
        Some("LOC-BLR-01"),
    );

    assert_eq!(kpi.sla_breaches_count, 0);
    assert_eq!(kpi.sla_met_pct, 100);
}

#[test]
fn test_wait_at_four_fifths_of_sla_overloads() {
    // Pune allows 55 minutes; 80% is 44.
    let at_threshold: State = single_pending("LOC-PUN-01", "PDI-24005", 44);
    let below_threshold: State = single_pending("LOC-PUN-01", "PDI-24005", 43);

    let raised: Vec<Alert> = overload_alerts(&at_threshold, "LOC-PUN-01");

    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].severity, Severity::Warning);
    assert!(overload_alerts(&below_threshold, "LOC-PUN-01").is_empty());
}

#[test]
fn test_six_waiting_is_the_overload_threshold() {
    let mut five: State = create_test_state();
    crowd_pune(&mut five, 4);
    let mut six: State = create_test_state();
    crowd_pune(&mut six, 5);

    assert!(overload_alerts(&five, "LOC-PUN-01").is_empty());
    let raised: Vec<Alert> = overload_alerts(&six, "LOC-PUN-01");
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].severity, Severity::Warning);
}
