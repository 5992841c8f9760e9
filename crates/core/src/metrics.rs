// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard aggregates.
//!
//! Everything here is a pure function of the state and the read instant.
//! Nothing is cached; every read recomputes.

use crate::state::State;
use num_traits::ToPrimitive;
use pdi_ops_domain::{
    BusinessCalendar, Inspector, Location, QueueItem, QueueStatus, VehicleType,
};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

/// Pending items at a location that trigger an overload alert.
pub const OVERLOAD_QUEUE_LENGTH: usize = 6;
/// Pending items at a location that make the overload alert critical.
pub const CRITICAL_QUEUE_LENGTH: usize = 8;
/// Idle minutes after which an inspector is flagged.
pub const IDLE_ALERT_MINUTES: i64 = 20;
/// Idle minutes after which the idle alert becomes a warning.
pub const IDLE_WARNING_MINUTES: i64 = 40;
/// Number of hourly buckets in the throughput trend.
pub const TREND_HOURS: i64 = 12;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_inspections_today: usize,
    pub queue_length: usize,
    pub postponed_count: usize,
    pub avg_wait_minutes: u32,
    pub inspector_utilization_pct: u32,
    pub idle_inspectors_count: usize,
    pub sla_breaches_count: usize,
    pub sla_met_pct: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    QueueOverload,
    InspectorIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A condition that needs an operator's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub location_id: String,
    pub title: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

/// Queue occupancy of one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueLoad {
    pub location_id: String,
    pub name: String,
    pub waiting: usize,
    pub in_progress: usize,
    pub postponed: usize,
}

/// One slice of the vehicle-type pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRatio {
    pub name: &'static str,
    pub value: usize,
}

/// Closures within one business-local hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub inspections: usize,
    pub avg_wait_minutes: u32,
}

/// Everything the dashboard screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub kpi: Kpis,
    pub alerts: Vec<Alert>,
    pub queue_load: Vec<QueueLoad>,
    pub vehicle_ratio: Vec<VehicleRatio>,
    pub trend: Vec<TrendPoint>,
}

/// Mean of `total / count`, rounded half up. Zero when `count` is zero.
fn rounded_mean(total: u64, count: usize) -> u32 {
    let count: u64 = count.to_u64().unwrap_or(0);
    if count == 0 {
        return 0;
    }
    let mean: u64 = (total.saturating_mul(2) + count) / (count * 2);
    mean.to_u32().unwrap_or(u32::MAX)
}

fn minutes(value: i64) -> u64 {
    value.to_u64().unwrap_or(0)
}

fn in_scope(item: &QueueItem, location_id: Option<&str>) -> bool {
    location_id.is_none_or(|l| item.location_id == l)
}

fn average_wait<'a>(items: impl Iterator<Item = &'a QueueItem>, now: OffsetDateTime) -> u32 {
    let mut total: u64 = 0;
    let mut count: usize = 0;
    for item in items {
        total += minutes(item.age_minutes(now));
        count += 1;
    }
    rounded_mean(total, count)
}

fn is_breach(state: &State, item: &QueueItem, now: OffsetDateTime) -> bool {
    state
        .location(&item.location_id)
        .is_some_and(|l| item.age_minutes(now) > i64::from(l.sla_minutes))
}

/// Computes the headline numbers, optionally for one location.
#[must_use]
pub fn kpis(
    state: &State,
    now: OffsetDateTime,
    calendar: &BusinessCalendar,
    location_id: Option<&str>,
) -> Kpis {
    let queue: Vec<&QueueItem> = state
        .queue
        .iter()
        .filter(|q| in_scope(q, location_id))
        .collect();
    let inspectors: Vec<&Inspector> = state
        .inspectors
        .iter()
        .filter(|i| location_id.is_none_or(|l| i.services(l)))
        .collect();

    let pending: Vec<&QueueItem> = queue.iter().copied().filter(|q| q.is_pending()).collect();
    let in_progress: usize = queue
        .iter()
        .filter(|q| q.status == QueueStatus::InProgress)
        .count();
    let closed_today: usize = queue
        .iter()
        .filter(|q| q.status == QueueStatus::Closed)
        .filter(|q| {
            q.closed_at
                .is_some_and(|at| calendar.same_business_day(at, now))
        })
        .count();

    let utilization_total: u64 = inspectors
        .iter()
        .map(|i| u64::from(i.utilization_pct))
        .sum();
    let breaches: usize = pending
        .iter()
        .filter(|q| is_breach(state, q, now))
        .count();
    let breach_pct: u32 = rounded_mean(
        breaches.to_u64().unwrap_or(0) * 100,
        pending.len().max(1),
    );

    Kpis {
        total_inspections_today: closed_today + in_progress,
        queue_length: pending.len(),
        postponed_count: queue
            .iter()
            .filter(|q| q.status == QueueStatus::Postponed)
            .count(),
        avg_wait_minutes: average_wait(pending.iter().copied(), now),
        inspector_utilization_pct: rounded_mean(utilization_total, inspectors.len()),
        idle_inspectors_count: inspectors.iter().filter(|i| i.is_available()).count(),
        sla_breaches_count: breaches,
        sla_met_pct: 100_u32.saturating_sub(breach_pct),
    }
}

fn overload_alert(state: &State, location: &Location, now: OffsetDateTime) -> Option<Alert> {
    let pending: Vec<&QueueItem> = state
        .queue
        .iter()
        .filter(|q| q.location_id == location.id && q.is_pending())
        .collect();
    let avg_wait: u32 = average_wait(pending.iter().copied(), now);
    // avg wait at or above 80% of the SLA
    let slow: bool = u64::from(avg_wait) * 5 >= u64::from(location.sla_minutes) * 4;
    if pending.len() < OVERLOAD_QUEUE_LENGTH && !slow {
        return None;
    }

    Some(Alert {
        id: format!("ALERT-QL-{}", location.id),
        alert_type: AlertType::QueueOverload,
        severity: if pending.len() >= CRITICAL_QUEUE_LENGTH {
            Severity::Critical
        } else {
            Severity::Warning
        },
        location_id: location.id.clone(),
        title: String::from("Queue overload risk"),
        message: format!(
            "{}: {} waiting, avg wait {avg_wait}m",
            location.name,
            pending.len()
        ),
        at: now,
    })
}

fn idle_alerts(state: &State, location: &Location, now: OffsetDateTime) -> Vec<Alert> {
    state
        .inspectors
        .iter()
        .filter(|i| i.is_available() && i.services(&location.id))
        .filter_map(|i| {
            let idle_minutes: i64 = i.minutes_in_state(now);
            if idle_minutes < IDLE_ALERT_MINUTES {
                return None;
            }
            Some(Alert {
                id: format!("ALERT-IDLE-{}", i.id),
                alert_type: AlertType::InspectorIdle,
                severity: if idle_minutes >= IDLE_WARNING_MINUTES {
                    Severity::Warning
                } else {
                    Severity::Info
                },
                location_id: location.id.clone(),
                title: String::from("Inspector idle"),
                message: format!("{} idle for {idle_minutes}m", i.name),
                at: now,
            })
        })
        .collect()
}

/// Builds the alert list, location by location.
///
/// An inspector servicing several locations is reported once per location.
#[must_use]
pub fn alerts(state: &State, now: OffsetDateTime, location_id: Option<&str>) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = Vec::new();
    for location in state
        .locations
        .iter()
        .filter(|l| location_id.is_none_or(|id| l.id == id))
    {
        alerts.extend(overload_alert(state, location, now));
        alerts.extend(idle_alerts(state, location, now));
    }
    alerts
}

/// Waiting, in-progress and postponed counts for every location.
#[must_use]
pub fn queue_load(state: &State) -> Vec<QueueLoad> {
    state
        .locations
        .iter()
        .map(|l| {
            let count = |status: QueueStatus| {
                state
                    .queue
                    .iter()
                    .filter(|q| q.location_id == l.id && q.status == status)
                    .count()
            };
            QueueLoad {
                location_id: l.id.clone(),
                name: l.name.clone(),
                waiting: count(QueueStatus::Pending),
                in_progress: count(QueueStatus::InProgress),
                postponed: count(QueueStatus::Postponed),
            }
        })
        .collect()
}

/// New versus pre-owned split of the items that are not closed.
#[must_use]
pub fn vehicle_ratio(state: &State) -> Vec<VehicleRatio> {
    let open = |vehicle_type: VehicleType| {
        state
            .queue
            .iter()
            .filter(|q| q.status != QueueStatus::Closed && q.vehicle_type == vehicle_type)
            .count()
    };
    vec![
        VehicleRatio {
            name: "New",
            value: open(VehicleType::New),
        },
        VehicleRatio {
            name: "Pre-owned",
            value: open(VehicleType::PreOwned),
        },
    ]
}

/// Closures per business-local hour over the last `TREND_HOURS` hours,
/// oldest first. The current hour is the last bucket.
#[must_use]
pub fn throughput_trend(
    state: &State,
    now: OffsetDateTime,
    calendar: &BusinessCalendar,
    location_id: Option<&str>,
) -> Vec<TrendPoint> {
    let current_hour: OffsetDateTime = calendar.hour_start(now);
    (0..TREND_HOURS)
        .rev()
        .map(|hours_back| {
            let start: OffsetDateTime = current_hour - Duration::hours(hours_back);
            let end: OffsetDateTime = start + Duration::hours(1);
            let mut turnaround_total: u64 = 0;
            let mut inspections: usize = 0;
            for item in state.queue.iter().filter(|q| in_scope(q, location_id)) {
                let Some(closed_at) = item.closed_at else {
                    continue;
                };
                if item.status != QueueStatus::Closed || closed_at < start || closed_at >= end {
                    continue;
                }
                turnaround_total += minutes((closed_at - item.created_at).whole_minutes());
                inspections += 1;
            }
            TrendPoint {
                label: calendar.hour_label(start),
                inspections,
                avg_wait_minutes: rounded_mean(turnaround_total, inspections),
            }
        })
        .collect()
}

/// Assembles the full dashboard.
#[must_use]
pub fn dashboard(
    state: &State,
    now: OffsetDateTime,
    calendar: &BusinessCalendar,
    location_id: Option<&str>,
) -> Dashboard {
    Dashboard {
        kpi: kpis(state, now, calendar, location_id),
        alerts: alerts(state, now, location_id),
        queue_load: queue_load(state),
        vehicle_ratio: vehicle_ratio(state),
        trend: throughput_trend(state, now, calendar, location_id),
    }
}
