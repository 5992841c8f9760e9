// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Matching of pending jobs to idle inspectors.

use pdi_ops_domain::{Inspector, OperationalState, QueueItem, QueueStatus, VehicleType};
use time::OffsetDateTime;

/// One inspector placed on one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub pdi_id: String,
    pub location_id: String,
    pub inspector_id: String,
    pub previous_inspector_id: Option<String>,
    pub previous_status: QueueStatus,
}

/// Returns true if the inspector can take the job right now: active, idle,
/// servicing the job's location, and skilled for its vehicle type.
#[must_use]
pub fn is_eligible(inspector: &Inspector, item: &QueueItem) -> bool {
    inspector.is_available()
        && inspector.services(&item.location_id)
        && inspector.has_skill(item.vehicle_type)
}

/// Picks the eligible inspector with the lowest utilization. Ties go to the
/// inspector listed first.
#[must_use]
pub fn pick_inspector(inspectors: &[Inspector], item: &QueueItem) -> Option<usize> {
    inspectors
        .iter()
        .enumerate()
        .filter(|(_, i)| is_eligible(i, item))
        .min_by_key(|(_, i)| i.utilization_pct)
        .map(|(index, _)| index)
}

/// Returns the indexes of the pending jobs matching the filters, in the
/// order they should be offered: by priority, then queue order.
#[must_use]
pub fn assignment_order(
    queue: &[QueueItem],
    location_id: Option<&str>,
    vehicle_type: Option<VehicleType>,
) -> Vec<usize> {
    let mut order: Vec<usize> = queue
        .iter()
        .enumerate()
        .filter(|(_, q)| q.is_pending())
        .filter(|(_, q)| location_id.is_none_or(|l| q.location_id == l))
        .filter(|(_, q)| vehicle_type.is_none_or(|t| q.vehicle_type == t))
        .map(|(index, _)| index)
        .collect();
    // sort_by_key is stable
    order.sort_by_key(|&index| queue[index].priority.rank());
    order
}

/// Assigns as many pending jobs as possible.
///
/// Each assignment marks the inspector busy before the next job is
/// considered, so one inspector takes at most one job per run. Jobs with no
/// eligible inspector are skipped.
pub fn auto_assign(
    queue: &mut [QueueItem],
    inspectors: &mut [Inspector],
    location_id: Option<&str>,
    vehicle_type: Option<VehicleType>,
    now: OffsetDateTime,
) -> Vec<Assignment> {
    let mut assignments: Vec<Assignment> = Vec::new();
    for index in assignment_order(queue, location_id, vehicle_type) {
        let item: &mut QueueItem = &mut queue[index];
        let Some(pick) = pick_inspector(inspectors, item) else {
            continue;
        };
        let inspector: &mut Inspector = &mut inspectors[pick];

        let assignment = Assignment {
            pdi_id: item.id.clone(),
            location_id: item.location_id.clone(),
            inspector_id: inspector.id.clone(),
            previous_inspector_id: item.assigned_inspector_id.clone(),
            previous_status: item.status,
        };
        item.assigned_inspector_id = Some(inspector.id.clone());
        item.status = QueueStatus::InProgress;
        inspector.set_state(OperationalState::Busy, now);
        assignments.push(assignment);
    }
    assignments
}
