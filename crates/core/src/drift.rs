// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live-data simulation for demo deployments.
//!
//! A drift tick nudges inspector utilization, occasionally flips an
//! inspector between idle and busy, and occasionally drops a walk-in job
//! into the queue. Ticks are not audited.

use crate::state::State;
use num_traits::ToPrimitive;
use pdi_ops_domain::{Priority, QueueItem, QueueStatus, VehicleType};
use time::OffsetDateTime;

const UTILIZATION_MIN: i32 = 10;
const UTILIZATION_MAX: i32 = 95;
const UTILIZATION_STEP: u32 = 3;
const STATE_FLIP_PCT: u32 = 8;
const NEW_ITEM_PCT: u32 = 18;
const NEW_VEHICLE_PCT: u32 = 55;
const WALK_IN_CUSTOMER: &str = "Walk-in customer";

/// Source of randomness for drift ticks.
pub trait DriftSource: Send + std::fmt::Debug {
    /// Returns a value in `0..bound`. `bound` is never zero.
    fn below(&mut self, bound: u32) -> u32;

    /// Returns true with the given percentage probability.
    fn chance(&mut self, pct: u32) -> bool {
        self.below(100) < pct
    }
}

/// Drift backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDrift;

impl DriftSource for RandomDrift {
    fn below(&mut self, bound: u32) -> u32 {
        rand::random::<u32>() % bound.max(1)
    }
}

/// What one tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftReport {
    /// Inspectors whose utilization moved.
    pub utilization_changed: usize,
    /// Inspectors that flipped between idle and busy.
    pub state_flips: Vec<String>,
    /// The walk-in job added to the queue, if any.
    pub new_item: Option<String>,
}

fn drift_utilization(current: u8, source: &mut dyn DriftSource) -> u8 {
    let step: i32 = source
        .below(UTILIZATION_STEP * 2 + 1)
        .to_i32()
        .unwrap_or(0)
        - UTILIZATION_STEP.to_i32().unwrap_or(0);
    let next: i32 = (i32::from(current) + step).clamp(UTILIZATION_MIN, UTILIZATION_MAX);
    next.to_u8().unwrap_or(current)
}

fn walk_in(state: &mut State, source: &mut dyn DriftSource, now: OffsetDateTime) -> Option<String> {
    let count: u32 = state.locations.len().to_u32()?;
    if count == 0 {
        return None;
    }
    let index: usize = source.below(count).to_usize()?;
    let location_id: String = state.locations.get(index)?.id.clone();

    let vehicle_type: VehicleType = if source.chance(NEW_VEHICLE_PCT) {
        VehicleType::New
    } else {
        VehicleType::PreOwned
    };
    let priority: Priority = match source.below(4) {
        0 => Priority::P0,
        1 => Priority::P1,
        2 => Priority::P2,
        _ => Priority::P3,
    };

    let id: String = state.next_queue_id();
    let item = QueueItem {
        id: id.clone(),
        created_at: now,
        location_id,
        vehicle_type,
        customer_name: WALK_IN_CUSTOMER.to_string(),
        customer_phone: String::new(),
        vehicle_number: String::new(),
        vehicle_summary: String::new(),
        priority,
        status: QueueStatus::Pending,
        assigned_inspector_id: None,
        customer_eta_minutes: source.below(16),
        expected_duration_minutes: 20 + source.below(20),
        price_inr: state.pricing.default_inr,
        payment_at: None,
        closed_at: None,
        commission_override_inr: None,
    };
    state.queue.insert(0, item);
    Some(id)
}

/// Applies one drift tick to the state.
///
/// Only active inspectors drift. Utilization stays within 10..=95.
pub fn apply_drift(
    state: &mut State,
    source: &mut dyn DriftSource,
    now: OffsetDateTime,
) -> DriftReport {
    let mut report = DriftReport::default();

    for inspector in state.inspectors.iter_mut().filter(|i| i.is_active()) {
        let next: u8 = drift_utilization(inspector.utilization_pct, source);
        if next != inspector.utilization_pct {
            inspector.utilization_pct = next;
            report.utilization_changed += 1;
        }
        if source.chance(STATE_FLIP_PCT) {
            inspector.set_state(inspector.state.toggled(), now);
            report.state_flips.push(inspector.id.clone());
        }
    }

    if source.chance(NEW_ITEM_PCT) {
        report.new_item = walk_in(state, source, now);
    }
    report
}
