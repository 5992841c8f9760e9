// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{Context, Transition, stamp};
use crate::assignment::{self, Assignment};
use crate::command::QueueIntake;
use crate::error::CoreError;
use crate::state::{Outcome, not_found};
use pdi_ops_audit::Diff;
use pdi_ops_domain::{
    Commission, CommissionStatus, DomainError, Priority, QueueItem, QueueStatus, VehicleType,
    commission_amount, require_text,
};

pub(super) fn intake(
    tx: &mut Transition,
    intake: QueueIntake,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    if tx.state.location(&intake.location_id).is_none() {
        return Err(not_found("Location", &intake.location_id).into());
    }
    let customer_name: String = require_text("Customer name", &intake.customer_name)?;
    let customer_phone: String = require_text("Customer phone", &intake.customer_phone)?;

    let id: String = tx.state.next_queue_id();
    let item = QueueItem {
        id: id.clone(),
        created_at: ctx.now,
        location_id: intake.location_id,
        vehicle_type: intake.vehicle_type,
        customer_name,
        customer_phone,
        vehicle_number: intake.vehicle_number.trim().to_uppercase(),
        vehicle_summary: intake.vehicle_summary.trim().to_string(),
        priority: intake.priority,
        status: QueueStatus::Pending,
        assigned_inspector_id: None,
        customer_eta_minutes: intake.customer_eta_minutes,
        expected_duration_minutes: intake.expected_duration_minutes,
        price_inr: intake.price_inr.unwrap_or(tx.state.pricing.default_inr),
        payment_at: None,
        closed_at: None,
        commission_override_inr: None,
    };

    let diff: Diff = Diff::new().with("created", None::<QueueItem>, &item);
    let event = ctx
        .event("queue_item", &id, "create_queue_item", diff)
        .at_location(&item.location_id);
    tx.state.queue.insert(0, item);
    tx.record(event);
    Ok(Outcome::Created { id })
}

pub(super) fn set_status(
    tx: &mut Transition,
    pdi_id: &str,
    status: QueueStatus,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let item: &mut QueueItem = tx.state.queue_item_mut(pdi_id)?;
    if status == QueueStatus::Closed && item.payment_at.is_none() {
        return Err(DomainError::PaymentRequiredBeforeClose {
            pdi_id: pdi_id.to_string(),
        }
        .into());
    }

    let before: QueueItem = item.clone();
    item.status = status;
    item.closed_at = if status == QueueStatus::Closed {
        Some(ctx.now)
    } else {
        None
    };
    if status == QueueStatus::Pending {
        item.assigned_inspector_id = None;
    }

    let mut diff: Diff = Diff::new().with("status", before.status, item.status);
    if before.closed_at != item.closed_at {
        diff = diff.with("closed_at", stamp(before.closed_at), stamp(item.closed_at));
    }
    if before.assigned_inspector_id != item.assigned_inspector_id {
        diff = diff.with(
            "assigned_inspector_id",
            &before.assigned_inspector_id,
            &item.assigned_inspector_id,
        );
    }
    let event = ctx
        .event("queue_item", pdi_id, "set_status", diff)
        .at_location(&item.location_id);
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn set_priority(
    tx: &mut Transition,
    pdi_id: &str,
    priority: Priority,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let item: &mut QueueItem = tx.state.queue_item_mut(pdi_id)?;
    let before: Priority = item.priority;
    item.priority = priority;

    let event = ctx
        .event(
            "queue_item",
            pdi_id,
            "set_priority",
            Diff::new().with("priority", before, priority),
        )
        .at_location(&item.location_id);
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn assign(
    tx: &mut Transition,
    pdi_id: &str,
    inspector_id: Option<String>,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let inspector_id: Option<String> = inspector_id
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty());
    if let Some(id) = &inspector_id {
        if tx.state.inspector(id).is_none() {
            return Err(not_found("Inspector", id).into());
        }
    }

    let item: &mut QueueItem = tx.state.queue_item_mut(pdi_id)?;
    let before: QueueItem = item.clone();
    let action: &str = if inspector_id.is_some() {
        item.status = QueueStatus::InProgress;
        "manual_assign"
    } else {
        if item.status == QueueStatus::InProgress {
            item.status = QueueStatus::Pending;
        }
        "manual_unassign"
    };
    item.assigned_inspector_id = inspector_id;

    let mut diff: Diff = Diff::new().with(
        "assigned_inspector_id",
        &before.assigned_inspector_id,
        &item.assigned_inspector_id,
    );
    if before.status != item.status {
        diff = diff.with("status", before.status, item.status);
    }
    let event = ctx
        .event("queue_item", pdi_id, action, diff)
        .at_location(&item.location_id);
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn auto_assign(
    tx: &mut Transition,
    location_id: Option<&str>,
    vehicle_type: Option<VehicleType>,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let correlation_id: String = tx.state.next_correlation_id();
    let state = &mut tx.state;
    let assignments: Vec<Assignment> = assignment::auto_assign(
        &mut state.queue,
        &mut state.inspectors,
        location_id,
        vehicle_type,
        ctx.now,
    );

    for a in &assignments {
        let diff: Diff = Diff::new()
            .with(
                "assigned_inspector_id",
                &a.previous_inspector_id,
                Some(&a.inspector_id),
            )
            .with("status", a.previous_status, QueueStatus::InProgress);
        let event = ctx
            .event("queue_item", &a.pdi_id, "auto_assign", diff)
            .at_location(&a.location_id)
            .correlated(&correlation_id);
        tx.record(event);
    }

    Ok(Outcome::Assigned {
        assigned: assignments.len(),
        correlation_id,
    })
}

pub(super) fn record_payment(
    tx: &mut Transition,
    pdi_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let has_commission: bool = tx.state.commission_for(pdi_id).is_some();
    let item: &mut QueueItem = tx.state.queue_item_mut(pdi_id)?;
    if !has_commission && item.assigned_inspector_id.is_none() {
        return Err(DomainError::InspectorRequiredForPayment {
            pdi_id: pdi_id.to_string(),
        }
        .into());
    }

    let before = item.payment_at;
    let paid_at = *item.payment_at.get_or_insert(ctx.now);
    let item: QueueItem = item.clone();

    if !has_commission {
        if let Some(inspector_id) = &item.assigned_inspector_id {
            let commission = Commission {
                id: tx.state.next_commission_id(),
                inspector_id: inspector_id.clone(),
                location_id: item.location_id.clone(),
                pdi_id: item.id.clone(),
                visit_at: ctx.now,
                amount_inr: commission_amount(&item),
                status: CommissionStatus::Pending,
                payment_at: paid_at,
            };
            tx.state.commissions.insert(0, commission);
        }
    }

    let event = ctx
        .event(
            "queue_item",
            pdi_id,
            "record_payment",
            Diff::new().with("payment_at", stamp(before), stamp(Some(paid_at))),
        )
        .at_location(&item.location_id);
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn override_price(
    tx: &mut Transition,
    pdi_id: &str,
    price_inr: u32,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let item: &mut QueueItem = tx.state.queue_item_mut(pdi_id)?;
    let before: u32 = item.price_inr;
    item.price_inr = price_inr;

    let event = ctx
        .event(
            "queue_item",
            pdi_id,
            "override_price",
            Diff::new().with("price_inr", before, price_inr),
        )
        .at_location(&item.location_id);
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn override_commission(
    tx: &mut Transition,
    pdi_id: &str,
    amount_inr: u32,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let item: &mut QueueItem = tx.state.queue_item_mut(pdi_id)?;
    let before: Option<u32> = item.commission_override_inr;
    item.commission_override_inr = Some(amount_inr);
    let location_id: String = item.location_id.clone();

    let mut entity_id: String = pdi_id.to_string();
    if let Some(commission) = tx.state.commissions.iter_mut().find(|c| c.pdi_id == pdi_id) {
        commission.amount_inr = amount_inr;
        entity_id.clone_from(&commission.id);
    }

    let event = ctx
        .event(
            "commission",
            &entity_id,
            "override_commission",
            Diff::new().with("amount_inr", before, amount_inr),
        )
        .at_location(&location_id);
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn approve_commission(
    tx: &mut Transition,
    commission_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let commission: &mut Commission = tx
        .state
        .commissions
        .iter_mut()
        .find(|c| c.id == commission_id)
        .ok_or_else(|| not_found("Commission", commission_id))?;
    let before: CommissionStatus = commission.status;
    commission.status = CommissionStatus::Approved;

    let event = ctx
        .event(
            "commission",
            commission_id,
            "approve_commission",
            Diff::new().with("status", before, CommissionStatus::Approved),
        )
        .at_location(&commission.location_id);
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn set_default_pricing(tx: &mut Transition, default_inr: u32, ctx: &Context) -> Outcome {
    let before: u32 = tx.state.pricing.default_inr;
    tx.state.pricing.default_inr = default_inr;
    tx.record(ctx.event(
        "pricing",
        "DEFAULT",
        "set_default_pricing",
        Diff::new().with("default_inr", before, default_inr),
    ));
    Outcome::Updated
}
