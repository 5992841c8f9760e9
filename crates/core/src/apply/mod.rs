// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State transitions.
//!
//! `apply` never mutates its input. Each handler works on a clone of the
//! state and returns it with the audit events describing the change, so a
//! failed command leaves the caller's state untouched.

mod access;
mod checklist;
mod inspectors;
mod queue;
mod vehicle_master;

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Outcome, State, TransitionResult};
use pdi_ops_audit::{Actor, AuditEvent, Diff, EntityRef};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Who is acting, why, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub actor: Actor,
    pub reason: String,
    pub now: OffsetDateTime,
}

impl Context {
    /// Creates a new context. The reason is trimmed.
    #[must_use]
    pub fn new(actor: Actor, reason: &str, now: OffsetDateTime) -> Self {
        Self {
            actor,
            reason: reason.trim().to_string(),
            now,
        }
    }

    /// Builds an audit event stamped with this context.
    pub(crate) fn event(&self, entity_type: &str, id: &str, action: &str, diff: Diff) -> AuditEvent {
        AuditEvent::new(
            self.now,
            self.actor.clone(),
            EntityRef::new(entity_type, id),
            action,
            diff,
            &self.reason,
        )
    }
}

/// Working copy of the state plus the events recorded so far.
pub(crate) struct Transition {
    pub(crate) state: State,
    pub(crate) events: Vec<AuditEvent>,
}

impl Transition {
    fn new(state: &State) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, event: AuditEvent) {
        self.events.push(event);
    }

    fn finish(self, outcome: Outcome) -> TransitionResult {
        TransitionResult {
            new_state: self.state,
            audit_events: self.events,
            outcome,
        }
    }
}

/// Applies a command to the current state, producing a new state and the
/// audit events for the change.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `ctx` - The actor, reason and time of the change
///
/// # Errors
///
/// Returns an error if a required field is missing, a value is invalid, a
/// referenced record does not exist, or a business rule forbids the change.
/// The input state is never modified.
#[allow(clippy::too_many_lines)]
pub fn apply(state: &State, command: Command, ctx: &Context) -> Result<TransitionResult, CoreError> {
    let mut tx: Transition = Transition::new(state);
    let outcome: Outcome = match command {
        Command::IntakeQueueItem(intake) => queue::intake(&mut tx, intake, ctx)?,
        Command::SetQueueStatus { pdi_id, status } => {
            queue::set_status(&mut tx, &pdi_id, status, ctx)?
        }
        Command::SetPriority { pdi_id, priority } => {
            queue::set_priority(&mut tx, &pdi_id, priority, ctx)?
        }
        Command::AssignInspector {
            pdi_id,
            inspector_id,
        } => queue::assign(&mut tx, &pdi_id, inspector_id, ctx)?,
        Command::AutoAssign {
            location_id,
            vehicle_type,
        } => queue::auto_assign(&mut tx, location_id.as_deref(), vehicle_type, ctx)?,
        Command::RecordPayment { pdi_id } => queue::record_payment(&mut tx, &pdi_id, ctx)?,
        Command::OverridePrice { pdi_id, price_inr } => {
            queue::override_price(&mut tx, &pdi_id, price_inr, ctx)?
        }
        Command::OverrideCommission { pdi_id, amount_inr } => {
            queue::override_commission(&mut tx, &pdi_id, amount_inr, ctx)?
        }
        Command::ApproveCommission { commission_id } => {
            queue::approve_commission(&mut tx, &commission_id, ctx)?
        }
        Command::SetDefaultPricing { default_inr } => {
            queue::set_default_pricing(&mut tx, default_inr, ctx)
        }

        Command::CreateInspector(draft) => inspectors::create(&mut tx, draft, ctx)?,
        Command::UpdateInspector {
            inspector_id,
            patch,
        } => inspectors::update(&mut tx, &inspector_id, patch, ctx)?,
        Command::SubmitLeaveRequest {
            inspector_id,
            from_date,
            to_date,
            reason,
        } => inspectors::submit_leave(&mut tx, &inspector_id, &from_date, &to_date, &reason, ctx)?,
        Command::ApproveLeaveRequest { request_id } => {
            inspectors::approve_leave(&mut tx, &request_id, ctx)?
        }
        Command::RejectLeaveRequest { request_id } => {
            inspectors::reject_leave(&mut tx, &request_id, ctx)?
        }

        Command::CreateVehicleMasterItem {
            kind,
            name,
            parent_id,
        } => vehicle_master::create_item(&mut tx, kind, &name, parent_id.as_deref(), ctx)?,
        Command::UpdateVehicleMasterItem {
            kind,
            id,
            name,
            parent_id,
        } => vehicle_master::update_item(
            &mut tx,
            kind,
            &id,
            name.as_deref(),
            parent_id.as_deref(),
            ctx,
        )?,
        Command::DeleteVehicleMasterItem { kind, id } => {
            vehicle_master::delete_item(&mut tx, kind, &id, ctx)?
        }
        Command::UpsertVehicleMapping {
            condition,
            make_id,
            model_id,
            variant_id,
            category_id,
        } => vehicle_master::upsert_mapping(
            &mut tx,
            condition,
            &make_id,
            &model_id,
            &variant_id,
            &category_id,
            ctx,
        )?,
        Command::UpdateVehicleMapping { mapping_id, patch } => {
            vehicle_master::update_mapping(&mut tx, &mapping_id, patch, ctx)?
        }
        Command::DeleteVehicleMapping { mapping_id } => {
            vehicle_master::delete_mapping(&mut tx, &mapping_id, ctx)?
        }
        Command::SetMappingPricing {
            mapping_id,
            pricing,
        } => vehicle_master::set_mapping_pricing(&mut tx, &mapping_id, pricing, ctx)?,
        Command::SetCategoryPricing {
            category_id,
            price_inr,
        } => vehicle_master::set_category_pricing(&mut tx, &category_id, price_inr, ctx)?,

        Command::UpsertChecklistSection {
            condition,
            section_id,
            title,
            order,
        } => checklist::upsert_section(&mut tx, condition, section_id.as_deref(), &title, order, ctx)?,
        Command::DeleteChecklistSection {
            condition,
            section_id,
        } => checklist::delete_section(&mut tx, condition, &section_id, ctx)?,
        Command::UpsertChecklistField {
            condition,
            section_id,
            field_id,
            draft,
        } => checklist::upsert_field(&mut tx, condition, &section_id, field_id.as_deref(), draft, ctx)?,
        Command::DeleteChecklistField {
            condition,
            section_id,
            field_id,
        } => checklist::delete_field(&mut tx, condition, &section_id, &field_id, ctx)?,
        Command::UpsertScoringRule {
            condition,
            rule_id,
            min_checked,
            score_pct,
        } => checklist::upsert_rule(
            &mut tx,
            condition,
            rule_id.as_deref(),
            min_checked,
            score_pct,
            ctx,
        )?,
        Command::DeleteScoringRule { condition, rule_id } => {
            checklist::delete_rule(&mut tx, condition, &rule_id, ctx)?
        }

        Command::CreateRole { role_id, name } => {
            access::create_role(&mut tx, &role_id, name.as_deref(), ctx)?
        }
        Command::UpdateRole { role_id, name } => access::update_role(&mut tx, &role_id, &name, ctx)?,
        Command::DeleteRole { role_id } => access::delete_role(&mut tx, &role_id, ctx)?,
        Command::UpdateRolePermissions { role_id, patch } => {
            access::update_role_permissions(&mut tx, &role_id, &patch, ctx)?
        }
        Command::CreateUser(draft) => access::create_user(&mut tx, draft, ctx)?,
        Command::UpdateUser { user_id, patch } => access::update_user(&mut tx, &user_id, patch, ctx)?,
        Command::DeleteUser { user_id } => access::delete_user(&mut tx, &user_id, ctx)?,
        Command::AssignUserRole { user_id, role_id } => {
            access::assign_role(&mut tx, &user_id, &role_id, ctx)?
        }
        Command::UpdateUserPermissions { user_id, patch } => {
            access::update_user_permissions(&mut tx, &user_id, &patch, ctx)?
        }
    };
    Ok(tx.finish(outcome))
}

/// Formats an optional timestamp for a diff.
pub(crate) fn stamp(at: Option<OffsetDateTime>) -> Option<String> {
    at.and_then(|t| t.format(&Rfc3339).ok())
}
