// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{Context, Transition, stamp};
use crate::command::{InspectorDraft, InspectorPatch};
use crate::error::CoreError;
use crate::state::{Outcome, not_found};
use pdi_ops_audit::Diff;
use pdi_ops_domain::{
    DomainError, EmploymentType, Inspector, InspectorStatus, LeaveRequest, LeaveStatus,
    OperationalState, normalize_skills, parse_date, require_text, validate_inspector_fields,
    validate_leave_range, validate_location_ids,
};
use std::str::FromStr;
use time::Date;

const DEFAULT_APPROVAL_REASON: &str = "Approved";

fn parse_join_date(value: &str) -> Result<Date, DomainError> {
    let value: String = require_text("Date of joining", value)?;
    parse_date(&value)
}

fn parse_status(value: &str) -> Result<InspectorStatus, DomainError> {
    InspectorStatus::from_str(value)
}

pub(super) fn create(
    tx: &mut Transition,
    draft: InspectorDraft,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let name: String = require_text("Full name", &draft.name)?;
    let phone: String = require_text("Mobile number", &draft.phone)?;
    let email: String = require_text("Email", &draft.email)?;
    let join_date: Date = parse_join_date(&draft.join_date)?;
    let employment_type: EmploymentType = EmploymentType::from_str(&draft.employment_type)?;
    let status: InspectorStatus = parse_status(&draft.status)?;
    validate_location_ids(&draft.location_ids, &tx.state.locations)?;

    let provided: Option<String> = draft
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    let id: String = match provided {
        Some(id) => {
            if tx.state.inspector(&id).is_some() {
                return Err(DomainError::DuplicateId {
                    entity: "Inspector",
                    id,
                }
                .into());
            }
            id
        }
        None => tx.state.next_inspector_id(),
    };

    let inspector = Inspector {
        id: id.clone(),
        name,
        phone,
        email,
        profile_photo_url: draft.profile_photo_url.trim().to_string(),
        join_date,
        employment_type,
        status,
        location_ids: draft.location_ids,
        skills: normalize_skills(&draft.skills),
        utilization_pct: 0,
        state: OperationalState::Idle,
        last_state_change_at: ctx.now,
    };
    validate_inspector_fields(&inspector)?;

    let diff: Diff = Diff::new().with("created", None::<Inspector>, &inspector);
    tx.state.inspectors.insert(0, inspector);
    tx.record(ctx.event("inspector", &id, "create_inspector", diff));
    Ok(Outcome::Created { id })
}

/// Builds the patched inspector without touching the state.
fn patched(
    current: &Inspector,
    patch: InspectorPatch,
    ctx: &Context,
) -> Result<Inspector, DomainError> {
    let mut next: Inspector = current.clone();
    if let Some(name) = patch.name {
        next.name = require_text("Full name", &name)?;
    }
    if let Some(phone) = patch.phone {
        next.phone = require_text("Mobile number", &phone)?;
    }
    if let Some(email) = patch.email {
        next.email = require_text("Email", &email)?;
    }
    if let Some(url) = patch.profile_photo_url {
        next.profile_photo_url = url.trim().to_string();
    }
    if let Some(join_date) = patch.join_date {
        next.join_date = parse_join_date(&join_date)?;
    }
    if let Some(employment_type) = patch.employment_type {
        next.employment_type = EmploymentType::from_str(&employment_type)?;
    }
    if let Some(status) = patch.status {
        next.status = parse_status(&status)?;
    }
    if let Some(location_ids) = patch.location_ids {
        next.location_ids = location_ids;
    }
    if let Some(skills) = patch.skills {
        next.skills = normalize_skills(&skills);
    }
    if let Some(state) = patch.state {
        if state != next.state {
            next.set_state(state, ctx.now);
        }
    }
    validate_inspector_fields(&next)?;
    Ok(next)
}

fn profile_diff(before: &Inspector, after: &Inspector) -> Diff {
    let mut diff: Diff = Diff::new();
    if before.name != after.name {
        diff = diff.with("name", &before.name, &after.name);
    }
    if before.phone != after.phone {
        diff = diff.with("phone", &before.phone, &after.phone);
    }
    if before.email != after.email {
        diff = diff.with("email", &before.email, &after.email);
    }
    if before.profile_photo_url != after.profile_photo_url {
        diff = diff.with(
            "profile_photo_url",
            &before.profile_photo_url,
            &after.profile_photo_url,
        );
    }
    if before.join_date != after.join_date {
        diff = diff.with(
            "join_date",
            before.join_date.to_string(),
            after.join_date.to_string(),
        );
    }
    if before.employment_type != after.employment_type {
        diff = diff.with(
            "employment_type",
            before.employment_type,
            after.employment_type,
        );
    }
    if before.status != after.status {
        diff = diff
            .with("status", before.status, after.status)
            .with("active", before.is_active(), after.is_active());
    }
    if before.location_ids != after.location_ids {
        diff = diff.with("location_ids", &before.location_ids, &after.location_ids);
    }
    if before.skills != after.skills {
        diff = diff.with("skills", &before.skills, &after.skills);
    }
    if before.state != after.state {
        diff = diff.with("state", before.state, after.state);
    }
    diff
}

/// A patch that leaves the profile unchanged is a no-op and is not audited.
pub(super) fn update(
    tx: &mut Transition,
    inspector_id: &str,
    patch: InspectorPatch,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    if let Some(location_ids) = &patch.location_ids {
        validate_location_ids(location_ids, &tx.state.locations)?;
    }
    let slot: &mut Inspector = tx.state.inspector_mut(inspector_id)?;
    let next: Inspector = patched(slot, patch, ctx)?;
    let before: Inspector = std::mem::replace(slot, next);
    let diff: Diff = profile_diff(&before, slot);
    if diff.is_empty() {
        return Ok(Outcome::Updated);
    }

    tx.record(ctx.event("inspector", inspector_id, "update_inspector", diff));
    Ok(Outcome::Updated)
}

pub(super) fn submit_leave(
    tx: &mut Transition,
    inspector_id: &str,
    from_date: &str,
    to_date: &str,
    reason: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    if tx.state.inspector(inspector_id).is_none() {
        return Err(not_found("Inspector", inspector_id).into());
    }
    let from: Date = parse_date(&require_text("Leave dates", from_date)?)?;
    let to: Date = parse_date(&require_text("Leave dates", to_date)?)?;
    validate_leave_range(from, to)?;
    let reason: String = require_text("Reason", reason)?;

    let id: String = tx.state.next_leave_request_id();
    let request = LeaveRequest {
        id: id.clone(),
        inspector_id: inspector_id.to_string(),
        from_date: from,
        to_date: to,
        reason: reason.clone(),
        status: LeaveStatus::Pending,
        requested_at: ctx.now,
        decided_at: None,
        rejection_reason: None,
    };

    let mut event = ctx.event(
        "inspector_leave_request",
        &id,
        "submit_leave_request",
        Diff::new().with("created", None::<LeaveRequest>, &request),
    );
    event.reason = reason;
    tx.state.leave_requests.insert(0, request);
    tx.record(event);
    Ok(Outcome::Created { id })
}

fn decision_diff(before: &LeaveRequest, after: &LeaveRequest) -> Diff {
    Diff::new()
        .with("status", before.status, after.status)
        .with("decided_at", stamp(before.decided_at), stamp(after.decided_at))
        .with(
            "rejection_reason",
            &before.rejection_reason,
            &after.rejection_reason,
        )
}

pub(super) fn approve_leave(
    tx: &mut Transition,
    request_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let request: &mut LeaveRequest = tx.state.leave_request_mut(request_id)?;
    let before: LeaveRequest = request.clone();
    request.approve(ctx.now)?;
    let diff: Diff = decision_diff(&before, request);

    let mut event = ctx.event(
        "inspector_leave_request",
        request_id,
        "approve_leave_request",
        diff,
    );
    if event.reason.is_empty() {
        event.reason = DEFAULT_APPROVAL_REASON.to_string();
    }
    tx.record(event);
    Ok(Outcome::Updated)
}

pub(super) fn reject_leave(
    tx: &mut Transition,
    request_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let request: &mut LeaveRequest = tx.state.leave_request_mut(request_id)?;
    let before: LeaveRequest = request.clone();
    request.reject(&ctx.reason, ctx.now)?;
    let diff: Diff = decision_diff(&before, request);

    tx.record(ctx.event(
        "inspector_leave_request",
        request_id,
        "reject_leave_request",
        diff,
    ));
    Ok(Outcome::Updated)
}
