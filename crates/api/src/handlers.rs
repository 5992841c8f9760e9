// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler authorizes the actor before it touches the store.
//! Mutations translate their request into a core `Command` and commit it
//! through `Store::execute_recorded`; reads borrow the store and copy out
//! what the response needs.

use pdi_ops::{
    AccessControl, Command, Dashboard, InspectorDraft, InspectorPatch, Outcome, QueueIntake,
    State, Store, UserDraft, UserPatch,
};
use pdi_ops_audit::{AuditEntry, AuditFilter};
use pdi_ops_domain::{
    ChecklistTemplate, DomainError, Inspector, MasterKind, Module, Operation, PriceQuote,
    QueueItem, User, VehicleMaster, VehicleType,
};
use std::collections::BTreeMap;
use tracing::debug;

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::capabilities::{compute_global_capabilities, compute_user_capabilities};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AccessControlResponse, AssignInspectorRequest, AssignUserRoleRequest, AutoAssignRequest,
    CreateInspectorRequest, CreateQueueItemRequest, CreateRoleRequest, CreateUserRequest,
    CreateVehicleMasterItemRequest, ListAuditResponse, ListCommissionsRequest,
    ListCommissionsResponse, ListInspectorsRequest, ListInspectorsResponse,
    ListLeaveRequestsResponse, ListQueueRequest, ListQueueResponse, LoginRequest,
    MutationResponse, OverrideCommissionRequest, OverridePriceRequest, QuoteRequest,
    ReasonRequest, ScoreChecklistRequest, ScoreChecklistResponse, SetCategoryPricingRequest,
    SetDefaultPricingRequest, SetMappingPricingRequest, SetPriorityRequest,
    SetQueueStatusRequest, SubmitLeaveRequest, UpdateInspectorRequest, UpdatePermissionsRequest,
    UpdateRoleRequest, UpdateUserRequest, UpdateVehicleMappingRequest,
    UpdateVehicleMasterItemRequest, UpsertChecklistFieldRequest, UpsertChecklistSectionRequest,
    UpsertScoringRuleRequest, UpsertVehicleMappingRequest, UserCapabilities, UserInfo,
    WhoAmIResponse,
};

/// Status given to inspectors onboarded without one.
const DEFAULT_INSPECTOR_STATUS: &str = "active";

/// Checks a permission and converts the failure into an `ApiError`.
fn authorize(
    actor: &AuthenticatedActor,
    action: &str,
    module: Module,
    op: Operation,
) -> Result<(), ApiError> {
    AuthorizationService::authorize(actor, action, module, op).map_err(ApiError::from)
}

/// Commits a command on behalf of an already authorized actor.
fn commit(
    store: &mut Store,
    actor: &AuthenticatedActor,
    command: Command,
    reason: &str,
) -> Result<MutationResponse, ApiError> {
    let action: &'static str = command.name();
    let (outcome, audit_event_ids) = store
        .execute_recorded(command, actor.to_audit_actor(), reason)
        .map_err(translate_core_error)?;

    let message: String = match &outcome {
        Outcome::Created { id } => format!("Created '{id}'"),
        Outcome::Updated => format!("Applied {action}"),
        Outcome::Assigned {
            assigned,
            correlation_id,
        } => format!("Auto-assigned {assigned} queue item(s) under {correlation_id}"),
    };
    debug!(action, user_id = %actor.user_id, ?audit_event_ids, "Mutation committed");

    Ok(MutationResponse {
        outcome,
        audit_event_ids,
        message,
    })
}

/// Rejects an unknown location filter.
fn ensure_location(state: &State, location_id: Option<&str>) -> Result<(), ApiError> {
    match location_id {
        Some(id) if state.location(id).is_none() => Err(ApiError::ResourceNotFound {
            resource_type: String::from("Location"),
            message: format!("Location '{id}' not found"),
        }),
        _ => Ok(()),
    }
}

/// Blank optional text is treated as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Verifies a username and password and describes the user.
///
/// # Arguments
///
/// * `store` - The console store
/// * `request` - The credentials
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` if the credentials do not match
/// an active user.
pub fn login(store: &Store, request: &LoginRequest) -> Result<WhoAmIResponse, ApiError> {
    let actor: AuthenticatedActor =
        AuthenticationService::login(store, &request.username, &request.password)?;
    whoami(store, &actor)
}

/// Describes the current actor: user record, effective permissions and
/// capabilities.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` if the actor's user record no
/// longer exists.
pub fn whoami(store: &Store, actor: &AuthenticatedActor) -> Result<WhoAmIResponse, ApiError> {
    let user: &User = store.state().access.user(&actor.user_id).ok_or_else(|| {
        ApiError::AuthenticationFailed {
            reason: format!("Unknown actor '{}'", actor.user_id),
        }
    })?;

    Ok(WhoAmIResponse {
        user: UserInfo::from(user),
        permissions: actor.permissions,
        capabilities: compute_global_capabilities(actor),
    })
}

// ---------------------------------------------------------------------------
// Dashboard and queue
// ---------------------------------------------------------------------------

/// Computes the dashboard, optionally for one location.
///
/// # Arguments
///
/// * `store` - The console store
/// * `actor` - The authenticated actor
/// * `location_id` - Restricts KPIs, alerts and the trend to one location
///
/// # Errors
///
/// Returns an error if the actor cannot read the queue or the location is
/// unknown.
pub fn get_dashboard(
    store: &Store,
    actor: &AuthenticatedActor,
    location_id: Option<&str>,
) -> Result<Dashboard, ApiError> {
    authorize(actor, "get_dashboard", Module::Queue, Operation::Read)?;
    ensure_location(store.state(), location_id)?;
    Ok(store.dashboard(location_id))
}

/// Lists queue items with the inspectors and locations the queue screen
/// needs.
///
/// # Errors
///
/// Returns an error if the actor cannot read the queue or the location is
/// unknown.
pub fn list_queue(
    store: &Store,
    actor: &AuthenticatedActor,
    request: &ListQueueRequest,
) -> Result<ListQueueResponse, ApiError> {
    authorize(actor, "list_queue", Module::Queue, Operation::Read)?;
    let state: &State = store.state();
    let location_id: Option<&str> = request.location_id.as_deref();
    ensure_location(state, location_id)?;

    let queue: Vec<QueueItem> = state
        .queue
        .iter()
        .filter(|q| location_id.is_none_or(|l| q.location_id == l))
        .filter(|q| request.vehicle_type.is_none_or(|t| q.vehicle_type == t))
        .cloned()
        .collect();
    let inspectors: Vec<Inspector> = state
        .inspectors
        .iter()
        .filter(|i| location_id.is_none_or(|l| i.services(l)))
        .cloned()
        .collect();

    Ok(ListQueueResponse {
        queue,
        inspectors,
        locations: state.locations.clone(),
    })
}

/// Adds a pending job to the queue.
///
/// # Errors
///
/// Returns an error if the actor cannot create queue items or the intake
/// fails validation.
pub fn create_queue_item(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: CreateQueueItemRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "create_queue_item", Module::Queue, Operation::Create)?;
    let command: Command = Command::IntakeQueueItem(QueueIntake {
        location_id: request.location_id,
        vehicle_type: request.vehicle_type,
        customer_name: request.customer_name,
        customer_phone: request.customer_phone,
        vehicle_number: request.vehicle_number,
        vehicle_summary: request.vehicle_summary,
        priority: request.priority,
        customer_eta_minutes: request.customer_eta_minutes,
        expected_duration_minutes: request.expected_duration_minutes,
        price_inr: request.price_inr,
    });
    commit(store, actor, command, &request.reason)
}

/// Moves a job to another status.
///
/// Closing requires a recorded payment; returning a job to pending clears
/// its assignment.
///
/// # Errors
///
/// Returns an error if the actor cannot update the queue, the job is
/// unknown, or the transition breaks a business rule.
pub fn set_queue_status(
    store: &mut Store,
    actor: &AuthenticatedActor,
    pdi_id: &str,
    request: SetQueueStatusRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "set_status", Module::Queue, Operation::Update)?;
    let command: Command = Command::SetQueueStatus {
        pdi_id: pdi_id.to_string(),
        status: request.status,
    };
    commit(store, actor, command, &request.reason)
}

/// Changes the priority of a job.
///
/// # Errors
///
/// Returns an error if the actor cannot update the queue or the job is
/// unknown.
pub fn set_priority(
    store: &mut Store,
    actor: &AuthenticatedActor,
    pdi_id: &str,
    request: SetPriorityRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "set_priority", Module::Queue, Operation::Update)?;
    let command: Command = Command::SetPriority {
        pdi_id: pdi_id.to_string(),
        priority: request.priority,
    };
    commit(store, actor, command, &request.reason)
}

/// Assigns an inspector to a job, or unassigns it when no (or a blank)
/// inspector id is given.
///
/// # Errors
///
/// Returns an error if the actor cannot update the queue or either id is
/// unknown.
pub fn assign_inspector(
    store: &mut Store,
    actor: &AuthenticatedActor,
    pdi_id: &str,
    request: AssignInspectorRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "manual_assign", Module::Queue, Operation::Update)?;
    let command: Command = Command::AssignInspector {
        pdi_id: pdi_id.to_string(),
        inspector_id: non_blank(request.inspector_id).map(|id| id.trim().to_string()),
    };
    commit(store, actor, command, &request.reason)
}

/// Matches pending jobs to idle inspectors.
///
/// Assigning nothing is a success; the outcome reports the count and the
/// correlation id shared by every recorded entry.
///
/// # Errors
///
/// Returns an error if the actor cannot update the queue. A filter that
/// matches nothing assigns zero jobs.
pub fn auto_assign(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: AutoAssignRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "auto_assign", Module::Queue, Operation::Update)?;
    let command: Command = Command::AutoAssign {
        location_id: non_blank(request.location_id),
        vehicle_type: request.vehicle_type,
    };
    commit(store, actor, command, &request.reason)
}

/// Records payment for a job and opens the inspector's commission.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing, the job is unknown,
/// or no inspector is assigned.
pub fn record_payment(
    store: &mut Store,
    actor: &AuthenticatedActor,
    pdi_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "record_payment", Module::Pricing, Operation::Update)?;
    let command: Command = Command::RecordPayment {
        pdi_id: pdi_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Changes the price charged for a job.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing or the job is
/// unknown.
pub fn override_price(
    store: &mut Store,
    actor: &AuthenticatedActor,
    pdi_id: &str,
    request: OverridePriceRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "override_price", Module::Pricing, Operation::Update)?;
    let command: Command = Command::OverridePrice {
        pdi_id: pdi_id.to_string(),
        price_inr: request.price_inr,
    };
    commit(store, actor, command, &request.reason)
}

/// Changes the inspector payout for a job and its open commission.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing or the job is
/// unknown.
pub fn override_commission(
    store: &mut Store,
    actor: &AuthenticatedActor,
    pdi_id: &str,
    request: OverrideCommissionRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "override_commission",
        Module::Pricing,
        Operation::Update,
    )?;
    let command: Command = Command::OverrideCommission {
        pdi_id: pdi_id.to_string(),
        amount_inr: request.amount_inr,
    };
    commit(store, actor, command, &request.reason)
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

/// Lists commissions, optionally for one location, with the pricing
/// defaults.
///
/// # Errors
///
/// Returns an error if the actor cannot read pricing or the location is
/// unknown.
pub fn list_commissions(
    store: &Store,
    actor: &AuthenticatedActor,
    request: &ListCommissionsRequest,
) -> Result<ListCommissionsResponse, ApiError> {
    authorize(actor, "list_commissions", Module::Pricing, Operation::Read)?;
    let state: &State = store.state();
    let location_id: Option<&str> = request.location_id.as_deref();
    ensure_location(state, location_id)?;

    Ok(ListCommissionsResponse {
        commissions: state
            .commissions
            .iter()
            .filter(|c| location_id.is_none_or(|l| c.location_id == l))
            .cloned()
            .collect(),
        pricing: state.pricing,
    })
}

/// Approves a pending commission for payout.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing or the commission is
/// unknown.
pub fn approve_commission(
    store: &mut Store,
    actor: &AuthenticatedActor,
    commission_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "approve_commission", Module::Pricing, Operation::Update)?;
    let command: Command = Command::ApproveCommission {
        commission_id: commission_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Changes the price applied to new jobs.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing.
pub fn set_default_pricing(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: SetDefaultPricingRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "set_default_pricing", Module::Pricing, Operation::Update)?;
    let command: Command = Command::SetDefaultPricing {
        default_inr: request.default_inr,
    };
    commit(store, actor, command, &request.reason)
}

// ---------------------------------------------------------------------------
// Inspectors and leave
// ---------------------------------------------------------------------------

/// Lists inspectors, optionally only those serving one location.
///
/// # Errors
///
/// Returns an error if the actor cannot read inspectors or the location is
/// unknown.
pub fn list_inspectors(
    store: &Store,
    actor: &AuthenticatedActor,
    request: &ListInspectorsRequest,
) -> Result<ListInspectorsResponse, ApiError> {
    authorize(actor, "list_inspectors", Module::Inspectors, Operation::Read)?;
    let state: &State = store.state();
    let location_id: Option<&str> = request.location_id.as_deref();
    ensure_location(state, location_id)?;

    Ok(ListInspectorsResponse {
        inspectors: state
            .inspectors
            .iter()
            .filter(|i| location_id.is_none_or(|l| i.services(l)))
            .cloned()
            .collect(),
    })
}

/// Onboards an inspector.
///
/// A blank status means `active`.
///
/// # Arguments
///
/// * `store` - The console store
/// * `actor` - The authenticated actor
/// * `request` - The onboarding form
///
/// # Errors
///
/// Returns an error if:
/// - The actor cannot create inspectors
/// - A required field is blank or an enum value is unknown
/// - The id is taken or a location is unknown
pub fn create_inspector(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: CreateInspectorRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "create_inspector", Module::Inspectors, Operation::Create)?;
    let status: String = if request.status.trim().is_empty() {
        String::from(DEFAULT_INSPECTOR_STATUS)
    } else {
        request.status
    };
    let command: Command = Command::CreateInspector(InspectorDraft {
        id: non_blank(request.id),
        name: request.name,
        phone: request.phone,
        email: request.email,
        profile_photo_url: request.profile_photo_url,
        join_date: request.join_date,
        employment_type: request.employment_type,
        status,
        location_ids: request.location_ids,
        skills: request.skills,
    });
    commit(store, actor, command, &request.reason)
}

/// Edits an inspector profile. Absent fields are left unchanged.
///
/// # Errors
///
/// Returns an error if the actor cannot update inspectors, the inspector
/// is unknown, or a supplied field is invalid.
pub fn update_inspector(
    store: &mut Store,
    actor: &AuthenticatedActor,
    inspector_id: &str,
    request: UpdateInspectorRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "update_inspector", Module::Inspectors, Operation::Update)?;
    let command: Command = Command::UpdateInspector {
        inspector_id: inspector_id.to_string(),
        patch: InspectorPatch {
            name: request.name,
            phone: request.phone,
            email: request.email,
            profile_photo_url: request.profile_photo_url,
            join_date: request.join_date,
            employment_type: request.employment_type,
            status: request.status,
            location_ids: request.location_ids,
            skills: request.skills,
            state: request.state,
        },
    };
    commit(store, actor, command, &request.reason)
}

/// Lists leave requests, newest first.
///
/// # Errors
///
/// Returns an error if the actor cannot read inspectors.
pub fn list_leave_requests(
    store: &Store,
    actor: &AuthenticatedActor,
) -> Result<ListLeaveRequestsResponse, ApiError> {
    authorize(actor, "list_leave_requests", Module::Inspectors, Operation::Read)?;
    Ok(ListLeaveRequestsResponse {
        leave_requests: store.state().leave_requests.clone(),
    })
}

/// Files a leave request. The request reason is the leave reason.
///
/// # Errors
///
/// Returns an error if the actor cannot create inspector records, the
/// inspector is unknown, or the dates are invalid.
pub fn submit_leave_request(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: SubmitLeaveRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "submit_leave_request",
        Module::Inspectors,
        Operation::Create,
    )?;
    let command: Command = Command::SubmitLeaveRequest {
        inspector_id: request.inspector_id,
        from_date: request.from_date,
        to_date: request.to_date,
        reason: request.reason.clone(),
    };
    commit(store, actor, command, &request.reason)
}

/// Approves a pending leave request.
///
/// # Errors
///
/// Returns an error if the actor cannot update inspectors, or the request
/// is unknown or already decided.
pub fn approve_leave_request(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "approve_leave_request",
        Module::Inspectors,
        Operation::Update,
    )?;
    let command: Command = Command::ApproveLeaveRequest {
        request_id: request_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Rejects a pending leave request. The reason is required.
///
/// # Errors
///
/// Returns an error if the actor cannot update inspectors, the reason is
/// blank, or the request is unknown or already decided.
pub fn reject_leave_request(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "reject_leave_request",
        Module::Inspectors,
        Operation::Update,
    )?;
    let command: Command = Command::RejectLeaveRequest {
        request_id: request_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

// ---------------------------------------------------------------------------
// Vehicle master
// ---------------------------------------------------------------------------

/// Returns the whole vehicle taxonomy with its pricing.
///
/// # Errors
///
/// Returns an error if the actor cannot read pricing.
pub fn get_vehicle_master(
    store: &Store,
    actor: &AuthenticatedActor,
) -> Result<VehicleMaster, ApiError> {
    authorize(actor, "get_vehicle_master", Module::Pricing, Operation::Read)?;
    Ok(store.state().vehicle_master.clone())
}

/// Creates a make, model, variant or category.
///
/// # Errors
///
/// Returns an error if the actor cannot create pricing records, the name
/// is blank or taken, or the parent is missing.
pub fn create_vehicle_master_item(
    store: &mut Store,
    actor: &AuthenticatedActor,
    kind: MasterKind,
    request: CreateVehicleMasterItemRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "create_vehicle_master_item",
        Module::Pricing,
        Operation::Create,
    )?;
    let command: Command = Command::CreateVehicleMasterItem {
        kind,
        name: request.name,
        parent_id: non_blank(request.parent_id),
    };
    commit(store, actor, command, &request.reason)
}

/// Renames or re-parents a taxonomy item.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing records, the item is
/// unknown, or the new name or parent is invalid.
pub fn update_vehicle_master_item(
    store: &mut Store,
    actor: &AuthenticatedActor,
    kind: MasterKind,
    id: &str,
    request: UpdateVehicleMasterItemRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "update_vehicle_master_item",
        Module::Pricing,
        Operation::Update,
    )?;
    let command: Command = Command::UpdateVehicleMasterItem {
        kind,
        id: id.to_string(),
        name: request.name,
        parent_id: non_blank(request.parent_id),
    };
    commit(store, actor, command, &request.reason)
}

/// Deletes a taxonomy item and everything that depends on it.
///
/// # Errors
///
/// Returns an error if the actor cannot delete pricing records or the item
/// is unknown.
pub fn delete_vehicle_master_item(
    store: &mut Store,
    actor: &AuthenticatedActor,
    kind: MasterKind,
    id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "delete_vehicle_master_item",
        Module::Pricing,
        Operation::Delete,
    )?;
    let command: Command = Command::DeleteVehicleMasterItem {
        kind,
        id: id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Creates a mapping, or recategorizes the existing mapping for the same
/// vehicle.
///
/// # Errors
///
/// Returns an error if the actor cannot create pricing records or the
/// vehicle hierarchy is inconsistent.
pub fn upsert_vehicle_mapping(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: UpsertVehicleMappingRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "create_vehicle_mapping",
        Module::Pricing,
        Operation::Create,
    )?;
    let command: Command = Command::UpsertVehicleMapping {
        condition: request.condition,
        make_id: request.make_id,
        model_id: request.model_id,
        variant_id: request.variant_id,
        category_id: request.category_id,
    };
    commit(store, actor, command, &request.reason)
}

/// Edits a mapping.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing records, the mapping
/// is unknown, or the result clashes with another mapping.
pub fn update_vehicle_mapping(
    store: &mut Store,
    actor: &AuthenticatedActor,
    mapping_id: &str,
    request: UpdateVehicleMappingRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "update_vehicle_mapping",
        Module::Pricing,
        Operation::Update,
    )?;
    let command: Command = Command::UpdateVehicleMapping {
        mapping_id: mapping_id.to_string(),
        patch: request.patch,
    };
    commit(store, actor, command, &request.reason)
}

/// Deletes a mapping and its pricing.
///
/// # Errors
///
/// Returns an error if the actor cannot delete pricing records or the
/// mapping is unknown.
pub fn delete_vehicle_mapping(
    store: &mut Store,
    actor: &AuthenticatedActor,
    mapping_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "delete_vehicle_mapping",
        Module::Pricing,
        Operation::Delete,
    )?;
    let command: Command = Command::DeleteVehicleMapping {
        mapping_id: mapping_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Sets the pricing of a mapping.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing or the mapping is
/// unknown.
pub fn set_mapping_pricing(
    store: &mut Store,
    actor: &AuthenticatedActor,
    mapping_id: &str,
    request: SetMappingPricingRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "set_mapping_pricing", Module::Pricing, Operation::Update)?;
    let command: Command = Command::SetMappingPricing {
        mapping_id: mapping_id.to_string(),
        pricing: request.pricing,
    };
    commit(store, actor, command, &request.reason)
}

/// Sets the price of a category.
///
/// # Errors
///
/// Returns an error if the actor cannot update pricing or the category is
/// unknown.
pub fn set_category_pricing(
    store: &mut Store,
    actor: &AuthenticatedActor,
    category_id: &str,
    request: SetCategoryPricingRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "set_category_pricing",
        Module::Pricing,
        Operation::Update,
    )?;
    let command: Command = Command::SetCategoryPricing {
        category_id: category_id.to_string(),
        price_inr: request.price_inr,
    };
    commit(store, actor, command, &request.reason)
}

/// Prices an inspection for a concrete vehicle.
///
/// # Errors
///
/// Returns an error if the actor cannot read pricing or no mapping covers
/// the vehicle.
pub fn quote(
    store: &Store,
    actor: &AuthenticatedActor,
    request: &QuoteRequest,
) -> Result<PriceQuote, ApiError> {
    authorize(actor, "quote", Module::Pricing, Operation::Read)?;
    let state: &State = store.state();
    state
        .vehicle_master
        .quote(
            request.condition,
            &request.make_id,
            &request.model_id,
            &request.variant_id,
            request.distance_km,
            state.pricing.default_inr,
        )
        .map_err(translate_domain_error)
}

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

fn checklist(state: &State, condition: VehicleType) -> Result<&ChecklistTemplate, ApiError> {
    state
        .checklist(condition)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Checklist"),
            message: format!("No checklist for {condition} vehicles"),
        })
}

/// Returns the checklist template for a vehicle condition.
///
/// # Errors
///
/// Returns an error if the actor cannot read inspectors or no template
/// exists.
pub fn get_checklist(
    store: &Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
) -> Result<ChecklistTemplate, ApiError> {
    authorize(actor, "get_checklist", Module::Inspectors, Operation::Read)?;
    checklist(store.state(), condition).cloned()
}

/// Scores a finished checklist from its checked-item count.
///
/// # Errors
///
/// Returns an error if the actor cannot read inspectors or no template
/// exists.
pub fn score_checklist(
    store: &Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
    request: ScoreChecklistRequest,
) -> Result<ScoreChecklistResponse, ApiError> {
    authorize(actor, "score_checklist", Module::Inspectors, Operation::Read)?;
    let template: &ChecklistTemplate = checklist(store.state(), condition)?;
    Ok(ScoreChecklistResponse {
        condition,
        checked: request.checked,
        score_pct: template.score(request.checked),
    })
}

/// Creates (no id) or edits a checklist section.
///
/// # Errors
///
/// Returns an error if the actor cannot update inspectors, the title is
/// blank, or the section is unknown.
pub fn upsert_checklist_section(
    store: &mut Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
    request: UpsertChecklistSectionRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "upsert_checklist_section",
        Module::Inspectors,
        Operation::Update,
    )?;
    let command: Command = Command::UpsertChecklistSection {
        condition,
        section_id: non_blank(request.section_id),
        title: request.title,
        order: request.order,
    };
    commit(store, actor, command, &request.reason)
}

/// Deletes a checklist section with its fields.
///
/// # Errors
///
/// Returns an error if the actor cannot delete inspector records or the
/// section is unknown.
pub fn delete_checklist_section(
    store: &mut Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
    section_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "delete_checklist_section",
        Module::Inspectors,
        Operation::Delete,
    )?;
    let command: Command = Command::DeleteChecklistSection {
        condition,
        section_id: section_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Creates (no id) or replaces a checklist field.
///
/// # Errors
///
/// Returns an error if the actor cannot update inspectors, the field is
/// invalid, or the section or field is unknown.
pub fn upsert_checklist_field(
    store: &mut Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
    section_id: &str,
    request: UpsertChecklistFieldRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "upsert_checklist_field",
        Module::Inspectors,
        Operation::Update,
    )?;
    let command: Command = Command::UpsertChecklistField {
        condition,
        section_id: section_id.to_string(),
        field_id: non_blank(request.field_id),
        draft: request.draft,
    };
    commit(store, actor, command, &request.reason)
}

/// Deletes a checklist field.
///
/// # Errors
///
/// Returns an error if the actor cannot delete inspector records or the
/// field is unknown.
pub fn delete_checklist_field(
    store: &mut Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
    section_id: &str,
    field_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "delete_checklist_field",
        Module::Inspectors,
        Operation::Delete,
    )?;
    let command: Command = Command::DeleteChecklistField {
        condition,
        section_id: section_id.to_string(),
        field_id: field_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Creates (no id) or edits a scoring rule.
///
/// # Errors
///
/// Returns an error if the actor cannot update inspectors, the score is
/// out of range, or the threshold is taken.
pub fn upsert_scoring_rule(
    store: &mut Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
    request: UpsertScoringRuleRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "upsert_scoring_rule",
        Module::Inspectors,
        Operation::Update,
    )?;
    let command: Command = Command::UpsertScoringRule {
        condition,
        rule_id: non_blank(request.rule_id),
        min_checked: request.min_checked,
        score_pct: request.score_pct,
    };
    commit(store, actor, command, &request.reason)
}

/// Deletes a scoring rule.
///
/// # Errors
///
/// Returns an error if the actor cannot delete inspector records or the
/// rule is unknown.
pub fn delete_scoring_rule(
    store: &mut Store,
    actor: &AuthenticatedActor,
    condition: VehicleType,
    rule_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "delete_scoring_rule",
        Module::Inspectors,
        Operation::Delete,
    )?;
    let command: Command = Command::DeleteScoringRule {
        condition,
        rule_id: rule_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

/// Returns roles, users, permission sets, overrides, and what the actor may
/// do to each user.
///
/// # Errors
///
/// Returns an error if the actor cannot read access control.
pub fn get_access_control(
    store: &Store,
    actor: &AuthenticatedActor,
) -> Result<AccessControlResponse, ApiError> {
    authorize(actor, "get_access_control", Module::Access, Operation::Read)?;
    let access: &AccessControl = &store.state().access;

    let user_capabilities: BTreeMap<String, UserCapabilities> = access
        .users
        .iter()
        .map(|u| (u.user_id.clone(), compute_user_capabilities(actor, u)))
        .collect();

    Ok(AccessControlResponse {
        roles: access.roles.clone(),
        users: access.users.iter().map(UserInfo::from).collect(),
        role_permissions: access.role_permissions.clone(),
        user_overrides: access.user_overrides.clone(),
        user_capabilities,
    })
}

/// Creates a role with the read-only permission set.
///
/// # Errors
///
/// Returns an error if the actor cannot create access records or the role
/// id is malformed or taken.
pub fn create_role(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: CreateRoleRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "create_role", Module::Access, Operation::Create)?;
    let command: Command = Command::CreateRole {
        role_id: request.role_id,
        name: non_blank(request.name),
    };
    commit(store, actor, command, &request.reason)
}

/// Renames a role.
///
/// # Errors
///
/// Returns an error if the actor cannot update access records, the role is
/// unknown, or the name is blank.
pub fn update_role(
    store: &mut Store,
    actor: &AuthenticatedActor,
    role_id: &str,
    request: UpdateRoleRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "update_role", Module::Access, Operation::Update)?;
    let command: Command = Command::UpdateRole {
        role_id: role_id.to_string(),
        name: request.name,
    };
    commit(store, actor, command, &request.reason)
}

/// Deletes an unused, unprotected role.
///
/// # Errors
///
/// Returns an error if the actor cannot delete access records, or the role
/// is unknown, protected, or still assigned.
pub fn delete_role(
    store: &mut Store,
    actor: &AuthenticatedActor,
    role_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "delete_role", Module::Access, Operation::Delete)?;
    let command: Command = Command::DeleteRole {
        role_id: role_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Merges changes into a role's permission set.
///
/// # Errors
///
/// Returns an error if the actor cannot update access records or the role
/// is unknown.
pub fn update_role_permissions(
    store: &mut Store,
    actor: &AuthenticatedActor,
    role_id: &str,
    request: UpdatePermissionsRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "update_role_permissions",
        Module::Access,
        Operation::Update,
    )?;
    let command: Command = Command::UpdateRolePermissions {
        role_id: role_id.to_string(),
        patch: request.patch,
    };
    commit(store, actor, command, &request.reason)
}

/// Creates a console user.
///
/// The password is checked against the password policy and stored as a
/// bcrypt hash.
///
/// # Arguments
///
/// * `store` - The console store
/// * `actor` - The authenticated actor
/// * `request` - The new user
/// * `bcrypt_cost` - The cost factor for hashing the password
///
/// # Errors
///
/// Returns an error if:
/// - The actor cannot create access records
/// - The password violates the policy
/// - The id or username is malformed or taken, or the role is unknown
pub fn create_user(
    store: &mut Store,
    actor: &AuthenticatedActor,
    request: CreateUserRequest,
    bcrypt_cost: u32,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "create_user", Module::Access, Operation::Create)?;

    let username: Option<String> = non_blank(request.username);
    let effective_username: String = username
        .clone()
        .unwrap_or_else(|| request.user_id.trim().to_lowercase());
    PasswordPolicy::default().validate(
        &request.password,
        request.user_id.trim(),
        &effective_username,
    )?;
    let password_hash: String =
        AuthenticationService::hash_password(&request.password, bcrypt_cost)?;

    let command: Command = Command::CreateUser(UserDraft {
        user_id: request.user_id,
        name: non_blank(request.name),
        role_id: request.role_id,
        email: request.email,
        phone: request.phone,
        username,
        password_hash,
        active: request.active,
    });
    commit(store, actor, command, &request.reason)
}

/// Rejects a request that would lock the actor out of their own account.
fn ensure_not_self(
    actor: &AuthenticatedActor,
    user_id: &str,
    action: &str,
) -> Result<(), ApiError> {
    if actor.user_id == user_id.trim() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("self_protection"),
            message: format!("Users cannot {action} their own account"),
        });
    }
    Ok(())
}

/// Edits a console user. Absent fields are left unchanged.
///
/// # Arguments
///
/// * `store` - The console store
/// * `actor` - The authenticated actor
/// * `user_id` - The user to edit
/// * `request` - The changes
/// * `bcrypt_cost` - The cost factor for hashing a new password
///
/// # Errors
///
/// Returns an error if:
/// - The actor cannot update access records
/// - The actor tries to deactivate themselves
/// - A new password violates the policy
/// - The user is unknown or protected, or the username is taken
pub fn update_user(
    store: &mut Store,
    actor: &AuthenticatedActor,
    user_id: &str,
    request: UpdateUserRequest,
    bcrypt_cost: u32,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "update_user", Module::Access, Operation::Update)?;
    if request.active == Some(false) {
        ensure_not_self(actor, user_id, "deactivate")?;
    }

    let password_hash: Option<String> = match &request.password {
        Some(password) => {
            let current: &User = store.state().access.user(user_id).ok_or_else(|| {
                translate_domain_error(DomainError::NotFound {
                    entity: "User",
                    id: user_id.to_string(),
                })
            })?;
            let username: &str = request.username.as_deref().unwrap_or(&current.username);
            PasswordPolicy::default().validate(password, &current.user_id, username)?;
            Some(AuthenticationService::hash_password(password, bcrypt_cost)?)
        }
        None => None,
    };

    let command: Command = Command::UpdateUser {
        user_id: user_id.to_string(),
        patch: UserPatch {
            name: request.name,
            email: request.email,
            phone: request.phone,
            username: request.username,
            password_hash,
            active: request.active,
        },
    };
    commit(store, actor, command, &request.reason)
}

/// Deletes a console user and their permission override.
///
/// # Errors
///
/// Returns an error if the actor cannot delete access records, targets
/// themselves, or the user is unknown or protected.
pub fn delete_user(
    store: &mut Store,
    actor: &AuthenticatedActor,
    user_id: &str,
    request: &ReasonRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "delete_user", Module::Access, Operation::Delete)?;
    ensure_not_self(actor, user_id, "delete")?;
    let command: Command = Command::DeleteUser {
        user_id: user_id.to_string(),
    };
    commit(store, actor, command, &request.reason)
}

/// Moves a user to another role.
///
/// # Errors
///
/// Returns an error if the actor cannot update access records, either id is
/// unknown, or the user is protected.
pub fn assign_user_role(
    store: &mut Store,
    actor: &AuthenticatedActor,
    user_id: &str,
    request: AssignUserRoleRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(actor, "assign_user_role", Module::Access, Operation::Update)?;
    let command: Command = Command::AssignUserRole {
        user_id: user_id.to_string(),
        role_id: request.role_id,
    };
    commit(store, actor, command, &request.reason)
}

/// Merges changes into a user's permission override.
///
/// # Errors
///
/// Returns an error if the actor cannot update access records or the user
/// is unknown.
pub fn update_user_permissions(
    store: &mut Store,
    actor: &AuthenticatedActor,
    user_id: &str,
    request: UpdatePermissionsRequest,
) -> Result<MutationResponse, ApiError> {
    authorize(
        actor,
        "update_user_permissions",
        Module::Access,
        Operation::Update,
    )?;
    let command: Command = Command::UpdateUserPermissions {
        user_id: user_id.to_string(),
        patch: request.patch,
    };
    commit(store, actor, command, &request.reason)
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Lists audit entries matching a filter, newest first.
///
/// # Errors
///
/// Returns an error if the actor cannot read the audit log.
pub fn list_audit(
    store: &Store,
    actor: &AuthenticatedActor,
    filter: &AuditFilter,
) -> Result<ListAuditResponse, ApiError> {
    authorize(actor, "list_audit", Module::Audit, Operation::Read)?;
    let entries: Vec<AuditEntry> = store
        .audit()
        .query(filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(ListAuditResponse { entries })
}
