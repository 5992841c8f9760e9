// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the PDI operations console.
//!
//! This crate sits between a transport (the HTTP server) and the core store.
//! It authenticates actors, enforces module permissions, validates request
//! shapes and translates core and domain failures into `ApiError`s with
//! stable categories.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod auth;
mod capabilities;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use capabilities::{compute_global_capabilities, compute_user_capabilities};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    approve_commission, approve_leave_request, assign_inspector, assign_user_role, auto_assign,
    create_inspector, create_queue_item, create_role, create_user, create_vehicle_master_item,
    delete_checklist_field, delete_checklist_section, delete_role, delete_scoring_rule,
    delete_user, delete_vehicle_mapping, delete_vehicle_master_item, get_access_control,
    get_checklist, get_dashboard, get_vehicle_master, list_audit, list_commissions,
    list_inspectors, list_leave_requests, list_queue, login, override_commission,
    override_price, quote, record_payment, reject_leave_request, score_checklist,
    set_category_pricing, set_default_pricing, set_mapping_pricing, set_priority,
    set_queue_status, submit_leave_request, update_inspector, update_role,
    update_role_permissions, update_user, update_user_permissions, update_vehicle_mapping,
    update_vehicle_master_item, upsert_checklist_field, upsert_checklist_section,
    upsert_scoring_rule, upsert_vehicle_mapping, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AccessControlResponse, AssignInspectorRequest, AssignUserRoleRequest, AutoAssignRequest,
    Capability, CreateInspectorRequest, CreateQueueItemRequest, CreateRoleRequest,
    CreateUserRequest, CreateVehicleMasterItemRequest, GlobalCapabilities, ListAuditResponse,
    ListCommissionsRequest, ListCommissionsResponse, ListInspectorsRequest,
    ListInspectorsResponse, ListLeaveRequestsResponse, ListQueueRequest, ListQueueResponse,
    LoginRequest, MutationResponse, OverrideCommissionRequest, OverridePriceRequest,
    QuoteRequest, ReasonRequest, ScoreChecklistRequest, ScoreChecklistResponse,
    SetCategoryPricingRequest, SetDefaultPricingRequest, SetMappingPricingRequest,
    SetPriorityRequest, SetQueueStatusRequest, SubmitLeaveRequest, UpdateInspectorRequest,
    UpdatePermissionsRequest, UpdateRoleRequest, UpdateUserRequest,
    UpdateVehicleMappingRequest, UpdateVehicleMasterItemRequest, UpsertChecklistFieldRequest,
    UpsertChecklistSectionRequest, UpsertScoringRuleRequest, UpsertVehicleMappingRequest,
    UserCapabilities, UserInfo, WhoAmIResponse,
};
