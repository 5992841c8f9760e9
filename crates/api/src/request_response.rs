// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Every mutating request carries an optional free-text `reason` that ends
//! up on the audit entries the operation records.

use pdi_ops::Outcome;
use pdi_ops_audit::AuditEntry;
use pdi_ops_domain::{
    Commission, FieldDraft, Inspector, LeaveRequest, Location, MappingPatch, MappingPricing,
    OperationalState, Permissions, PermissionsPatch, PricingDefaults, Priority, QueueItem,
    QueueStatus, Role, User, VehicleType,
};
use std::collections::BTreeMap;

/// A request that carries nothing but the audit reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ReasonRequest {
    /// Why the change is being made.
    #[serde(default)]
    pub reason: String,
}

/// API response for every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MutationResponse {
    /// What the command produced.
    pub outcome: Outcome,
    /// Ids of the audit entries recorded, oldest first.
    pub audit_event_ids: Vec<String>,
    /// A success message.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct LoginRequest {
    /// Login name (case-insensitive).
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

/// Public view of a console user. The password hash is never included.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub name: String,
    pub role_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: String,
    pub active: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            name: user.name.clone(),
            role_id: user.role_id.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            username: user.username.clone(),
            active: user.active,
        }
    }
}

/// API response describing the current actor. Returned by login and whoami.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WhoAmIResponse {
    /// The user record.
    pub user: UserInfo,
    /// Effective permissions.
    pub permissions: Permissions,
    /// What the console should offer this user.
    pub capabilities: GlobalCapabilities,
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

/// Console-wide capabilities of the current actor.
///
/// Advisory only; every operation is authorized again on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GlobalCapabilities {
    pub can_view_queue: Capability,
    pub can_intake: Capability,
    pub can_dispatch: Capability,
    pub can_manage_payments: Capability,
    pub can_manage_inspectors: Capability,
    pub can_edit_checklists: Capability,
    pub can_edit_vehicle_master: Capability,
    pub can_delete_vehicle_master: Capability,
    pub can_view_audit: Capability,
    pub can_view_access_control: Capability,
    pub can_manage_access: Capability,
}

/// What the current actor may do to one console user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct UserCapabilities {
    pub can_edit: Capability,
    pub can_deactivate: Capability,
    pub can_change_role: Capability,
    pub can_delete: Capability,
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Query for the operations queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ListQueueRequest {
    pub location_id: Option<String>,
    pub vehicle_type: Option<VehicleType>,
}

/// API response for the operations queue screen.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListQueueResponse {
    /// Matching jobs, newest first.
    pub queue: Vec<QueueItem>,
    /// Inspectors serving the selected location (all when unfiltered).
    pub inspectors: Vec<Inspector>,
    pub locations: Vec<Location>,
}

/// API request to add a job to the queue.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreateQueueItemRequest {
    pub location_id: String,
    pub vehicle_type: VehicleType,
    pub customer_name: String,
    pub customer_phone: String,
    pub vehicle_number: String,
    #[serde(default)]
    pub vehicle_summary: String,
    pub priority: Priority,
    #[serde(default)]
    pub customer_eta_minutes: u32,
    pub expected_duration_minutes: u32,
    /// Defaults to the configured default price.
    #[serde(default)]
    pub price_inr: Option<u32>,
    #[serde(default)]
    pub reason: String,
}

/// API request to move a job to another status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SetQueueStatusRequest {
    pub status: QueueStatus,
    #[serde(default)]
    pub reason: String,
}

/// API request to change a job's priority.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SetPriorityRequest {
    pub priority: Priority,
    #[serde(default)]
    pub reason: String,
}

/// API request to assign or (with no inspector) unassign a job.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct AssignInspectorRequest {
    #[serde(default)]
    pub inspector_id: Option<String>,
    #[serde(default)]
    pub reason: String,
}

/// API request to auto-assign pending jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct AutoAssignRequest {
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub reason: String,
}

/// API request to change the price of a job.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct OverridePriceRequest {
    pub price_inr: u32,
    #[serde(default)]
    pub reason: String,
}

/// API request to change the inspector payout of a job.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct OverrideCommissionRequest {
    pub amount_inr: u32,
    #[serde(default)]
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

/// Query for commissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ListCommissionsRequest {
    pub location_id: Option<String>,
}

/// API response for the finance screen.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListCommissionsResponse {
    pub commissions: Vec<Commission>,
    pub pricing: PricingDefaults,
}

/// API request to change the default job price.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SetDefaultPricingRequest {
    pub default_inr: u32,
    #[serde(default)]
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Inspectors and leave
// ---------------------------------------------------------------------------

/// Query for the inspector roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ListInspectorsRequest {
    pub location_id: Option<String>,
}

/// API response for the inspector roster.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListInspectorsResponse {
    pub inspectors: Vec<Inspector>,
}

/// API request to onboard an inspector.
///
/// Dates and enum values are passed as entered; blank values are reported
/// as missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CreateInspectorRequest {
    /// Generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub profile_photo_url: String,
    /// ISO 8601 date.
    pub join_date: String,
    pub employment_type: String,
    /// Defaults to `active` when blank.
    pub status: String,
    pub location_ids: Vec<String>,
    /// Empty means every vehicle type.
    pub skills: Vec<VehicleType>,
    pub reason: String,
}

/// API request to edit an inspector. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct UpdateInspectorRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub profile_photo_url: Option<String>,
    pub join_date: Option<String>,
    pub employment_type: Option<String>,
    pub status: Option<String>,
    pub location_ids: Option<Vec<String>>,
    pub skills: Option<Vec<VehicleType>>,
    pub state: Option<OperationalState>,
    pub reason: String,
}

/// API response for the leave screen.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListLeaveRequestsResponse {
    /// Requests, newest first.
    pub leave_requests: Vec<LeaveRequest>,
}

/// API request to file leave. `reason` is the leave reason.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SubmitLeaveRequest {
    pub inspector_id: String,
    /// ISO 8601 date, inclusive.
    pub from_date: String,
    /// ISO 8601 date, inclusive.
    pub to_date: String,
    #[serde(default)]
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Vehicle master
// ---------------------------------------------------------------------------

/// API request to create a make, model, variant or category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreateVehicleMasterItemRequest {
    pub name: String,
    /// Make for a model, model for a variant.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub reason: String,
}

/// API request to rename or re-parent a taxonomy item.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct UpdateVehicleMasterItemRequest {
    pub name: Option<String>,
    pub parent_id: Option<String>,
    pub reason: String,
}

/// API request to create (or recategorize) a vehicle mapping.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UpsertVehicleMappingRequest {
    pub condition: VehicleType,
    pub make_id: String,
    pub model_id: String,
    pub variant_id: String,
    pub category_id: String,
    #[serde(default)]
    pub reason: String,
}

/// API request to edit a vehicle mapping.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UpdateVehicleMappingRequest {
    #[serde(flatten)]
    pub patch: MappingPatch,
    #[serde(default)]
    pub reason: String,
}

/// API request to price a vehicle mapping.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SetMappingPricingRequest {
    #[serde(flatten)]
    pub pricing: MappingPricing,
    #[serde(default)]
    pub reason: String,
}

/// API request to price a category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SetCategoryPricingRequest {
    pub price_inr: u32,
    #[serde(default)]
    pub reason: String,
}

/// Query for an inspection price.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct QuoteRequest {
    pub condition: VehicleType,
    pub make_id: String,
    pub model_id: String,
    pub variant_id: String,
    #[serde(default)]
    pub distance_km: u32,
}

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

/// API request to create (no id) or edit a checklist section.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UpsertChecklistSectionRequest {
    #[serde(default)]
    pub section_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub reason: String,
}

/// API request to create (no id) or replace a checklist field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UpsertChecklistFieldRequest {
    #[serde(default)]
    pub field_id: Option<String>,
    #[serde(flatten)]
    pub draft: FieldDraft,
    #[serde(default)]
    pub reason: String,
}

/// API request to create (no id) or edit a scoring rule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UpsertScoringRuleRequest {
    #[serde(default)]
    pub rule_id: Option<String>,
    pub min_checked: u32,
    pub score_pct: u32,
    #[serde(default)]
    pub reason: String,
}

/// API request to score a finished checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct ScoreChecklistRequest {
    /// Number of checked items.
    pub checked: u32,
}

/// API response with a checklist score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ScoreChecklistResponse {
    pub condition: VehicleType,
    pub checked: u32,
    pub score_pct: u32,
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

/// API response for the access control screen.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AccessControlResponse {
    pub roles: Vec<Role>,
    pub users: Vec<UserInfo>,
    pub role_permissions: BTreeMap<String, Permissions>,
    pub user_overrides: BTreeMap<String, PermissionsPatch>,
    /// What the current actor may do to each user, by user id.
    pub user_capabilities: BTreeMap<String, UserCapabilities>,
}

/// API request to create a role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreateRoleRequest {
    pub role_id: String,
    /// Defaults to the role id.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub reason: String,
}

/// API request to rename a role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UpdateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

/// API request to merge changes into a role's or a user's permissions.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct UpdatePermissionsRequest {
    #[serde(flatten)]
    pub patch: PermissionsPatch,
    #[serde(default)]
    pub reason: String,
}

/// API request to create a console user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreateUserRequest {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Defaults to the lowercased user id.
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub reason: String,
}

/// API request to edit a console user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    /// A new plain-text password.
    pub password: Option<String>,
    pub active: Option<bool>,
    pub reason: String,
}

/// API request to move a user to another role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct AssignUserRoleRequest {
    pub role_id: String,
    #[serde(default)]
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// API response for the audit log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListAuditResponse {
    /// Matching entries, newest first.
    pub entries: Vec<AuditEntry>,
}
