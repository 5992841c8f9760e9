// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pdi_ops_domain::{
    FieldDraft, MappingPatch, MappingPricing, MasterKind, OperationalState, PermissionsPatch,
    Priority, QueueStatus, VehicleType,
};

/// A new walk-in or booked inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueIntake {
    pub location_id: String,
    pub vehicle_type: VehicleType,
    pub customer_name: String,
    pub customer_phone: String,
    pub vehicle_number: String,
    pub vehicle_summary: String,
    pub priority: Priority,
    pub customer_eta_minutes: u32,
    pub expected_duration_minutes: u32,
    /// Defaults to the configured default price.
    pub price_inr: Option<u32>,
}

/// Onboarding form for an inspector.
///
/// Dates and enums are carried as entered so that blank and invalid values
/// are reported against the right field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectorDraft {
    /// Generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub profile_photo_url: String,
    pub join_date: String,
    pub employment_type: String,
    pub status: String,
    pub location_ids: Vec<String>,
    /// Empty means every vehicle type.
    pub skills: Vec<VehicleType>,
}

/// Profile edits for an inspector. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectorPatch {
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
}

/// A new console user. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub user_id: String,
    /// Defaults to the user id.
    pub name: Option<String>,
    pub role_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Defaults to the lowercased user id.
    pub username: Option<String>,
    pub password_hash: String,
    /// Defaults to true.
    pub active: Option<bool>,
}

/// Edits to a console user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub active: Option<bool>,
}

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a pending job to the queue.
    IntakeQueueItem(QueueIntake),
    /// Move a job to another status.
    SetQueueStatus { pdi_id: String, status: QueueStatus },
    /// Change the scheduling priority of a job.
    SetPriority { pdi_id: String, priority: Priority },
    /// Assign (`Some`) or unassign (`None`) an inspector by hand.
    AssignInspector {
        pdi_id: String,
        inspector_id: Option<String>,
    },
    /// Match pending jobs to idle inspectors.
    AutoAssign {
        location_id: Option<String>,
        vehicle_type: Option<VehicleType>,
    },
    /// Stamp payment and open the inspector's commission.
    RecordPayment { pdi_id: String },
    /// Change the price charged for a job.
    OverridePrice { pdi_id: String, price_inr: u32 },
    /// Change the inspector payout for a job.
    OverrideCommission { pdi_id: String, amount_inr: u32 },
    /// Approve a commission for payout.
    ApproveCommission { commission_id: String },
    /// Change the price applied to new jobs.
    SetDefaultPricing { default_inr: u32 },

    /// Onboard an inspector.
    CreateInspector(InspectorDraft),
    /// Edit an inspector profile.
    UpdateInspector {
        inspector_id: String,
        patch: InspectorPatch,
    },
    /// File a leave request for an inspector.
    SubmitLeaveRequest {
        inspector_id: String,
        from_date: String,
        to_date: String,
        reason: String,
    },
    /// Approve a pending leave request.
    ApproveLeaveRequest { request_id: String },
    /// Reject a pending leave request. The command reason is the rejection
    /// reason and must not be blank.
    RejectLeaveRequest { request_id: String },

    /// Create a make, model, variant or category.
    CreateVehicleMasterItem {
        kind: MasterKind,
        name: String,
        /// Make for a model, model for a variant.
        parent_id: Option<String>,
    },
    /// Rename or re-parent a taxonomy item.
    UpdateVehicleMasterItem {
        kind: MasterKind,
        id: String,
        name: Option<String>,
        parent_id: Option<String>,
    },
    /// Delete a taxonomy item and everything that depends on it.
    DeleteVehicleMasterItem { kind: MasterKind, id: String },
    /// Create a mapping, or recategorize the mapping for the same vehicle.
    UpsertVehicleMapping {
        condition: VehicleType,
        make_id: String,
        model_id: String,
        variant_id: String,
        category_id: String,
    },
    /// Edit a mapping.
    UpdateVehicleMapping {
        mapping_id: String,
        patch: MappingPatch,
    },
    /// Delete a mapping and its pricing.
    DeleteVehicleMapping { mapping_id: String },
    /// Set the pricing of a mapping.
    SetMappingPricing {
        mapping_id: String,
        pricing: MappingPricing,
    },
    /// Set the price of a category.
    SetCategoryPricing { category_id: String, price_inr: u32 },

    /// Create (no id) or edit a checklist section.
    UpsertChecklistSection {
        condition: VehicleType,
        section_id: Option<String>,
        title: String,
        order: u32,
    },
    /// Delete a checklist section with its fields.
    DeleteChecklistSection {
        condition: VehicleType,
        section_id: String,
    },
    /// Create (no id) or replace a checklist field.
    UpsertChecklistField {
        condition: VehicleType,
        section_id: String,
        field_id: Option<String>,
        draft: FieldDraft,
    },
    /// Delete a checklist field.
    DeleteChecklistField {
        condition: VehicleType,
        section_id: String,
        field_id: String,
    },
    /// Create (no id) or edit a scoring rule.
    UpsertScoringRule {
        condition: VehicleType,
        rule_id: Option<String>,
        min_checked: u32,
        score_pct: u32,
    },
    /// Delete a scoring rule.
    DeleteScoringRule {
        condition: VehicleType,
        rule_id: String,
    },

    /// Create a role with the read-only permission set.
    CreateRole {
        role_id: String,
        /// Defaults to the role id.
        name: Option<String>,
    },
    /// Rename a role.
    UpdateRole { role_id: String, name: String },
    /// Delete an unused, unprotected role.
    DeleteRole { role_id: String },
    /// Merge changes into a role's permission set.
    UpdateRolePermissions {
        role_id: String,
        patch: PermissionsPatch,
    },
    /// Create a console user.
    CreateUser(UserDraft),
    /// Edit a console user.
    UpdateUser { user_id: String, patch: UserPatch },
    /// Delete a console user.
    DeleteUser { user_id: String },
    /// Move a user to another role.
    AssignUserRole { user_id: String, role_id: String },
    /// Merge changes into a user's permission override.
    UpdateUserPermissions {
        user_id: String,
        patch: PermissionsPatch,
    },
}

impl Command {
    /// The audit action name this command records.
    ///
    /// Manual assignment records `manual_assign` or `manual_unassign`
    /// depending on the target; upserts that update report the update name
    /// at apply time.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IntakeQueueItem(_) => "create_queue_item",
            Self::SetQueueStatus { .. } => "set_status",
            Self::SetPriority { .. } => "set_priority",
            Self::AssignInspector { .. } => "manual_assign",
            Self::AutoAssign { .. } => "auto_assign",
            Self::RecordPayment { .. } => "record_payment",
            Self::OverridePrice { .. } => "override_price",
            Self::OverrideCommission { .. } => "override_commission",
            Self::ApproveCommission { .. } => "approve_commission",
            Self::SetDefaultPricing { .. } => "set_default_pricing",
            Self::CreateInspector(_) => "create_inspector",
            Self::UpdateInspector { .. } => "update_inspector",
            Self::SubmitLeaveRequest { .. } => "submit_leave_request",
            Self::ApproveLeaveRequest { .. } => "approve_leave_request",
            Self::RejectLeaveRequest { .. } => "reject_leave_request",
            Self::CreateVehicleMasterItem { .. } => "create_vehicle_master_item",
            Self::UpdateVehicleMasterItem { .. } => "update_vehicle_master_item",
            Self::DeleteVehicleMasterItem { .. } => "delete_vehicle_master_item",
            Self::UpsertVehicleMapping { .. } => "create_vehicle_mapping",
            Self::UpdateVehicleMapping { .. } => "update_vehicle_mapping",
            Self::DeleteVehicleMapping { .. } => "delete_vehicle_mapping",
            Self::SetMappingPricing { .. } => "set_mapping_pricing",
            Self::SetCategoryPricing { .. } => "set_category_pricing",
            Self::UpsertChecklistSection { .. } => "upsert_checklist_section",
            Self::DeleteChecklistSection { .. } => "delete_checklist_section",
            Self::UpsertChecklistField { .. } => "upsert_checklist_field",
            Self::DeleteChecklistField { .. } => "delete_checklist_field",
            Self::UpsertScoringRule { .. } => "upsert_scoring_rule",
            Self::DeleteScoringRule { .. } => "delete_scoring_rule",
            Self::CreateRole { .. } => "create_role",
            Self::UpdateRole { .. } => "update_role",
            Self::DeleteRole { .. } => "delete_role",
            Self::UpdateRolePermissions { .. } => "update_role_permissions",
            Self::CreateUser(_) => "create_user",
            Self::UpdateUser { .. } => "update_user",
            Self::DeleteUser { .. } => "delete_user",
            Self::AssignUserRole { .. } => "assign_user_role",
            Self::UpdateUserPermissions { .. } => "update_user_permissions",
        }
    }
}
