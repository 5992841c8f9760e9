// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pdi_ops_audit::AuditEvent;
use pdi_ops_domain::{
    ChecklistTemplate, Commission, DomainError, Inspector, LeaveRequest, Location,
    Permissions, PermissionsPatch, PricingDefaults, QueueItem, Role, User, VehicleMaster,
    VehicleType,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters used to mint identifiers.
///
/// Generated identifiers skip values that are already taken, so counters can
/// start low even when seeded data uses the same prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequences {
    pub queue: u32,
    pub inspector: u32,
    pub commission: u32,
    pub leave_request: u32,
    pub mapping: u32,
    pub checklist: u32,
    pub correlation: u32,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            queue: 24001,
            inspector: 1,
            commission: 9001,
            leave_request: 1,
            mapping: 1,
            checklist: 1,
            correlation: 1,
        }
    }
}

const fn take(counter: &mut u32) -> u32 {
    let value: u32 = *counter;
    *counter = value.saturating_add(1);
    value
}

/// Roles, users and their permission sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessControl {
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub role_permissions: BTreeMap<String, Permissions>,
    pub user_overrides: BTreeMap<String, PermissionsPatch>,
}

impl AccessControl {
    /// Looks up a role by id.
    #[must_use]
    pub fn role(&self, role_id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    /// Looks up a user by login name (case-insensitive).
    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        let wanted: String = username.trim().to_lowercase();
        self.users
            .iter()
            .find(|u| u.username.to_lowercase() == wanted)
    }

    /// Returns the permission set of a role. Roles without an explicit set
    /// get the read-only default.
    #[must_use]
    pub fn role_permissions(&self, role_id: &str) -> Permissions {
        self.role_permissions
            .get(role_id)
            .copied()
            .unwrap_or_default()
    }

    /// Returns the permissions a user actually holds: the role set with the
    /// user's override merged on top.
    ///
    /// Returns `None` if the user does not exist.
    #[must_use]
    pub fn effective_permissions(&self, user_id: &str) -> Option<Permissions> {
        let user: &User = self.user(user_id)?;
        let base: Permissions = self.role_permissions(&user.role_id);
        Some(match self.user_overrides.get(user_id) {
            Some(patch) => base.with_patch(patch),
            None => base,
        })
    }

    /// Number of users holding a role.
    #[must_use]
    pub fn users_with_role(&self, role_id: &str) -> usize {
        self.users.iter().filter(|u| u.role_id == role_id).count()
    }
}

/// The complete console state.
///
/// Collections are ordered newest first where the console creates records
/// (queue, commissions, leave requests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub locations: Vec<Location>,
    pub queue: Vec<QueueItem>,
    pub inspectors: Vec<Inspector>,
    pub commissions: Vec<Commission>,
    pub leave_requests: Vec<LeaveRequest>,
    pub pricing: PricingDefaults,
    pub vehicle_master: VehicleMaster,
    pub checklists: BTreeMap<VehicleType, ChecklistTemplate>,
    pub access: AccessControl,
    pub sequences: Sequences,
}

impl State {
    /// Creates an empty state serving the given locations.
    #[must_use]
    pub fn new(locations: Vec<Location>) -> Self {
        let checklists: BTreeMap<VehicleType, ChecklistTemplate> = VehicleType::ALL
            .into_iter()
            .map(|t| (t, ChecklistTemplate::new(t)))
            .collect();
        Self {
            locations,
            queue: Vec::new(),
            inspectors: Vec::new(),
            commissions: Vec::new(),
            leave_requests: Vec::new(),
            pricing: PricingDefaults::default(),
            vehicle_master: VehicleMaster::default(),
            checklists,
            access: AccessControl::default(),
            sequences: Sequences::default(),
        }
    }

    /// Looks up a location.
    #[must_use]
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Looks up a queue item.
    #[must_use]
    pub fn queue_item(&self, id: &str) -> Option<&QueueItem> {
        self.queue.iter().find(|q| q.id == id)
    }

    /// Looks up an inspector.
    #[must_use]
    pub fn inspector(&self, id: &str) -> Option<&Inspector> {
        self.inspectors.iter().find(|i| i.id == id)
    }

    /// Looks up a commission.
    #[must_use]
    pub fn commission(&self, id: &str) -> Option<&Commission> {
        self.commissions.iter().find(|c| c.id == id)
    }

    /// Returns the commission attached to a queue item.
    #[must_use]
    pub fn commission_for(&self, pdi_id: &str) -> Option<&Commission> {
        self.commissions.iter().find(|c| c.pdi_id == pdi_id)
    }

    /// Looks up a leave request.
    #[must_use]
    pub fn leave_request(&self, id: &str) -> Option<&LeaveRequest> {
        self.leave_requests.iter().find(|r| r.id == id)
    }

    /// Returns the checklist template of a vehicle condition.
    #[must_use]
    pub fn checklist(&self, condition: VehicleType) -> Option<&ChecklistTemplate> {
        self.checklists.get(&condition)
    }

    pub(crate) fn queue_item_mut(&mut self, id: &str) -> Result<&mut QueueItem, DomainError> {
        self.queue
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| not_found("Queue item", id))
    }

    pub(crate) fn inspector_mut(&mut self, id: &str) -> Result<&mut Inspector, DomainError> {
        self.inspectors
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("Inspector", id))
    }

    pub(crate) fn leave_request_mut(
        &mut self,
        id: &str,
    ) -> Result<&mut LeaveRequest, DomainError> {
        self.leave_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Leave request", id))
    }

    pub(crate) fn checklist_mut(
        &mut self,
        condition: VehicleType,
    ) -> &mut ChecklistTemplate {
        self.checklists
            .entry(condition)
            .or_insert_with(|| ChecklistTemplate::new(condition))
    }

    /// Mints the next queue item id (e.g. `PDI-24006`).
    pub fn next_queue_id(&mut self) -> String {
        loop {
            let id: String = format!("PDI-{}", take(&mut self.sequences.queue));
            if self.queue_item(&id).is_none() {
                return id;
            }
        }
    }

    pub(crate) fn next_inspector_id(&mut self) -> String {
        loop {
            let id: String = format!("INSP-{:03}", take(&mut self.sequences.inspector));
            if self.inspector(&id).is_none() {
                return id;
            }
        }
    }

    pub(crate) fn next_commission_id(&mut self) -> String {
        loop {
            let id: String = format!("COM-{}", take(&mut self.sequences.commission));
            if self.commission(&id).is_none() {
                return id;
            }
        }
    }

    pub(crate) fn next_leave_request_id(&mut self) -> String {
        loop {
            let id: String = format!("LVR-{:04}", take(&mut self.sequences.leave_request));
            if self.leave_request(&id).is_none() {
                return id;
            }
        }
    }

    pub(crate) fn next_mapping_id(&mut self) -> String {
        loop {
            let id: String = format!("MAP-{:04}", take(&mut self.sequences.mapping));
            if self.vehicle_master.mapping(&id).is_none() {
                return id;
            }
        }
    }

    pub(crate) fn next_checklist_id(&mut self, prefix: &str) -> String {
        format!("{prefix}-{:03}", take(&mut self.sequences.checklist))
    }

    pub(crate) fn next_correlation_id(&mut self) -> String {
        format!("AUTO-{:04}", take(&mut self.sequences.correlation))
    }
}

pub(crate) fn not_found(entity: &'static str, id: &str) -> DomainError {
    DomainError::NotFound {
        entity,
        id: id.to_string(),
    }
}

/// What a successful command produced, besides the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The command changed existing records.
    Updated,
    /// The command created a record with this id.
    Created { id: String },
    /// Auto-assign finished; `assigned` may be zero.
    Assigned {
        assigned: usize,
        correlation_id: String,
    },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// One event per changed record, in the order they happened.
    pub audit_events: Vec<AuditEvent>,
    /// What the command produced.
    pub outcome: Outcome,
}
