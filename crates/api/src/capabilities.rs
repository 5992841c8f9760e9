// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for permission-aware UI gating.
//!
//! Capabilities expose what actions a user is permitted to perform
//! without leaking domain internals. They are advisory only and do not
//! replace backend authorization checks.

use crate::auth::AuthenticatedActor;
use crate::request_response::{Capability, GlobalCapabilities, UserCapabilities};
use pdi_ops_domain::{Module, Operation, SUPER_ADMIN_USER_ID, User};

/// Computes console-wide capabilities for an authenticated actor.
///
/// # Arguments
///
/// * `actor` - The authenticated actor
#[must_use]
pub const fn compute_global_capabilities(actor: &AuthenticatedActor) -> GlobalCapabilities {
    GlobalCapabilities {
        can_view_queue: Capability::from_bool(actor.can(Module::Queue, Operation::Read)),
        can_intake: Capability::from_bool(actor.can(Module::Queue, Operation::Create)),
        can_dispatch: Capability::from_bool(actor.can(Module::Queue, Operation::Update)),
        can_manage_payments: Capability::from_bool(actor.can(Module::Pricing, Operation::Update)),
        can_manage_inspectors: Capability::from_bool(
            actor.can(Module::Inspectors, Operation::Update),
        ),
        can_edit_checklists: Capability::from_bool(
            actor.can(Module::Inspectors, Operation::Update),
        ),
        can_edit_vehicle_master: Capability::from_bool(
            actor.can(Module::Pricing, Operation::Create),
        ),
        can_delete_vehicle_master: Capability::from_bool(
            actor.can(Module::Pricing, Operation::Delete),
        ),
        can_view_audit: Capability::from_bool(actor.can(Module::Audit, Operation::Read)),
        can_view_access_control: Capability::from_bool(actor.can(Module::Access, Operation::Read)),
        can_manage_access: Capability::from_bool(actor.can(Module::Access, Operation::Update)),
    }
}

/// Computes what an actor may do to one console user.
///
/// Target-specific capabilities depend on:
/// - The actor's access permissions
/// - Whether the target is the built-in super admin
/// - Whether the target is the actor (nobody deletes or deactivates
///   themselves)
///
/// # Arguments
///
/// * `actor` - The authenticated actor
/// * `target` - The user being acted on
#[must_use]
pub fn compute_user_capabilities(actor: &AuthenticatedActor, target: &User) -> UserCapabilities {
    let can_update: bool = actor.can(Module::Access, Operation::Update);
    let can_delete: bool = actor.can(Module::Access, Operation::Delete);
    let protected: bool = target.user_id == SUPER_ADMIN_USER_ID;
    let is_self: bool = target.user_id == actor.user_id;

    UserCapabilities {
        can_edit: Capability::from_bool(can_update),
        can_deactivate: Capability::from_bool(can_update && !protected && !is_self),
        can_change_role: Capability::from_bool(can_update && !protected),
        can_delete: Capability::from_bool(can_delete && !protected && !is_self),
    }
}
