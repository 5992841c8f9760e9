// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{Context, Transition};
use crate::command::{UserDraft, UserPatch};
use crate::error::CoreError;
use crate::state::{AccessControl, Outcome, not_found};
use pdi_ops_audit::Diff;
use pdi_ops_domain::{
    DomainError, Permissions, PermissionsPatch, Role, SUPER_ADMIN_ROLE_ID, SUPER_ADMIN_USER_ID,
    User, require_text, validate_identifier,
};

fn require_role(access: &AccessControl, role_id: &str) -> Result<(), DomainError> {
    if access.role(role_id).is_none() {
        return Err(not_found("Role", role_id));
    }
    Ok(())
}

fn user_mut<'a>(access: &'a mut AccessControl, user_id: &str) -> Result<&'a mut User, DomainError> {
    access
        .users
        .iter_mut()
        .find(|u| u.user_id == user_id)
        .ok_or_else(|| not_found("User", user_id))
}

fn ensure_username_free(
    access: &AccessControl,
    username: &str,
    except_user_id: Option<&str>,
) -> Result<(), DomainError> {
    let wanted: String = username.to_lowercase();
    let taken: bool = access
        .users
        .iter()
        .any(|u| u.username.to_lowercase() == wanted && Some(u.user_id.as_str()) != except_user_id);
    if taken {
        return Err(DomainError::DuplicateName {
            entity: "User",
            name: username.to_string(),
        });
    }
    Ok(())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(super) fn create_role(
    tx: &mut Transition,
    role_id: &str,
    name: Option<&str>,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let id: String = validate_identifier("Role ID", role_id)?;
    if tx.state.access.role(&id).is_some() {
        return Err(DomainError::DuplicateId { entity: "Role", id }.into());
    }
    let name: String = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(&id)
        .to_string();

    let role = Role {
        id: id.clone(),
        name,
    };
    let diff: Diff = Diff::new().with("created", None::<Role>, &role);
    tx.state.access.roles.push(role);
    tx.state
        .access
        .role_permissions
        .insert(id.clone(), Permissions::read_only());
    tx.record(ctx.event("rbac_role", &id, "create_role", diff));
    Ok(Outcome::Created { id })
}

pub(super) fn update_role(
    tx: &mut Transition,
    role_id: &str,
    name: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let name: String = require_text("Role name", name)?;
    let role: &mut Role = tx
        .state
        .access
        .roles
        .iter_mut()
        .find(|r| r.id == role_id)
        .ok_or_else(|| not_found("Role", role_id))?;
    let before: String = std::mem::replace(&mut role.name, name);
    let diff: Diff = Diff::new().with("name", before, &role.name);
    tx.record(ctx.event("rbac_role", role_id, "update_role", diff));
    Ok(Outcome::Updated)
}

pub(super) fn delete_role(
    tx: &mut Transition,
    role_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    if role_id == SUPER_ADMIN_ROLE_ID {
        return Err(DomainError::ProtectedRole {
            role_id: role_id.to_string(),
        }
        .into());
    }
    let access: &mut AccessControl = &mut tx.state.access;
    let index: usize = access
        .roles
        .iter()
        .position(|r| r.id == role_id)
        .ok_or_else(|| not_found("Role", role_id))?;
    let user_count: usize = access.users_with_role(role_id);
    if user_count > 0 {
        return Err(DomainError::RoleInUse {
            role_id: role_id.to_string(),
            user_count,
        }
        .into());
    }

    let removed: Role = access.roles.remove(index);
    access.role_permissions.remove(role_id);
    tx.record(ctx.event(
        "rbac_role",
        role_id,
        "delete_role",
        Diff::new().with("deleted", &removed, None::<Role>),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn update_role_permissions(
    tx: &mut Transition,
    role_id: &str,
    patch: &PermissionsPatch,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let access: &mut AccessControl = &mut tx.state.access;
    require_role(access, role_id)?;
    let before: Permissions = access.role_permissions(role_id);
    let next: Permissions = before.with_patch(patch);
    access.role_permissions.insert(role_id.to_string(), next);

    tx.record(ctx.event(
        "rbac_role",
        role_id,
        "update_role_permissions",
        Diff::new().with("permissions", before, next),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn create_user(
    tx: &mut Transition,
    draft: UserDraft,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let access: &mut AccessControl = &mut tx.state.access;
    let id: String = validate_identifier("User ID", &draft.user_id)?;
    if access.user(&id).is_some() {
        return Err(DomainError::DuplicateId { entity: "User", id }.into());
    }
    require_role(access, draft.role_id.trim())?;
    if draft.password_hash.is_empty() {
        return Err(DomainError::MissingField { field: "Password" }.into());
    }
    let username: String = optional_text(draft.username).unwrap_or_else(|| id.to_lowercase());
    ensure_username_free(access, &username, None)?;

    let user = User {
        user_id: id.clone(),
        name: optional_text(draft.name).unwrap_or_else(|| id.clone()),
        role_id: draft.role_id.trim().to_string(),
        email: optional_text(draft.email),
        phone: optional_text(draft.phone),
        username,
        password_hash: draft.password_hash,
        active: draft.active.unwrap_or(true),
    };
    let diff: Diff = Diff::new().with("created", None::<User>, &user);
    access.users.push(user);
    tx.record(ctx.event("rbac_user", &id, "create_user", diff));
    Ok(Outcome::Created { id })
}

pub(super) fn update_user(
    tx: &mut Transition,
    user_id: &str,
    patch: UserPatch,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    if user_id == SUPER_ADMIN_USER_ID && patch.active == Some(false) {
        return Err(DomainError::ProtectedUser {
            user_id: user_id.to_string(),
        }
        .into());
    }
    let access: &mut AccessControl = &mut tx.state.access;
    if let Some(username) = optional_text(patch.username.clone()) {
        ensure_username_free(access, &username, Some(user_id))?;
    }

    let user: &mut User = user_mut(access, user_id)?;
    let before: User = user.clone();
    if let Some(name) = patch.name {
        user.name = require_text("Name", &name)?;
    }
    if let Some(username) = patch.username {
        user.username = require_text("Username", &username)?;
    }
    if patch.email.is_some() {
        user.email = optional_text(patch.email);
    }
    if patch.phone.is_some() {
        user.phone = optional_text(patch.phone);
    }
    if let Some(hash) = patch.password_hash {
        user.password_hash = hash;
    }
    if let Some(active) = patch.active {
        user.active = active;
    }

    let mut diff: Diff = Diff::new().with("user", &before, &*user);
    if before.password_hash != user.password_hash {
        diff = diff.with("password", "********", "********");
    }
    tx.record(ctx.event("rbac_user", user_id, "update_user", diff));
    Ok(Outcome::Updated)
}

pub(super) fn delete_user(
    tx: &mut Transition,
    user_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    if user_id == SUPER_ADMIN_USER_ID {
        return Err(DomainError::ProtectedUser {
            user_id: user_id.to_string(),
        }
        .into());
    }
    let access: &mut AccessControl = &mut tx.state.access;
    let index: usize = access
        .users
        .iter()
        .position(|u| u.user_id == user_id)
        .ok_or_else(|| not_found("User", user_id))?;
    let removed: User = access.users.remove(index);
    access.user_overrides.remove(user_id);

    tx.record(ctx.event(
        "rbac_user",
        user_id,
        "delete_user",
        Diff::new().with("deleted", &removed, None::<User>),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn assign_role(
    tx: &mut Transition,
    user_id: &str,
    role_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    if user_id == SUPER_ADMIN_USER_ID && role_id != SUPER_ADMIN_ROLE_ID {
        return Err(DomainError::ProtectedUser {
            user_id: user_id.to_string(),
        }
        .into());
    }
    let access: &mut AccessControl = &mut tx.state.access;
    require_role(access, role_id)?;
    let user: &mut User = user_mut(access, user_id)?;
    let before: String = std::mem::replace(&mut user.role_id, role_id.to_string());

    tx.record(ctx.event(
        "rbac_user",
        user_id,
        "assign_user_role",
        Diff::new().with("role", before, role_id),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn update_user_permissions(
    tx: &mut Transition,
    user_id: &str,
    patch: &PermissionsPatch,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let access: &mut AccessControl = &mut tx.state.access;
    if access.user(user_id).is_none() {
        return Err(not_found("User", user_id).into());
    }
    let before: PermissionsPatch = access
        .user_overrides
        .get(user_id)
        .copied()
        .unwrap_or_default();
    let mut next: PermissionsPatch = before;
    next.merge(patch);
    access.user_overrides.insert(user_id.to_string(), next);

    tx.record(ctx.event(
        "rbac_user",
        user_id,
        "update_user_permissions",
        Diff::new().with("permissions", before, next),
    ));
    Ok(Outcome::Updated)
}
