// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-based access control model.
//!
//! A user's effective permissions are the permission set of their role with
//! the user's own override patch merged on top. Coarse `manage_*` flags gate
//! whole areas of the console; per-module CRUD flags refine them.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The built-in role that can never be deleted.
pub const SUPER_ADMIN_ROLE_ID: &str = "super_admin";

/// The built-in user that can never be deleted.
pub const SUPER_ADMIN_USER_ID: &str = "USR-SA-1";

/// Areas of the console governed by CRUD flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Queue,
    Inspectors,
    Pricing,
    Audit,
    Access,
}

impl Module {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Inspectors => "inspectors",
            Self::Pricing => "pricing",
            Self::Audit => "audit",
            Self::Access => "access",
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CRUD verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD flags for one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrudFlags {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl CrudFlags {
    /// Every operation allowed.
    pub const ALL: Self = Self {
        create: true,
        read: true,
        update: true,
        delete: true,
    };

    /// Only reads allowed.
    pub const READ: Self = Self {
        create: false,
        read: true,
        update: false,
        delete: false,
    };

    /// Nothing allowed.
    pub const NONE: Self = Self {
        create: false,
        read: false,
        update: false,
        delete: false,
    };

    /// Everything except delete.
    pub const NO_DELETE: Self = Self {
        create: true,
        read: true,
        update: true,
        delete: false,
    };

    /// Returns the flag for an operation.
    #[must_use]
    pub const fn allows(&self, op: Operation) -> bool {
        match op {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

/// CRUD flags for every module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrudMatrix {
    pub queue: CrudFlags,
    pub inspectors: CrudFlags,
    pub pricing: CrudFlags,
    pub audit: CrudFlags,
    pub access: CrudFlags,
}

impl CrudMatrix {
    /// Returns the flags of a module.
    #[must_use]
    pub const fn module(&self, module: Module) -> CrudFlags {
        match module {
            Module::Queue => self.queue,
            Module::Inspectors => self.inspectors,
            Module::Pricing => self.pricing,
            Module::Audit => self.audit,
            Module::Access => self.access,
        }
    }
}

/// A complete permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub view: bool,
    pub manage_queue: bool,
    pub manage_inspectors: bool,
    pub manage_pricing: bool,
    pub view_audit: bool,
    pub manage_access: bool,
    pub crud: CrudMatrix,
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_only()
    }
}

impl Permissions {
    /// The set given to newly created roles: read everything except access
    /// control, change nothing.
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            view: true,
            manage_queue: false,
            manage_inspectors: false,
            manage_pricing: false,
            view_audit: true,
            manage_access: false,
            crud: CrudMatrix {
                queue: CrudFlags::READ,
                inspectors: CrudFlags::READ,
                pricing: CrudFlags::READ,
                audit: CrudFlags::READ,
                access: CrudFlags::NONE,
            },
        }
    }

    /// Everything, except that audit entries are read-only for everyone.
    #[must_use]
    pub const fn super_admin() -> Self {
        Self {
            view: true,
            manage_queue: true,
            manage_inspectors: true,
            manage_pricing: true,
            view_audit: true,
            manage_access: true,
            crud: CrudMatrix {
                queue: CrudFlags::ALL,
                inspectors: CrudFlags::ALL,
                pricing: CrudFlags::ALL,
                audit: CrudFlags::READ,
                access: CrudFlags::ALL,
            },
        }
    }

    const fn manages(&self, module: Module) -> bool {
        match module {
            Module::Queue => self.manage_queue,
            Module::Inspectors => self.manage_inspectors,
            Module::Pricing => self.manage_pricing,
            Module::Access => self.manage_access,
            Module::Audit => false,
        }
    }

    /// Returns true if this set permits `op` on `module`.
    ///
    /// Reads need `view` and the module's read flag (plus `view_audit` for
    /// the audit log). Writes need the module's `manage_*` flag and the
    /// matching CRUD flag. The audit log is never writable.
    #[must_use]
    pub const fn allows(&self, module: Module, op: Operation) -> bool {
        let flags: CrudFlags = self.crud.module(module);
        match op {
            Operation::Read => {
                let audit_ok: bool = !matches!(module, Module::Audit) || self.view_audit;
                self.view && flags.read && audit_ok
            }
            Operation::Create | Operation::Update | Operation::Delete => {
                self.manages(module) && flags.allows(op)
            }
        }
    }

    /// Returns a copy with `patch` merged on top.
    #[must_use]
    pub fn with_patch(mut self, patch: &PermissionsPatch) -> Self {
        self.view = patch.view.unwrap_or(self.view);
        self.manage_queue = patch.manage_queue.unwrap_or(self.manage_queue);
        self.manage_inspectors = patch.manage_inspectors.unwrap_or(self.manage_inspectors);
        self.manage_pricing = patch.manage_pricing.unwrap_or(self.manage_pricing);
        self.view_audit = patch.view_audit.unwrap_or(self.view_audit);
        self.manage_access = patch.manage_access.unwrap_or(self.manage_access);
        if let Some(crud) = &patch.crud {
            self.crud.queue = crud.queue.unwrap_or(self.crud.queue);
            self.crud.inspectors = crud.inspectors.unwrap_or(self.crud.inspectors);
            self.crud.pricing = crud.pricing.unwrap_or(self.crud.pricing);
            self.crud.audit = crud.audit.unwrap_or(self.crud.audit);
            self.crud.access = crud.access.unwrap_or(self.crud.access);
        }
        self
    }
}

/// Per-module replacements within a patch. A present module replaces all
/// four of its flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrudMatrixPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<CrudFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspectors: Option<CrudFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<CrudFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<CrudFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<CrudFlags>,
}

impl CrudMatrixPatch {
    fn merge(&mut self, newer: &Self) {
        self.queue = newer.queue.or(self.queue);
        self.inspectors = newer.inspectors.or(self.inspectors);
        self.pricing = newer.pricing.or(self.pricing);
        self.audit = newer.audit.or(self.audit);
        self.access = newer.access.or(self.access);
    }
}

/// A partial permission set. Absent fields defer to the underlying set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_queue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_inspectors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_pricing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_audit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crud: Option<CrudMatrixPatch>,
}

impl PermissionsPatch {
    /// Folds a newer patch into this one; fields present in `newer` win.
    pub fn merge(&mut self, newer: &Self) {
        self.view = newer.view.or(self.view);
        self.manage_queue = newer.manage_queue.or(self.manage_queue);
        self.manage_inspectors = newer.manage_inspectors.or(self.manage_inspectors);
        self.manage_pricing = newer.manage_pricing.or(self.manage_pricing);
        self.view_audit = newer.view_audit.or(self.view_audit);
        self.manage_access = newer.manage_access.or(self.manage_access);
        match (&mut self.crud, &newer.crud) {
            (Some(existing), Some(incoming)) => existing.merge(incoming),
            (None, Some(incoming)) => self.crud = Some(*incoming),
            (_, None) => {}
        }
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// A console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub role_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: String,
    /// bcrypt hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub active: bool,
}

/// Validates a role or user identifier.
///
/// # Errors
///
/// Returns `DomainError::MissingField` for blank ids and
/// `DomainError::InvalidValue` for ids containing whitespace.
pub fn validate_identifier(field: &'static str, id: &str) -> Result<String, DomainError> {
    let trimmed: &str = id.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField { field });
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidValue {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

impl FromStr for Module {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "queue" => Ok(Self::Queue),
            "inspectors" => Ok(Self::Inspectors),
            "pricing" => Ok(Self::Pricing),
            "audit" => Ok(Self::Audit),
            "access" => Ok(Self::Access),
            other => Err(DomainError::InvalidValue {
                field: "module",
                value: other.to_string(),
            }),
        }
    }
}
