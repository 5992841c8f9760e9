// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CrudFlags, CrudMatrixPatch, DomainError, Module, Operation, Permissions, PermissionsPatch,
    validate_identifier,
};

#[test]
fn test_read_only_permissions_allow_reads_only() {
    let perms = Permissions::read_only();
    assert!(perms.allows(Module::Queue, Operation::Read));
    assert!(perms.allows(Module::Audit, Operation::Read));
    assert!(!perms.allows(Module::Access, Operation::Read));
    assert!(!perms.allows(Module::Queue, Operation::Update));
    assert!(!perms.allows(Module::Pricing, Operation::Create));
}

#[test]
fn test_super_admin_cannot_write_audit() {
    let perms = Permissions::super_admin();
    assert!(perms.allows(Module::Access, Operation::Delete));
    assert!(perms.allows(Module::Queue, Operation::Create));
    assert!(!perms.allows(Module::Audit, Operation::Create));
    assert!(!perms.allows(Module::Audit, Operation::Delete));
}

#[test]
fn test_write_needs_manage_flag_and_crud_flag() {
    let mut perms = Permissions::super_admin();
    perms.manage_queue = false;
    assert!(!perms.allows(Module::Queue, Operation::Update));

    let mut perms = Permissions::super_admin();
    perms.crud.queue = CrudFlags::READ;
    assert!(!perms.allows(Module::Queue, Operation::Update));
    assert!(perms.allows(Module::Queue, Operation::Read));
}

#[test]
fn test_audit_read_needs_view_audit() {
    let mut perms = Permissions::read_only();
    perms.view_audit = false;
    assert!(!perms.allows(Module::Audit, Operation::Read));
    assert!(perms.allows(Module::Queue, Operation::Read));
}

#[test]
fn test_patch_overrides_only_present_fields() {
    let patch = PermissionsPatch {
        manage_queue: Some(true),
        crud: Some(CrudMatrixPatch {
            queue: Some(CrudFlags::NO_DELETE),
            ..CrudMatrixPatch::default()
        }),
        ..PermissionsPatch::default()
    };
    let effective = Permissions::read_only().with_patch(&patch);
    assert!(effective.allows(Module::Queue, Operation::Update));
    assert!(!effective.allows(Module::Queue, Operation::Delete));
    assert!(!effective.allows(Module::Inspectors, Operation::Update));
    assert_eq!(effective.crud.pricing, CrudFlags::READ);
}

#[test]
fn test_patch_merge_keeps_earlier_fields() {
    let mut stored = PermissionsPatch {
        manage_pricing: Some(true),
        crud: Some(CrudMatrixPatch {
            pricing: Some(CrudFlags::ALL),
            ..CrudMatrixPatch::default()
        }),
        ..PermissionsPatch::default()
    };
    let newer = PermissionsPatch {
        manage_pricing: Some(false),
        view_audit: Some(false),
        crud: Some(CrudMatrixPatch {
            queue: Some(CrudFlags::NONE),
            ..CrudMatrixPatch::default()
        }),
        ..PermissionsPatch::default()
    };
    stored.merge(&newer);

    assert_eq!(stored.manage_pricing, Some(false));
    assert_eq!(stored.view_audit, Some(false));
    let crud = stored.crud.unwrap();
    assert_eq!(crud.pricing, Some(CrudFlags::ALL));
    assert_eq!(crud.queue, Some(CrudFlags::NONE));
    assert!(!stored.is_empty());
    assert!(PermissionsPatch::default().is_empty());
}

#[test]
fn test_validate_identifier() {
    assert_eq!(validate_identifier("Role ID", "  auditor ").unwrap(), "auditor");
    assert_eq!(
        validate_identifier("Role ID", " ").unwrap_err(),
        DomainError::MissingField { field: "Role ID" }
    );
    assert!(validate_identifier("User ID", "USR 1").is_err());
}
