// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    TEST_BCRYPT_COST, create_test_actor, create_test_intake, create_test_ops_admin,
    create_test_reason, create_test_store, create_test_super_admin,
};
use crate::{
    AccessControlResponse, ApiError, AssignUserRoleRequest, AuthenticatedActor,
    CreateRoleRequest, CreateUserRequest, LoginRequest, MutationResponse,
    UpdatePermissionsRequest, UpdateUserRequest, UserCapabilities, WhoAmIResponse,
    assign_user_role, create_queue_item, create_role, create_user, delete_role, delete_user,
    get_access_control, login, update_user, update_user_permissions,
};
use pdi_ops::{Outcome, Store};
use pdi_ops_domain::{CrudFlags, CrudMatrixPatch, Permissions, PermissionsPatch};

fn new_user(password: &str) -> CreateUserRequest {
    CreateUserRequest {
        user_id: String::from("USR-QA-1"),
        name: Some(String::from("QA Desk")),
        role_id: String::from("read_only"),
        email: None,
        phone: None,
        username: None,
        password: password.to_string(),
        active: None,
        reason: String::from("Quality audit rotation"),
    }
}

fn assert_rule(err: &ApiError, expected: &str) {
    match err {
        ApiError::DomainRuleViolation { rule, .. } => assert_eq!(rule, expected),
        other => panic!("expected rule '{expected}', got {other:?}"),
    }
}

#[test]
fn test_access_control_lists_user_capabilities() {
    let store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    let response: AccessControlResponse = get_access_control(&store, &admin).unwrap();

    assert_eq!(response.roles.len(), 5);
    assert_eq!(response.users.len(), 5);
    let own: UserCapabilities = response.user_capabilities["USR-SA-1"];
    let ops: UserCapabilities = response.user_capabilities["USR-OPS-1"];
    assert!(own.can_edit.is_allowed());
    assert!(!own.can_delete.is_allowed());
    assert!(!own.can_change_role.is_allowed());
    assert!(ops.can_delete.is_allowed());
    assert!(ops.can_deactivate.is_allowed());
}

#[test]
fn test_access_control_hides_password_hashes() {
    let store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    let response: AccessControlResponse = get_access_control(&store, &admin).unwrap();
    let json: String = serde_json::to_string(&response).unwrap();

    assert!(!json.contains("password"));
    assert!(!json.contains("$2"));
}

#[test]
fn test_ops_admin_cannot_read_access_control() {
    let store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    let err: ApiError = get_access_control(&store, &ops).unwrap_err();

    assert_eq!(
        err,
        ApiError::Unauthorized {
            action: String::from("get_access_control"),
            required_permission: String::from("access:read"),
        }
    );
}

#[test]
fn test_create_user_enforces_password_policy() {
    let mut store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    let err: ApiError =
        create_user(&mut store, &admin, new_user("short"), TEST_BCRYPT_COST).unwrap_err();

    assert!(matches!(err, ApiError::PasswordPolicyViolation { .. }));
    assert!(store.state().access.user("USR-QA-1").is_none());
}

#[test]
fn test_created_user_can_log_in() {
    let mut store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    let response: MutationResponse =
        create_user(&mut store, &admin, new_user("qa-desk-2026"), TEST_BCRYPT_COST).unwrap();
    let whoami: WhoAmIResponse = login(
        &store,
        &LoginRequest {
            username: String::from("usr-qa-1"),
            password: String::from("qa-desk-2026"),
        },
    )
    .unwrap();

    assert_eq!(
        response.outcome,
        Outcome::Created {
            id: String::from("USR-QA-1")
        }
    );
    assert_eq!(whoami.user.name, "QA Desk");
    assert_eq!(whoami.permissions, Permissions::read_only());
}

#[test]
fn test_changed_password_replaces_old_one() {
    let mut store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    update_user(
        &mut store,
        &admin,
        "USR-RO-1",
        UpdateUserRequest {
            password: Some(String::from("viewer#2026")),
            ..UpdateUserRequest::default()
        },
        TEST_BCRYPT_COST,
    )
    .unwrap();

    let old: Result<WhoAmIResponse, ApiError> = login(
        &store,
        &LoginRequest {
            username: String::from("viewer"),
            password: String::from("admin123"),
        },
    );
    let new: Result<WhoAmIResponse, ApiError> = login(
        &store,
        &LoginRequest {
            username: String::from("viewer"),
            password: String::from("viewer#2026"),
        },
    );
    assert!(old.is_err());
    assert!(new.is_ok());
}

#[test]
fn test_actor_cannot_remove_own_account() {
    let mut store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    let delete: ApiError =
        delete_user(&mut store, &admin, "USR-SA-1", &create_test_reason("")).unwrap_err();
    let deactivate: ApiError = update_user(
        &mut store,
        &admin,
        "USR-SA-1",
        UpdateUserRequest {
            active: Some(false),
            ..UpdateUserRequest::default()
        },
        TEST_BCRYPT_COST,
    )
    .unwrap_err();

    assert_rule(&delete, "self_protection");
    assert_rule(&deactivate, "self_protection");
}

#[test]
fn test_super_admin_keeps_role() {
    let mut store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    let err: ApiError = assign_user_role(
        &mut store,
        &admin,
        "USR-SA-1",
        AssignUserRoleRequest {
            role_id: String::from("read_only"),
            reason: String::new(),
        },
    )
    .unwrap_err();

    assert_rule(&err, "protected_user");
}

#[test]
fn test_role_deletion_rules() {
    let mut store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    let protected: ApiError =
        delete_role(&mut store, &admin, "super_admin", &create_test_reason("")).unwrap_err();
    let in_use: ApiError =
        delete_role(&mut store, &admin, "ops_admin", &create_test_reason("")).unwrap_err();
    create_role(
        &mut store,
        &admin,
        CreateRoleRequest {
            role_id: String::from("auditor"),
            name: Some(String::from("Auditor")),
            reason: String::new(),
        },
    )
    .unwrap();
    delete_role(&mut store, &admin, "auditor", &create_test_reason("Unused")).unwrap();

    assert_rule(&protected, "protected_role");
    assert_rule(&in_use, "role_in_use");
    assert!(store.state().access.role("auditor").is_none());
}

#[test]
fn test_user_override_grants_queue_intake() {
    let mut store: Store = create_test_store();
    let admin: AuthenticatedActor = create_test_super_admin(&store);

    update_user_permissions(
        &mut store,
        &admin,
        "USR-RO-1",
        UpdatePermissionsRequest {
            patch: PermissionsPatch {
                manage_queue: Some(true),
                crud: Some(CrudMatrixPatch {
                    queue: Some(CrudFlags::NO_DELETE),
                    ..CrudMatrixPatch::default()
                }),
                ..PermissionsPatch::default()
            },
            reason: String::from("Covering the front desk"),
        },
    )
    .unwrap();
    let viewer: AuthenticatedActor = create_test_actor(&store, "USR-RO-1");

    let response: MutationResponse =
        create_queue_item(&mut store, &viewer, create_test_intake()).unwrap();

    assert!(matches!(response.outcome, Outcome::Created { .. }));
}
