// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_finance, create_test_intake, create_test_ops_admin, create_test_store,
    create_test_viewer,
};
use crate::{
    ApiError, AuthError, AuthenticatedActor, AuthenticationService, AuthorizationService,
    LoginRequest, MutationResponse, SetDefaultPricingRequest, WhoAmIResponse, create_queue_item,
    login, set_default_pricing, whoami,
};
use pdi_ops::{DEMO_PASSWORD, Store};
use pdi_ops_domain::{Module, Operation};

fn credentials(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn test_login_is_case_insensitive_on_username() {
    let store: Store = create_test_store();

    let response: WhoAmIResponse =
        login(&store, &credentials("  OpsAdmin ", DEMO_PASSWORD)).unwrap();

    assert_eq!(response.user.user_id, "USR-OPS-1");
    assert_eq!(response.user.role_id, "ops_admin");
    assert!(response.capabilities.can_dispatch.is_allowed());
    assert!(!response.capabilities.can_manage_access.is_allowed());
}

#[test]
fn test_login_failures_share_one_message() {
    let store: Store = create_test_store();
    let expected: ApiError = ApiError::AuthenticationFailed {
        reason: String::from("Invalid username or password"),
    };

    let wrong_password: ApiError =
        login(&store, &credentials("opsadmin", "nope1234")).unwrap_err();
    let unknown_user: ApiError =
        login(&store, &credentials("ghost", DEMO_PASSWORD)).unwrap_err();

    assert_eq!(wrong_password, expected);
    assert_eq!(unknown_user, expected);
}

#[test]
fn test_authenticate_rejects_unknown_user() {
    let store: Store = create_test_store();

    let result: Result<AuthenticatedActor, AuthError> =
        AuthenticationService::authenticate(&store, "USR-NOPE");

    assert_eq!(
        result,
        Err(AuthError::AuthenticationFailed {
            reason: String::from("Unknown actor 'USR-NOPE'"),
        })
    );
}

#[test]
fn test_authenticate_resolves_effective_permissions() {
    let store: Store = create_test_store();

    let finance: AuthenticatedActor = create_test_finance(&store);

    assert_eq!(finance.name, "Finance");
    assert!(finance.can(Module::Pricing, Operation::Update));
    assert!(!finance.can(Module::Pricing, Operation::Delete));
    assert!(!finance.can(Module::Queue, Operation::Update));
    assert!(finance.can(Module::Audit, Operation::Read));
}

#[test]
fn test_authorization_error_names_permission() {
    let store: Store = create_test_store();
    let viewer: AuthenticatedActor = create_test_viewer(&store);

    let result: Result<(), AuthError> = AuthorizationService::authorize(
        &viewer,
        "create_queue_item",
        Module::Queue,
        Operation::Create,
    );

    assert_eq!(
        result,
        Err(AuthError::Unauthorized {
            action: String::from("create_queue_item"),
            required_permission: String::from("queue:create"),
        })
    );
}

#[test]
fn test_denied_mutation_leaves_store_untouched() {
    let mut store: Store = create_test_store();
    let viewer: AuthenticatedActor = create_test_viewer(&store);
    let audit_len: usize = store.audit().len();

    let result: Result<MutationResponse, ApiError> =
        create_queue_item(&mut store, &viewer, create_test_intake());

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert_eq!(store.state().queue.len(), 5);
    assert_eq!(store.audit().len(), audit_len);
}

#[test]
fn test_ops_admin_can_set_default_pricing() {
    let mut store: Store = create_test_store();
    let ops: AuthenticatedActor = create_test_ops_admin(&store);

    set_default_pricing(
        &mut store,
        &ops,
        SetDefaultPricingRequest {
            default_inr: 525,
            reason: String::from("Q1 rate card"),
        },
    )
    .unwrap();

    assert_eq!(store.state().pricing.default_inr, 525);
}

#[test]
fn test_whoami_reports_permissions() {
    let store: Store = create_test_store();
    let viewer: AuthenticatedActor = create_test_viewer(&store);

    let response: WhoAmIResponse = whoami(&store, &viewer).unwrap();

    assert_eq!(response.user.username, "viewer");
    assert_eq!(response.permissions, viewer.permissions);
    assert!(response.capabilities.can_view_queue.is_allowed());
    assert!(!response.capabilities.can_intake.is_allowed());
    assert!(!response.capabilities.can_view_access_control.is_allowed());
}
