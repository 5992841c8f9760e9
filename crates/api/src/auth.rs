// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization for console users.

use crate::error::{ApiError, AuthError};
use pdi_ops::Store;
use pdi_ops_audit::Actor;
use pdi_ops_domain::{Module, Operation, Permissions, User};
use tracing::debug;

/// An authenticated console user and the permissions they hold right now.
///
/// Permissions are resolved when the actor is authenticated: the role's set
/// with the user's override merged on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user id.
    pub user_id: String,
    /// Display name recorded on audit entries.
    pub name: String,
    /// The user's role.
    pub role_id: String,
    /// Effective permissions.
    pub permissions: Permissions,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user id
    /// * `name` - The user's display name
    /// * `role_id` - The user's role
    /// * `permissions` - The user's effective permissions
    #[must_use]
    pub const fn new(
        user_id: String,
        name: String,
        role_id: String,
        permissions: Permissions,
    ) -> Self {
        Self {
            user_id,
            name,
            role_id,
            permissions,
        }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(
            self.user_id.clone(),
            self.name.clone(),
            self.role_id.clone(),
        )
    }

    /// Returns true if the actor may perform `op` on `module`.
    #[must_use]
    pub const fn can(&self, module: Module, op: Operation) -> bool {
        self.permissions.allows(module, op)
    }
}

/// Authorization checks.
///
/// Every API operation names the module and operation it needs; the check
/// is made against the actor's effective permissions before any state is
/// touched.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor may perform `op` on `module`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The action name reported on failure
    /// * `module` - The console module the action belongs to
    /// * `op` - The CRUD operation the action performs
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the permission is not held.
    pub fn authorize(
        actor: &AuthenticatedActor,
        action: &str,
        module: Module,
        op: Operation,
    ) -> Result<(), AuthError> {
        if actor.can(module, op) {
            return Ok(());
        }
        debug!(
            user_id = %actor.user_id,
            action,
            module = %module,
            operation = %op,
            "Permission denied"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_permission: format!("{module}:{op}"),
        })
    }
}

/// Authentication against the store's user directory.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Resolves a user id into an authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `store` - The console store
    /// * `user_id` - The id presented by the caller
    ///
    /// # Errors
    ///
    /// Returns an error if the user is unknown or inactive.
    pub fn authenticate(store: &Store, user_id: &str) -> Result<AuthenticatedActor, AuthError> {
        let actor: Actor = store
            .actor(user_id.trim())
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: e.to_string(),
            })?;
        let permissions: Permissions = store
            .state()
            .access
            .effective_permissions(&actor.user_id)
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Unknown actor '{}'", actor.user_id),
            })?;

        Ok(AuthenticatedActor::new(
            actor.user_id,
            actor.name,
            actor.role,
            permissions,
        ))
    }

    /// Verifies a username and password.
    ///
    /// Unknown usernames and wrong passwords produce the same message.
    ///
    /// # Arguments
    ///
    /// * `store` - The console store
    /// * `username` - The login name (case-insensitive)
    /// * `password` - The plain-text password
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials do not match an active user.
    pub fn login(
        store: &Store,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let invalid = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid username or password"),
        };

        let user: &User = store
            .state()
            .access
            .user_by_username(username)
            .ok_or_else(invalid)?;

        let matches: bool = bcrypt::verify(password, &user.password_hash).map_err(|e| {
            debug!(user_id = %user.user_id, error = %e, "Stored password hash is unusable");
            invalid()
        })?;
        if !matches {
            return Err(invalid());
        }

        Self::authenticate(store, &user.user_id)
    }

    /// Hashes a password for storage.
    ///
    /// # Arguments
    ///
    /// * `password` - The plain-text password
    /// * `cost` - The bcrypt cost factor
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if hashing fails.
    pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
        bcrypt::hash(password, cost).map_err(|e| ApiError::Internal {
            message: format!("Failed to hash password: {e}"),
        })
    }
}
