// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction for the server.
//!
//! The console has no sessions. Callers name themselves with the
//! `x-actor-user-id` header and the server resolves that id against the
//! access-control tables on every request.

use axum::{extract::FromRequestParts, http::request::Parts};
use pdi_ops_api::{ApiError, AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Header carrying the acting user's id.
pub const ACTOR_HEADER: &str = "x-actor-user-id";

/// Extractor for the acting user.
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing, is not valid UTF-8,
/// names an unknown user, or names an inactive user.
pub struct RequestActor(pub AuthenticatedActor);

impl FromRequestParts<AppState> for RequestActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id: &str = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| {
                debug!("Missing actor header");
                HttpError::unauthenticated(format!("Missing {ACTOR_HEADER} header"))
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid actor header encoding");
                HttpError::unauthenticated(format!("Invalid {ACTOR_HEADER} header"))
            })?;

        let store = state.store.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::authenticate(&store, user_id).map_err(|e| {
                warn!(user_id = %user_id, error = %e, "Actor rejected");
                HttpError::from(ApiError::from(e))
            })?;
        drop(store);

        debug!(user_id = %actor.user_id, role = %actor.role_id, "Actor resolved");
        Ok(Self(actor))
    }
}
