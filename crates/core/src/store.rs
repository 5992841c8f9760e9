// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The owned console store.
//!
//! The store holds the current state and the audit log and is the only
//! place where either changes. Commands go through `apply`; the store
//! commits the new state and its events together, or neither.

use crate::apply::{Context, apply};
use crate::clock::Clock;
use crate::command::Command;
use crate::drift::{DriftReport, DriftSource, apply_drift};
use crate::error::CoreError;
use crate::metrics::{self, Dashboard};
use crate::seed::demo_state;
use crate::state::{Outcome, State, TransitionResult};
use pdi_ops_audit::{Actor, AuditLog};
use pdi_ops_domain::{BusinessCalendar, User};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Store-wide settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Timezone used for "today" and hourly buckets.
    pub calendar: BusinessCalendar,
}

/// Current state, audit log and time source.
#[derive(Debug)]
pub struct Store {
    state: State,
    audit: AuditLog,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
}

impl Store {
    /// Creates a store around an existing state with an empty audit log.
    #[must_use]
    pub fn new(state: State, clock: Arc<dyn Clock>, config: StoreConfig) -> Self {
        Self {
            state,
            audit: AuditLog::new(),
            clock,
            config,
        }
    }

    /// Creates a store loaded with the demo data. Every demo account gets
    /// `password_hash`.
    #[must_use]
    pub fn seeded(clock: Arc<dyn Clock>, config: StoreConfig, password_hash: &str) -> Self {
        let (state, events) = demo_state(clock.now(), password_hash);
        let mut store: Self = Self::new(state, clock, config);
        store.audit.record_all(events);
        store
    }

    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub const fn audit(&self) -> &AuditLog {
        &self.audit
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The current instant according to the store's clock.
    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// Resolves a user id into the actor recorded on audit entries.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownActor` if no such user exists and
    /// `CoreError::InactiveActor` if the user has been deactivated.
    pub fn actor(&self, user_id: &str) -> Result<Actor, CoreError> {
        let user: &User = self
            .state
            .access
            .user(user_id)
            .ok_or_else(|| CoreError::UnknownActor(user_id.to_string()))?;
        if !user.active {
            return Err(CoreError::InactiveActor(user_id.to_string()));
        }
        Ok(Actor::new(
            user.user_id.clone(),
            user.name.clone(),
            user.role_id.clone(),
        ))
    }

    /// Applies a command and commits the result.
    ///
    /// # Errors
    ///
    /// Returns the error from `apply`. Neither the state nor the audit log
    /// changes on error.
    pub fn execute(
        &mut self,
        command: Command,
        actor: Actor,
        reason: &str,
    ) -> Result<Outcome, CoreError> {
        self.execute_recorded(command, actor, reason)
            .map(|(outcome, _)| outcome)
    }

    /// Like `execute`, but also returns the ids of the audit entries the
    /// command recorded, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the error from `apply`. Neither the state nor the audit log
    /// changes on error.
    pub fn execute_recorded(
        &mut self,
        command: Command,
        actor: Actor,
        reason: &str,
    ) -> Result<(Outcome, Vec<String>), CoreError> {
        let name: &'static str = command.name();
        let ctx: Context = Context::new(actor, reason, self.now());
        let result: TransitionResult = apply(&self.state, command, &ctx).inspect_err(|err| {
            debug!(command = name, actor = %ctx.actor.user_id, error = %err, "Command rejected");
        })?;

        self.state = result.new_state;
        let ids: Vec<String> = self.audit.record_all(result.audit_events);
        info!(
            command = name,
            actor = %ctx.actor.user_id,
            audit_entries = ids.len(),
            "Command applied"
        );
        Ok((result.outcome, ids))
    }

    /// Computes the dashboard at the current instant.
    #[must_use]
    pub fn dashboard(&self, location_id: Option<&str>) -> Dashboard {
        metrics::dashboard(&self.state, self.now(), &self.config.calendar, location_id)
    }

    /// Runs one drift tick against the live state.
    pub fn drift(&mut self, source: &mut dyn DriftSource) -> DriftReport {
        let now: OffsetDateTime = self.now();
        let report: DriftReport = apply_drift(&mut self.state, source, now);
        debug!(
            utilization_changed = report.utilization_changed,
            state_flips = report.state_flips.len(),
            new_item = ?report.new_item,
            "Drift tick"
        );
        report
    }
}
