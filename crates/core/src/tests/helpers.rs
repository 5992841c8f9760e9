// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Command, Context, CoreError, DriftSource, FixedClock, State, Store, StoreConfig,
    TransitionResult, apply, demo_state,
};
use pdi_ops_audit::Actor;
use pdi_ops_domain::DomainError;
use std::collections::VecDeque;
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;

/// 11:30 in Bengaluru.
pub const fn test_now() -> OffsetDateTime {
    datetime!(2026-02-10 06:00 UTC)
}

pub fn create_test_state() -> State {
    demo_state(test_now(), "test-hash").0
}

pub fn create_test_actor() -> Actor {
    Actor::new(
        String::from("USR-OPS-1"),
        String::from("Ops Admin"),
        String::from("ops_admin"),
    )
}

pub fn create_test_context() -> Context {
    Context::new(create_test_actor(), "Shift handover", test_now())
}

pub fn create_test_store() -> (Store, Arc<FixedClock>) {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    let store: Store = Store::seeded(clock.clone(), StoreConfig::default(), "test-hash");
    (store, clock)
}

/// Applies a command that is expected to succeed.
pub fn apply_ok(state: &State, command: Command) -> TransitionResult {
    apply(state, command, &create_test_context()).unwrap()
}

/// Applies a command that is expected to fail with a domain error.
pub fn apply_domain_err(state: &State, command: Command) -> DomainError {
    match apply(state, command, &create_test_context()) {
        Err(CoreError::DomainViolation(err)) => err,
        other => panic!("expected a domain error, got {other:?}"),
    }
}

/// Replays fixed values. Once exhausted it answers `bound - 1`, which never
/// passes a `chance` check.
#[derive(Debug, Default)]
pub struct ScriptedDrift {
    values: VecDeque<u32>,
}

impl ScriptedDrift {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }
}

impl DriftSource for ScriptedDrift {
    fn below(&mut self, bound: u32) -> u32 {
        self.values
            .pop_front()
            .map_or(bound - 1, |v| v % bound)
    }
}
