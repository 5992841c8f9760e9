// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod assignment;
mod clock;
mod command;
mod drift;
mod error;
pub mod metrics;
mod seed;
mod state;
mod store;

#[cfg(test)]
mod tests;

pub use apply::{Context, apply};
pub use assignment::{Assignment, assignment_order, auto_assign, is_eligible, pick_inspector};
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{Command, InspectorDraft, InspectorPatch, QueueIntake, UserDraft, UserPatch};
pub use drift::{DriftReport, DriftSource, RandomDrift, apply_drift};
pub use error::CoreError;
pub use metrics::{Alert, AlertType, Dashboard, Kpis, QueueLoad, Severity, TrendPoint, VehicleRatio};
pub use seed::{DEMO_PASSWORD, demo_state};
pub use state::{AccessControl, Outcome, Sequences, State, TransitionResult};
pub use store::{Store, StoreConfig};
