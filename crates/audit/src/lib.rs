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
    clippy::unwrap_used,
    clippy::expect_used
)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// First sequence number handed out by a fresh log.
pub const FIRST_EVENT_SEQ: u64 = 1001;

/// The console user who performed an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The user identifier (e.g. `USR-OPS-1`).
    pub user_id: String,
    /// Display name at the time of the action.
    pub name: String,
    /// Role identifier at the time of the action.
    pub role: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(user_id: String, name: String, role: String) -> Self {
        Self {
            user_id,
            name,
            role,
        }
    }
}

/// The record an action was performed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// The kind of record (e.g. `queue_item`, `rbac_role`).
    #[serde(rename = "type")]
    pub entity_type: String,
    /// The record identifier.
    pub id: String,
}

impl EntityRef {
    /// Creates a new entity reference.
    #[must_use]
    pub fn new(entity_type: &str, id: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

/// The before and after value of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: Value,
    pub to: Value,
}

/// Field-by-field changes made by an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diff(BTreeMap<String, FieldChange>);

impl Diff {
    /// Creates an empty diff.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records a change to `field`. Values that cannot be represented as JSON
    /// are recorded as `null`.
    #[must_use]
    pub fn with<F, T>(mut self, field: &str, from: F, to: T) -> Self
    where
        F: Serialize,
        T: Serialize,
    {
        self.0.insert(
            field.to_string(),
            FieldChange {
                from: serde_json::to_value(from).unwrap_or(Value::Null),
                to: serde_json::to_value(to).unwrap_or(Value::Null),
            },
        );
        self
    }

    /// Returns the change recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.0.get(field)
    }

    /// Number of recorded fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An audit event produced by a state transition, before the log assigns
/// it an identifier.
///
/// Every successful mutation produces at least one event. Events are
/// immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the action happened.
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    /// Who performed the action.
    pub actor: Actor,
    /// The location the record belongs to, if any.
    pub location_id: Option<String>,
    /// What was changed.
    pub entity: EntityRef,
    /// The action name (e.g. `set_status`, `auto_assign`).
    pub action: String,
    /// What changed.
    pub diff: Diff,
    /// Why the actor did it.
    pub reason: String,
    /// Shared by every event of one batch operation.
    pub correlation_id: Option<String>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent` with no location and no correlation id.
    #[must_use]
    pub fn new(
        at: OffsetDateTime,
        actor: Actor,
        entity: EntityRef,
        action: &str,
        diff: Diff,
        reason: &str,
    ) -> Self {
        Self {
            at,
            actor,
            location_id: None,
            entity,
            action: action.to_string(),
            diff,
            reason: reason.to_string(),
            correlation_id: None,
        }
    }

    /// Scopes the event to a location.
    #[must_use]
    pub fn at_location(mut self, location_id: &str) -> Self {
        self.location_id = Some(location_id.to_string());
        self
    }

    /// Tags the event with a batch correlation id.
    #[must_use]
    pub fn correlated(mut self, correlation_id: &str) -> Self {
        self.correlation_id = Some(correlation_id.to_string());
        self
    }
}

/// A recorded audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Sequential identifier (e.g. `EVT-1001`).
    pub id: String,
    #[serde(flatten)]
    pub event: AuditEvent,
}

/// Read-side filter. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFilter {
    pub location_id: Option<String>,
    pub entity_type: Option<String>,
    pub correlation_id: Option<String>,
    pub action: Option<String>,
}

impl AuditFilter {
    /// Returns true if the entry satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        let event: &AuditEvent = &entry.event;
        self.location_id
            .as_ref()
            .is_none_or(|l| event.location_id.as_ref() == Some(l))
            && self
                .entity_type
                .as_ref()
                .is_none_or(|t| &event.entity.entity_type == t)
            && self
                .correlation_id
                .as_ref()
                .is_none_or(|c| event.correlation_id.as_ref() == Some(c))
            && self.action.as_ref().is_none_or(|a| &event.action == a)
    }
}

/// Append-only audit log, newest entry first.
///
/// There is no API to update or remove an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLog {
    entries: VecDeque<AuditEntry>,
    next_seq: u64,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_seq: FIRST_EVENT_SEQ,
        }
    }

    /// Records an event at the head of the log and returns its identifier.
    pub fn record(&mut self, event: AuditEvent) -> String {
        let id: String = format!("EVT-{}", self.next_seq);
        self.next_seq += 1;
        self.entries.push_front(AuditEntry {
            id: id.clone(),
            event,
        });
        id
    }

    /// Records events in order, so the last one ends up newest.
    pub fn record_all(&mut self, events: Vec<AuditEvent>) -> Vec<String> {
        events.into_iter().map(|e| self.record(e)).collect()
    }

    /// Iterates entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    /// Returns matching entries newest first.
    #[must_use]
    pub fn query(&self, filter: &AuditFilter) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&AuditEntry> {
        self.entries.front()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
