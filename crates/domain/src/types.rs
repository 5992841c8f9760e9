// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// An inspection site with its service-level target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier (e.g. `LOC-BLR-01`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Maximum acceptable wait for a pending item, in minutes.
    pub sla_minutes: u32,
    /// Nominal throughput of the site.
    pub capacity_per_hour: u32,
}

impl Location {
    /// Creates a new `Location`.
    #[must_use]
    pub fn new(id: &str, name: &str, sla_minutes: u32, capacity_per_hour: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sla_minutes,
            capacity_per_hour,
        }
    }
}

/// Vehicle condition, used both for queue items and inspector skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// A brand-new vehicle.
    New,
    /// A used vehicle.
    PreOwned,
}

impl VehicleType {
    /// All vehicle types, in display order.
    pub const ALL: [Self; 2] = [Self::New, Self::PreOwned];

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::PreOwned => "pre_owned",
        }
    }
}

impl FromStr for VehicleType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(Self::New),
            "pre_owned" => Ok(Self::PreOwned),
            other => Err(DomainError::InvalidValue {
                field: "vehicle type",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue priority. `P0` is the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Highest priority.
    P0,
    /// High priority.
    P1,
    /// Normal priority.
    P2,
    /// Lowest priority.
    P3,
}

impl Priority {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }

    /// Returns the scheduling rank, lower is served first.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::P0 => 0,
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "P0" => Ok(Self::P0),
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            "P3" => Ok(Self::P3),
            other => Err(DomainError::InvalidValue {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a queue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Waiting for an inspector.
    Pending,
    /// An inspector is on the job.
    InProgress,
    /// Parked by an operator.
    Postponed,
    /// Paid and finished.
    Closed,
}

impl QueueStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Postponed => "postponed",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for QueueStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "postponed" => Ok(Self::Postponed),
            "closed" => Ok(Self::Closed),
            other => Err(DomainError::InvalidValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inspection job in the operations queue.
///
/// Invariant: `status == Closed` implies `payment_at.is_some()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Job identifier (e.g. `PDI-24001`).
    pub id: String,
    /// When the job entered the queue.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The site handling the job.
    pub location_id: String,
    /// New or pre-owned.
    pub vehicle_type: VehicleType,
    /// Customer name.
    pub customer_name: String,
    /// Customer contact number.
    pub customer_phone: String,
    /// Registration number.
    pub vehicle_number: String,
    /// Free-text vehicle description (e.g. "Honda City").
    pub vehicle_summary: String,
    /// Scheduling priority.
    pub priority: Priority,
    /// Current lifecycle status.
    pub status: QueueStatus,
    /// Inspector currently on the job.
    pub assigned_inspector_id: Option<String>,
    /// Minutes until the customer arrives.
    pub customer_eta_minutes: u32,
    /// Expected inspection duration.
    pub expected_duration_minutes: u32,
    /// Price charged to the customer.
    pub price_inr: u32,
    /// When payment was recorded. Never overwritten once set.
    #[serde(with = "time::serde::rfc3339::option")]
    pub payment_at: Option<OffsetDateTime>,
    /// When the job was closed.
    #[serde(with = "time::serde::rfc3339::option")]
    pub closed_at: Option<OffsetDateTime>,
    /// Commission amount that replaces the default payout.
    pub commission_override_inr: Option<u32>,
}

impl QueueItem {
    /// Returns the age of the item in whole minutes, never negative.
    #[must_use]
    pub fn age_minutes(&self, now: OffsetDateTime) -> i64 {
        (now - self.created_at).whole_minutes().max(0)
    }

    /// Returns true if the item is waiting for an inspector.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == QueueStatus::Pending
    }
}
