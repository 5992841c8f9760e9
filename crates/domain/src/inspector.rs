// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inspector roster and leave request types.

use crate::error::DomainError;
use crate::types::VehicleType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// How an inspector is engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Salaried employee.
    FullTime,
    /// Fixed-term contractor.
    Contract,
    /// Paid per inspection.
    Freelancer,
}

impl EmploymentType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::Contract => "contract",
            Self::Freelancer => "freelancer",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full_time" => Ok(Self::FullTime),
            "contract" => Ok(Self::Contract),
            "freelancer" => Ok(Self::Freelancer),
            "" => Err(DomainError::MissingField {
                field: "Employment type",
            }),
            other => Err(DomainError::InvalidValue {
                field: "employment type",
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle status of an inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectorStatus {
    /// Available for work.
    Active,
    /// Not currently working.
    Inactive,
    /// Barred from work pending review.
    Suspended,
}

impl InspectorStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl FromStr for InspectorStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            other => Err(DomainError::InvalidValue {
                field: "inspector status",
                value: other.to_string(),
            }),
        }
    }
}

/// What an inspector is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalState {
    /// Waiting for a job.
    Idle,
    /// On a job.
    Busy,
}

impl OperationalState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
        }
    }

    /// Returns the opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Idle => Self::Busy,
            Self::Busy => Self::Idle,
        }
    }
}

/// A field inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspector {
    /// Identifier (e.g. `INSP-001`).
    pub id: String,
    /// Full name.
    pub name: String,
    /// Mobile number.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// Optional profile photo.
    pub profile_photo_url: String,
    /// Date of joining.
    pub join_date: Date,
    /// Engagement model.
    pub employment_type: EmploymentType,
    /// Lifecycle status; drives [`Inspector::is_active`].
    pub status: InspectorStatus,
    /// Sites this inspector services.
    pub location_ids: Vec<String>,
    /// Vehicle types this inspector is qualified for.
    pub skills: Vec<VehicleType>,
    /// Rolling utilization, 0 to 100.
    pub utilization_pct: u8,
    /// Idle or busy.
    pub state: OperationalState,
    /// When `state` last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub last_state_change_at: OffsetDateTime,
}

impl Inspector {
    /// Returns true when the lifecycle status is `active`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == InspectorStatus::Active
    }

    /// Returns true if the inspector services the given location.
    #[must_use]
    pub fn services(&self, location_id: &str) -> bool {
        self.location_ids.iter().any(|l| l == location_id)
    }

    /// Returns true if the inspector is qualified for the vehicle type.
    #[must_use]
    pub fn has_skill(&self, vehicle_type: VehicleType) -> bool {
        self.skills.contains(&vehicle_type)
    }

    /// Returns true if the inspector can take a new job right now.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.is_active() && self.state == OperationalState::Idle
    }

    /// Minutes spent in the current state, never negative.
    #[must_use]
    pub fn minutes_in_state(&self, now: OffsetDateTime) -> i64 {
        (now - self.last_state_change_at).whole_minutes().max(0)
    }

    /// Moves the inspector to a new operational state.
    pub fn set_state(&mut self, state: OperationalState, now: OffsetDateTime) {
        self.state = state;
        self.last_state_change_at = now;
    }
}

/// Decision status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved (terminal).
    Approved,
    /// Rejected (terminal).
    Rejected,
}

impl LeaveStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time off requested by an inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Identifier (e.g. `LVR-0001`).
    pub id: String,
    /// The requesting inspector.
    pub inspector_id: String,
    /// First day of leave.
    pub from_date: Date,
    /// Last day of leave (inclusive).
    pub to_date: Date,
    /// Why the inspector needs leave.
    pub reason: String,
    /// Decision status.
    pub status: LeaveStatus,
    /// When the request was submitted.
    #[serde(with = "time::serde::rfc3339")]
    pub requested_at: OffsetDateTime,
    /// When the request was decided.
    #[serde(with = "time::serde::rfc3339::option")]
    pub decided_at: Option<OffsetDateTime>,
    /// Why the request was rejected.
    pub rejection_reason: Option<String>,
}

impl LeaveRequest {
    /// Ensures the request can still be decided.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LeaveRequestNotPending` for terminal requests.
    pub fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::LeaveRequestNotPending {
                request_id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }

    /// Approves the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is not pending.
    pub fn approve(&mut self, now: OffsetDateTime) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = LeaveStatus::Approved;
        self.decided_at = Some(now);
        self.rejection_reason = None;
        Ok(())
    }

    /// Rejects the request with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is not pending or the reason is blank.
    pub fn reject(&mut self, reason: &str, now: OffsetDateTime) -> Result<(), DomainError> {
        self.ensure_pending()?;
        let reason: &str = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::MissingField {
                field: "Rejection reason",
            });
        }
        self.status = LeaveStatus::Rejected;
        self.decided_at = Some(now);
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    /// Number of calendar days covered, inclusive.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.to_date - self.from_date).whole_days() + 1
    }
}
