// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::inspector::LeaveStatus;

/// Errors that can occur during domain validation.
///
/// Every variant is raised before any mutation is applied, so a caller
/// receiving one of these can rely on the store being unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was empty or absent.
    MissingField {
        /// The human-readable field name.
        field: &'static str,
    },
    /// A field carried a value outside its allowed set or range.
    InvalidValue {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// An identifier is already in use.
    DuplicateId {
        /// The kind of entity.
        entity: &'static str,
        /// The duplicate identifier.
        id: String,
    },
    /// A name is already in use (case-insensitive).
    DuplicateName {
        /// The kind of entity.
        entity: &'static str,
        /// The duplicate name.
        name: String,
    },
    /// A referenced entity does not exist.
    NotFound {
        /// The kind of entity.
        entity: &'static str,
        /// The identifier that could not be resolved.
        id: String,
    },
    /// A child entity does not belong to the parent it was paired with.
    HierarchyMismatch {
        /// The child kind (e.g. "Model").
        child: &'static str,
        /// The child identifier.
        child_id: String,
        /// The parent kind (e.g. "Make").
        parent: &'static str,
        /// The parent identifier supplied by the caller.
        parent_id: String,
    },
    /// A queue item cannot be closed before payment is recorded.
    PaymentRequiredBeforeClose {
        /// The queue item identifier.
        pdi_id: String,
    },
    /// Payment cannot be recorded while no inspector is assigned.
    InspectorRequiredForPayment {
        /// The queue item identifier.
        pdi_id: String,
    },
    /// Only pending leave requests can be decided.
    LeaveRequestNotPending {
        /// The leave request identifier.
        request_id: String,
        /// The current status.
        status: LeaveStatus,
    },
    /// A leave range ends before it starts.
    InvalidDateRange {
        /// The first day of leave.
        from: time::Date,
        /// The last day of leave.
        to: time::Date,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// The built-in super admin role cannot be removed.
    ProtectedRole {
        /// The role identifier.
        role_id: String,
    },
    /// The built-in super admin user cannot be removed.
    ProtectedUser {
        /// The user identifier.
        user_id: String,
    },
    /// A role is still assigned to one or more users.
    RoleInUse {
        /// The role identifier.
        role_id: String,
        /// How many users still reference it.
        user_count: usize,
    },
    /// Two scoring rules cannot share a threshold.
    DuplicateScoringThreshold {
        /// The repeated threshold.
        min_checked: u32,
    },
    /// The configured timezone name is unknown.
    InvalidTimezone(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::InvalidValue { field, value } => {
                write!(f, "Invalid {field}: '{value}'")
            }
            Self::DuplicateId { entity, id } => {
                write!(f, "{entity} ID '{id}' already exists")
            }
            Self::DuplicateName { entity, name } => {
                write!(f, "{entity} named '{name}' already exists")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} '{id}' not found"),
            Self::HierarchyMismatch {
                child,
                child_id,
                parent,
                parent_id,
            } => {
                write!(
                    f,
                    "{child} '{child_id}' does not belong to {parent} '{parent_id}'"
                )
            }
            Self::PaymentRequiredBeforeClose { pdi_id } => {
                write!(f, "Payment required before closing queue item '{pdi_id}'")
            }
            Self::InspectorRequiredForPayment { pdi_id } => {
                write!(
                    f,
                    "Assign an inspector to queue item '{pdi_id}' before recording payment"
                )
            }
            Self::LeaveRequestNotPending { request_id, status } => {
                write!(
                    f,
                    "Leave request '{request_id}' is {status}; only pending requests can be decided"
                )
            }
            Self::InvalidDateRange { from, to } => {
                write!(f, "Leave range is invalid: {to} is before {from}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::ProtectedRole { role_id } => {
                write!(f, "Role '{role_id}' is built in and cannot be deleted")
            }
            Self::ProtectedUser { user_id } => {
                write!(f, "User '{user_id}' is built in and cannot be deleted")
            }
            Self::RoleInUse {
                role_id,
                user_count,
            } => {
                write!(
                    f,
                    "Role '{role_id}' is assigned to {user_count} user(s); reassign them before deleting"
                )
            }
            Self::DuplicateScoringThreshold { min_checked } => {
                write!(
                    f,
                    "A scoring rule for {min_checked} checked item(s) already exists"
                )
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
        }
    }
}

impl std::error::Error for DomainError {}
