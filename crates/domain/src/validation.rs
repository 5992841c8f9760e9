// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::inspector::Inspector;
use crate::types::{Location, VehicleType};
use time::Date;
use time::macros::format_description;

/// Trims a required text value.
///
/// # Errors
///
/// Returns `DomainError::MissingField` if the value is blank.
pub fn require_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Validates that a leave range does not end before it starts.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if `to` is before `from`.
pub fn validate_leave_range(from: Date, to: Date) -> Result<(), DomainError> {
    if to < from {
        return Err(DomainError::InvalidDateRange { from, to });
    }
    Ok(())
}

/// Validates the contact and identity fields of an inspector.
///
/// This checks required fields only. Referential checks (locations) need
/// the surrounding state and are done by [`validate_location_ids`].
///
/// # Errors
///
/// Returns an error if a required field is blank or the utilization is
/// outside 0..=100.
pub fn validate_inspector_fields(inspector: &Inspector) -> Result<(), DomainError> {
    require_text("Inspector ID", &inspector.id)?;
    require_text("Full name", &inspector.name)?;
    require_text("Mobile number", &inspector.phone)?;
    require_text("Email", &inspector.email)?;
    if inspector.utilization_pct > 100 {
        return Err(DomainError::InvalidValue {
            field: "utilization",
            value: inspector.utilization_pct.to_string(),
        });
    }
    Ok(())
}

/// Validates that every location id refers to a known location.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for the first unknown location.
pub fn validate_location_ids(ids: &[String], locations: &[Location]) -> Result<(), DomainError> {
    for id in ids {
        if !locations.iter().any(|l| &l.id == id) {
            return Err(DomainError::NotFound {
                entity: "Location",
                id: id.clone(),
            });
        }
    }
    Ok(())
}

/// Normalizes a skill list: removes duplicates, keeps a stable order, and
/// defaults an empty list to every vehicle type.
#[must_use]
pub fn normalize_skills(skills: &[VehicleType]) -> Vec<VehicleType> {
    let normalized: Vec<VehicleType> = VehicleType::ALL
        .into_iter()
        .filter(|t| skills.contains(t))
        .collect();
    if normalized.is_empty() {
        VehicleType::ALL.to_vec()
    } else {
        normalized
    }
}
