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

mod calendar;
mod checklist;
mod error;
mod finance;
mod inspector;
mod rbac;
mod types;
mod validation;
mod vehicle_master;

#[cfg(test)]
mod tests;

pub use calendar::{BusinessCalendar, DEFAULT_TIMEZONE};
pub use checklist::{
    ChecklistField, ChecklistSection, ChecklistTemplate, FieldDraft, InputType, ScoringRule,
};
pub use error::DomainError;
pub use finance::{
    COMMISSION_DEFAULT_INR, Commission, CommissionStatus, PricingDefaults, commission_amount,
};
pub use inspector::{
    EmploymentType, Inspector, InspectorStatus, LeaveRequest, LeaveStatus, OperationalState,
};
pub use rbac::{
    CrudFlags, CrudMatrix, CrudMatrixPatch, Module, Operation, Permissions, PermissionsPatch,
    Role, SUPER_ADMIN_ROLE_ID, SUPER_ADMIN_USER_ID, User, validate_identifier,
};
pub use types::{Location, Priority, QueueItem, QueueStatus, VehicleType};
pub use validation::{
    normalize_skills, parse_date, require_text, validate_inspector_fields, validate_leave_range,
    validate_location_ids,
};
pub use vehicle_master::{
    CascadeReport, Category, MAX_SLUG_LEN, Make, MappingPatch, MappingPricing, MasterItem,
    MasterKind, Model, PriceQuote, QuoteSource, Variant, VehicleMapping, VehicleMaster,
    master_item_id, slugify,
};
