// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commission ledger and pricing defaults.

use crate::types::QueueItem;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Inspector payout when no override is set on the queue item.
pub const COMMISSION_DEFAULT_INR: u32 = 500;

/// Approval status of a commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    /// Awaiting finance approval.
    Pending,
    /// Approved for payout.
    Approved,
}

impl CommissionStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

/// An inspector payout tied one-to-one to a paid queue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    /// Identifier (e.g. `COM-9001`).
    pub id: String,
    /// The inspector being paid.
    pub inspector_id: String,
    /// Where the inspection happened.
    pub location_id: String,
    /// The queue item this payout belongs to.
    pub pdi_id: String,
    /// When the visit was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub visit_at: OffsetDateTime,
    /// Payout amount.
    pub amount_inr: u32,
    /// Approval status.
    pub status: CommissionStatus,
    /// When the customer paid.
    #[serde(with = "time::serde::rfc3339")]
    pub payment_at: OffsetDateTime,
}

/// Global pricing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingDefaults {
    /// Price applied to newly created queue items.
    pub default_inr: u32,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self { default_inr: 500 }
    }
}

/// Computes the payout for a queue item: the override if set, else the default.
#[must_use]
pub fn commission_amount(item: &QueueItem) -> u32 {
    item.commission_override_inr
        .unwrap_or(COMMISSION_DEFAULT_INR)
}
