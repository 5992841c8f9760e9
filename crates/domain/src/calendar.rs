// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Business-day arithmetic in the operating timezone.
//!
//! Timestamps are stored in UTC. "Today" for reporting purposes is the
//! calendar date in the business timezone, not in UTC.

use crate::error::DomainError;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use time::OffsetDateTime;

/// Default operating timezone.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// The operating timezone used for day and hour bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    tz: Tz,
}

impl BusinessCalendar {
    /// Creates a calendar from an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is unknown.
    pub fn parse(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// Returns the underlying timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    fn local(&self, at: OffsetDateTime) -> Option<DateTime<Tz>> {
        DateTime::<Utc>::from_timestamp(at.unix_timestamp(), at.nanosecond())
            .map(|utc| utc.with_timezone(&self.tz))
    }

    /// Returns the business-local calendar date of an instant.
    #[must_use]
    pub fn business_date(&self, at: OffsetDateTime) -> Option<NaiveDate> {
        self.local(at).map(|local| local.date_naive())
    }

    /// Returns true if both instants fall on the same business-local date.
    #[must_use]
    pub fn same_business_day(&self, a: OffsetDateTime, b: OffsetDateTime) -> bool {
        match (self.business_date(a), self.business_date(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns the start of the business-local hour containing an instant.
    #[must_use]
    pub fn hour_start(&self, at: OffsetDateTime) -> OffsetDateTime {
        let into_hour: i64 = self.local(at).map_or(0, |local| {
            i64::from(local.minute()) * 60 + i64::from(local.second())
        });
        at.replace_nanosecond(0).unwrap_or(at) - time::Duration::seconds(into_hour)
    }

    /// Formats the business-local hour of an instant as `HH:00`.
    #[must_use]
    pub fn hour_label(&self, at: OffsetDateTime) -> String {
        self.local(at).map_or_else(
            || String::from("--:00"),
            |local| format!("{:02}:00", local.hour()),
        )
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            tz: chrono_tz::Asia::Kolkata,
        }
    }
}
