// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inspection checklist templates and completion scoring.

use crate::error::DomainError;
use crate::types::VehicleType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How an inspector answers a checklist field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Dropdown,
    MultiSelect,
    YesNo,
    Numeric,
    Photos,
    Toggle,
    Rating,
}

impl InputType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dropdown => "dropdown",
            Self::MultiSelect => "multi_select",
            Self::YesNo => "yes_no",
            Self::Numeric => "numeric",
            Self::Photos => "photos",
            Self::Toggle => "toggle",
            Self::Rating => "rating",
        }
    }

    /// Returns true if the input is a choice among configured options.
    #[must_use]
    pub const fn needs_options(&self) -> bool {
        matches!(self, Self::Dropdown | Self::MultiSelect)
    }
}

impl FromStr for InputType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dropdown" => Ok(Self::Dropdown),
            "multi_select" => Ok(Self::MultiSelect),
            "yes_no" => Ok(Self::YesNo),
            "numeric" => Ok(Self::Numeric),
            "photos" => Ok(Self::Photos),
            "toggle" => Ok(Self::Toggle),
            "rating" => Ok(Self::Rating),
            other => Err(DomainError::InvalidValue {
                field: "input type",
                value: other.to_string(),
            }),
        }
    }
}

/// One question in a checklist section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistField {
    pub id: String,
    pub label: String,
    pub input_type: InputType,
    pub required: bool,
    /// Choices for dropdown and multi-select fields; empty otherwise.
    pub options: Vec<String>,
    /// Minimum number of photos, only meaningful for photo fields.
    pub min_photos: Option<u32>,
}

/// A titled, ordered group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub id: String,
    pub title: String,
    pub order: u32,
    pub fields: Vec<ChecklistField>,
}

/// Awards `score_pct` once at least `min_checked` items are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub id: String,
    pub min_checked: u32,
    pub score_pct: u32,
}

/// Input for creating or replacing a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDraft {
    pub label: String,
    pub input_type: InputType,
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub min_photos: Option<u32>,
}

impl FieldDraft {
    /// Validates the draft and normalizes its options.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is blank or a choice field has no
    /// options.
    pub fn into_field(self, id: String) -> Result<ChecklistField, DomainError> {
        let label: String = self.label.trim().to_string();
        if label.is_empty() {
            return Err(DomainError::MissingField {
                field: "Field label",
            });
        }
        let options: Vec<String> = if self.input_type.needs_options() {
            let cleaned: Vec<String> = self
                .options
                .iter()
                .map(|o| o.trim())
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
            if cleaned.is_empty() {
                return Err(DomainError::MissingField { field: "Options" });
            }
            cleaned
        } else {
            Vec::new()
        };
        let min_photos: Option<u32> = if self.input_type == InputType::Photos {
            self.min_photos
        } else {
            None
        };
        Ok(ChecklistField {
            id,
            label,
            input_type: self.input_type,
            required: self.required,
            options,
            min_photos,
        })
    }
}

/// The checklist used for one vehicle condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub condition: VehicleType,
    pub sections: Vec<ChecklistSection>,
    pub scoring_rules: Vec<ScoringRule>,
}

impl ChecklistTemplate {
    /// Creates an empty template.
    #[must_use]
    pub const fn new(condition: VehicleType) -> Self {
        Self {
            condition,
            sections: Vec::new(),
            scoring_rules: Vec::new(),
        }
    }

    /// Looks up a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&ChecklistSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_mut(&mut self, id: &str) -> Result<&mut ChecklistSection, DomainError> {
        self.sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Checklist section",
                id: id.to_string(),
            })
    }

    /// Total number of fields across all sections.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }

    /// Creates a section (when `section_id` is `None`) or retitles and
    /// reorders an existing one. Sections are kept sorted by `order`.
    ///
    /// Returns the section before and after the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or the section is missing.
    pub fn upsert_section(
        &mut self,
        section_id: Option<&str>,
        title: &str,
        order: u32,
        new_id: impl FnOnce() -> String,
    ) -> Result<(Option<ChecklistSection>, ChecklistSection), DomainError> {
        let title: String = title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::MissingField {
                field: "Section title",
            });
        }

        let result = match section_id {
            Some(id) => {
                let section: &mut ChecklistSection = self.section_mut(id)?;
                let before: ChecklistSection = section.clone();
                section.title = title;
                section.order = order;
                (Some(before), section.clone())
            }
            None => {
                let section = ChecklistSection {
                    id: new_id(),
                    title,
                    order,
                    fields: Vec::new(),
                };
                self.sections.push(section.clone());
                (None, section)
            }
        };
        self.sections.sort_by_key(|s| s.order);
        Ok(result)
    }

    /// Removes a section and all its fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the section does not exist.
    pub fn delete_section(&mut self, section_id: &str) -> Result<ChecklistSection, DomainError> {
        let index: usize = self
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Checklist section",
                id: section_id.to_string(),
            })?;
        Ok(self.sections.remove(index))
    }

    /// Creates or replaces a field in a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section or field is missing, or the draft is
    /// invalid.
    pub fn upsert_field(
        &mut self,
        section_id: &str,
        field_id: Option<&str>,
        draft: FieldDraft,
        new_id: impl FnOnce() -> String,
    ) -> Result<(Option<ChecklistField>, ChecklistField), DomainError> {
        let section: &mut ChecklistSection = self.section_mut(section_id)?;
        match field_id {
            Some(id) => {
                let slot: &mut ChecklistField = section
                    .fields
                    .iter_mut()
                    .find(|f| f.id == id)
                    .ok_or_else(|| DomainError::NotFound {
                        entity: "Checklist field",
                        id: id.to_string(),
                    })?;
                let field: ChecklistField = draft.into_field(id.to_string())?;
                let before: ChecklistField = std::mem::replace(slot, field.clone());
                Ok((Some(before), field))
            }
            None => {
                let field: ChecklistField = draft.into_field(new_id())?;
                section.fields.push(field.clone());
                Ok((None, field))
            }
        }
    }

    /// Removes a field from a section.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the section or field is missing.
    pub fn delete_field(
        &mut self,
        section_id: &str,
        field_id: &str,
    ) -> Result<ChecklistField, DomainError> {
        let section: &mut ChecklistSection = self.section_mut(section_id)?;
        let index: usize = section
            .fields
            .iter()
            .position(|f| f.id == field_id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Checklist field",
                id: field_id.to_string(),
            })?;
        Ok(section.fields.remove(index))
    }

    /// Creates or updates a scoring rule. Rules are kept sorted by threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if `score_pct` exceeds 100, another rule already uses
    /// the threshold, or the rule to update is missing.
    pub fn upsert_scoring_rule(
        &mut self,
        rule_id: Option<&str>,
        min_checked: u32,
        score_pct: u32,
        new_id: impl FnOnce() -> String,
    ) -> Result<(Option<ScoringRule>, ScoringRule), DomainError> {
        if score_pct > 100 {
            return Err(DomainError::InvalidValue {
                field: "score percentage",
                value: score_pct.to_string(),
            });
        }
        if self
            .scoring_rules
            .iter()
            .any(|r| r.min_checked == min_checked && Some(r.id.as_str()) != rule_id)
        {
            return Err(DomainError::DuplicateScoringThreshold { min_checked });
        }

        let result = match rule_id {
            Some(id) => {
                let rule: &mut ScoringRule = self
                    .scoring_rules
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| DomainError::NotFound {
                        entity: "Scoring rule",
                        id: id.to_string(),
                    })?;
                let before: ScoringRule = rule.clone();
                rule.min_checked = min_checked;
                rule.score_pct = score_pct;
                (Some(before), rule.clone())
            }
            None => {
                let rule = ScoringRule {
                    id: new_id(),
                    min_checked,
                    score_pct,
                };
                self.scoring_rules.push(rule.clone());
                (None, rule)
            }
        };
        self.scoring_rules.sort_by_key(|r| r.min_checked);
        Ok(result)
    }

    /// Removes a scoring rule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the rule does not exist.
    pub fn delete_scoring_rule(&mut self, rule_id: &str) -> Result<ScoringRule, DomainError> {
        let index: usize = self
            .scoring_rules
            .iter()
            .position(|r| r.id == rule_id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Scoring rule",
                id: rule_id.to_string(),
            })?;
        Ok(self.scoring_rules.remove(index))
    }

    /// Converts a count of checked items into a score percentage.
    ///
    /// Rules are points on a curve starting at (0, 0). Counts between two
    /// thresholds interpolate linearly; counts at or beyond the highest
    /// threshold get its score. With no rules the score is 0.
    #[must_use]
    pub fn score(&self, checked: u32) -> u32 {
        let mut points: Vec<(u32, u32)> = vec![(0, 0)];
        for rule in &self.scoring_rules {
            if rule.min_checked == 0 {
                points[0] = (0, rule.score_pct);
            } else {
                points.push((rule.min_checked, rule.score_pct));
            }
        }
        points.sort_by_key(|p| p.0);

        let mut lower: (u32, u32) = points[0];
        for &upper in &points[1..] {
            if checked < upper.0 {
                let span: u64 = u64::from(upper.0 - lower.0);
                let progress: u64 = u64::from(checked - lower.0);
                let (lo, hi) = (u64::from(lower.1), u64::from(upper.1));
                // Round half up in integer arithmetic.
                let scaled: u64 = if hi >= lo {
                    lo * span + (hi - lo) * progress
                } else {
                    lo * span - (lo - hi) * progress
                };
                let rounded: u64 = (scaled * 2 + span) / (span * 2);
                return u32::try_from(rounded).unwrap_or(u32::MAX);
            }
            lower = upper;
        }
        lower.1
    }
}
