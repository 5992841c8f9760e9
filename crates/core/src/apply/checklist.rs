// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{Context, Transition};
use crate::error::CoreError;
use crate::state::Outcome;
use pdi_ops_audit::Diff;
use pdi_ops_domain::{ChecklistField, ChecklistSection, FieldDraft, ScoringRule, VehicleType};

/// Mints an id only when a record is being created.
fn mint(tx: &mut Transition, existing: Option<&str>, prefix: &str) -> String {
    if existing.is_some() {
        String::new()
    } else {
        tx.state.next_checklist_id(prefix)
    }
}

fn created_or_updated<T>(before: Option<&T>, id: String) -> Outcome {
    match before {
        Some(_) => Outcome::Updated,
        None => Outcome::Created { id },
    }
}

pub(super) fn upsert_section(
    tx: &mut Transition,
    condition: VehicleType,
    section_id: Option<&str>,
    title: &str,
    order: u32,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let minted: String = mint(tx, section_id, "SEC");
    let (before, after): (Option<ChecklistSection>, ChecklistSection) = tx
        .state
        .checklist_mut(condition)
        .upsert_section(section_id, title, order, || minted)?;

    let diff: Diff = Diff::new()
        .with("condition", condition, condition)
        .with("title", before.as_ref().map(|s| &s.title), &after.title)
        .with("order", before.as_ref().map(|s| s.order), after.order);
    tx.record(ctx.event("checklist_section", &after.id, "upsert_checklist_section", diff));
    Ok(created_or_updated(before.as_ref(), after.id))
}

pub(super) fn delete_section(
    tx: &mut Transition,
    condition: VehicleType,
    section_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let removed: ChecklistSection = tx.state.checklist_mut(condition).delete_section(section_id)?;
    tx.record(ctx.event(
        "checklist_section",
        section_id,
        "delete_checklist_section",
        Diff::new()
            .with("condition", condition, None::<VehicleType>)
            .with("deleted", &removed, None::<ChecklistSection>),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn upsert_field(
    tx: &mut Transition,
    condition: VehicleType,
    section_id: &str,
    field_id: Option<&str>,
    draft: FieldDraft,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let minted: String = mint(tx, field_id, "FLD");
    let (before, after): (Option<ChecklistField>, ChecklistField) = tx
        .state
        .checklist_mut(condition)
        .upsert_field(section_id, field_id, draft, || minted)?;

    tx.record(ctx.event(
        "checklist_field",
        &after.id,
        "upsert_checklist_field",
        Diff::new()
            .with("section_id", section_id, section_id)
            .with("field", &before, &after),
    ));
    Ok(created_or_updated(before.as_ref(), after.id))
}

pub(super) fn delete_field(
    tx: &mut Transition,
    condition: VehicleType,
    section_id: &str,
    field_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let removed: ChecklistField = tx
        .state
        .checklist_mut(condition)
        .delete_field(section_id, field_id)?;
    tx.record(ctx.event(
        "checklist_field",
        field_id,
        "delete_checklist_field",
        Diff::new().with("deleted", &removed, None::<ChecklistField>),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn upsert_rule(
    tx: &mut Transition,
    condition: VehicleType,
    rule_id: Option<&str>,
    min_checked: u32,
    score_pct: u32,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let minted: String = mint(tx, rule_id, "RULE");
    let (before, after): (Option<ScoringRule>, ScoringRule) = tx
        .state
        .checklist_mut(condition)
        .upsert_scoring_rule(rule_id, min_checked, score_pct, || minted)?;

    let diff: Diff = Diff::new()
        .with("min_checked", before.as_ref().map(|r| r.min_checked), after.min_checked)
        .with("score_pct", before.as_ref().map(|r| r.score_pct), after.score_pct);
    tx.record(ctx.event("scoring_rule", &after.id, "upsert_scoring_rule", diff));
    Ok(created_or_updated(before.as_ref(), after.id))
}

pub(super) fn delete_rule(
    tx: &mut Transition,
    condition: VehicleType,
    rule_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let removed: ScoringRule = tx
        .state
        .checklist_mut(condition)
        .delete_scoring_rule(rule_id)?;
    tx.record(ctx.event(
        "scoring_rule",
        rule_id,
        "delete_scoring_rule",
        Diff::new().with("deleted", &removed, None::<ScoringRule>),
    ));
    Ok(Outcome::Updated)
}
