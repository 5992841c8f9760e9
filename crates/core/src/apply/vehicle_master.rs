// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{Context, Transition};
use crate::error::CoreError;
use crate::state::Outcome;
use pdi_ops_audit::Diff;
use pdi_ops_domain::{
    CascadeReport, DomainError, MappingPatch, MappingPricing, MasterItem, MasterKind,
    VehicleMapping, VehicleType,
};

pub(super) fn create_item(
    tx: &mut Transition,
    kind: MasterKind,
    name: &str,
    parent_id: Option<&str>,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let item: MasterItem = tx.state.vehicle_master.create_item(kind, name, parent_id)?;
    let id: String = item.id().to_string();
    let diff: Diff = Diff::new()
        .with("kind", None::<MasterKind>, kind)
        .with("created", None::<MasterItem>, &item);
    tx.record(ctx.event("vehicle_master", &id, "create_vehicle_master_item", diff));
    Ok(Outcome::Created { id })
}

pub(super) fn update_item(
    tx: &mut Transition,
    kind: MasterKind,
    id: &str,
    name: Option<&str>,
    parent_id: Option<&str>,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let before: Option<MasterItem> = tx.state.vehicle_master.item(kind, id);
    let after: MasterItem = tx
        .state
        .vehicle_master
        .update_item(kind, id, name, parent_id)?;
    let diff: Diff = Diff::new()
        .with("kind", kind, kind)
        .with("item", &before, &after);
    tx.record(ctx.event("vehicle_master", id, "update_vehicle_master_item", diff));
    Ok(Outcome::Updated)
}

pub(super) fn delete_item(
    tx: &mut Transition,
    kind: MasterKind,
    id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let (removed, cascade): (MasterItem, CascadeReport) =
        tx.state.vehicle_master.delete_item(kind, id)?;
    let mut diff: Diff = Diff::new()
        .with("kind", kind, None::<MasterKind>)
        .with("deleted", &removed, None::<MasterItem>);
    if cascade != CascadeReport::default() {
        diff = diff.with("cascade", &cascade, None::<CascadeReport>);
    }
    tx.record(ctx.event("vehicle_master", id, "delete_vehicle_master_item", diff));
    Ok(Outcome::Updated)
}

pub(super) fn upsert_mapping(
    tx: &mut Transition,
    condition: VehicleType,
    make_id: &str,
    model_id: &str,
    variant_id: &str,
    category_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let existing: Option<VehicleMapping> = tx
        .state
        .vehicle_master
        .find_mapping(condition, make_id, model_id, variant_id)
        .cloned();

    if let Some(existing) = existing {
        let patch = MappingPatch {
            category_id: Some(category_id.to_string()),
            ..MappingPatch::default()
        };
        let (before, after) = tx.state.vehicle_master.update_mapping(&existing.id, patch)?;
        tx.record(ctx.event(
            "vehicle_mapping",
            &after.id,
            "update_vehicle_mapping",
            Diff::new().with("category_id", &before.category_id, &after.category_id),
        ));
        return Ok(Outcome::Updated);
    }

    let mapping = VehicleMapping {
        id: tx.state.next_mapping_id(),
        condition,
        make_id: make_id.trim().to_string(),
        model_id: model_id.trim().to_string(),
        variant_id: variant_id.trim().to_string(),
        category_id: category_id.trim().to_string(),
    };
    tx.state.vehicle_master.validate_mapping(&mapping)?;
    let id: String = mapping.id.clone();
    let diff: Diff = Diff::new().with("created", None::<VehicleMapping>, &mapping);
    tx.state.vehicle_master.mappings.insert(0, mapping);
    tx.record(ctx.event("vehicle_mapping", &id, "create_vehicle_mapping", diff));
    Ok(Outcome::Created { id })
}

pub(super) fn update_mapping(
    tx: &mut Transition,
    mapping_id: &str,
    patch: MappingPatch,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let (before, after) = tx.state.vehicle_master.update_mapping(mapping_id, patch)?;
    let clash: Option<&VehicleMapping> = tx.state.vehicle_master.mappings.iter().find(|m| {
        m.id != after.id
            && m.matches(after.condition, &after.make_id, &after.model_id, &after.variant_id)
    });
    if let Some(other) = clash {
        return Err(DomainError::DuplicateId {
            entity: "Mapping",
            id: other.id.clone(),
        }
        .into());
    }

    tx.record(ctx.event(
        "vehicle_mapping",
        mapping_id,
        "update_vehicle_mapping",
        Diff::new().with("mapping", &before, &after),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn delete_mapping(
    tx: &mut Transition,
    mapping_id: &str,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let removed: VehicleMapping = tx.state.vehicle_master.delete_mapping(mapping_id)?;
    tx.record(ctx.event(
        "vehicle_mapping",
        mapping_id,
        "delete_vehicle_mapping",
        Diff::new().with("deleted", &removed, None::<VehicleMapping>),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn set_mapping_pricing(
    tx: &mut Transition,
    mapping_id: &str,
    pricing: MappingPricing,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let before: Option<MappingPricing> = tx
        .state
        .vehicle_master
        .set_mapping_pricing(mapping_id, pricing)?;
    tx.record(ctx.event(
        "mapping_pricing",
        mapping_id,
        "set_mapping_pricing",
        Diff::new().with("pricing", before, pricing),
    ));
    Ok(Outcome::Updated)
}

pub(super) fn set_category_pricing(
    tx: &mut Transition,
    category_id: &str,
    price_inr: u32,
    ctx: &Context,
) -> Result<Outcome, CoreError> {
    let before: Option<u32> = tx
        .state
        .vehicle_master
        .set_category_pricing(category_id, price_inr)?;
    tx.record(ctx.event(
        "category_pricing",
        category_id,
        "set_category_pricing",
        Diff::new().with("price_inr", before, price_inr),
    ));
    Ok(Outcome::Updated)
}
