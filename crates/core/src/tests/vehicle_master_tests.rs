// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{apply_domain_err, apply_ok, create_test_state};
use crate::{Command, Outcome, State, TransitionResult};
use pdi_ops_audit::AuditEvent;
use pdi_ops_domain::{
    DomainError, MappingPatch, MappingPricing, MasterKind, VehicleMapping, VehicleType,
};
use serde_json::json;

fn upsert(
    condition: VehicleType,
    make_id: &str,
    model_id: &str,
    variant_id: &str,
    category_id: &str,
) -> Command {
    Command::UpsertVehicleMapping {
        condition,
        make_id: make_id.to_string(),
        model_id: model_id.to_string(),
        variant_id: variant_id.to_string(),
        category_id: category_id.to_string(),
    }
}

#[test]
fn test_create_make_derives_id_from_name() {
    let state: State = create_test_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::CreateVehicleMasterItem {
            kind: MasterKind::Make,
            name: String::from(" Mini  Cooper "),
            parent_id: None,
        },
    );

    assert_eq!(
        result.outcome,
        Outcome::Created {
            id: String::from("MAKE-MINI-COOPER")
        }
    );
    assert_eq!(result.new_state.vehicle_master.makes[0].name, "Mini  Cooper");
    let event: &AuditEvent = &result.audit_events[0];
    assert_eq!(event.entity.entity_type, "vehicle_master");
    assert_eq!(event.action, "create_vehicle_master_item");
    assert_eq!(event.diff.get("kind").unwrap().to, json!("make"));
}

#[test]
fn test_create_variant_requires_model() {
    let state: State = create_test_state();

    let err: DomainError = apply_domain_err(
        &state,
        Command::CreateVehicleMasterItem {
            kind: MasterKind::Variant,
            name: String::from("Sigma"),
            parent_id: None,
        },
    );

    assert_eq!(err, DomainError::MissingField { field: "Model" });
}

#[test]
fn test_create_item_rejects_existing_id() {
    let state: State = create_test_state();

    let err: DomainError = apply_domain_err(
        &state,
        Command::CreateVehicleMasterItem {
            kind: MasterKind::Category,
            name: String::from("suv"),
            parent_id: None,
        },
    );

    assert_eq!(
        err,
        DomainError::DuplicateId {
            entity: "Category",
            id: String::from("CAT-SUV"),
        }
    );
}

#[test]
fn test_rename_item_keeps_id() {
    let state: State = create_test_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::UpdateVehicleMasterItem {
            kind: MasterKind::Model,
            id: String::from("MODEL-SCORPIO"),
            name: Some(String::from("Scorpio Classic")),
            parent_id: None,
        },
    );

    let model = result.new_state.vehicle_master.model("MODEL-SCORPIO").unwrap();
    assert_eq!(model.name, "Scorpio Classic");
    assert_eq!(model.make_id, "MAKE-MAHINDRA");
    assert_eq!(result.outcome, Outcome::Updated);
}

#[test]
fn test_delete_make_cascades_and_audits_what_was_removed() {
    let state: State = create_test_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::DeleteVehicleMasterItem {
            kind: MasterKind::Make,
            id: String::from("MAKE-MARUTI"),
        },
    );

    let master = &result.new_state.vehicle_master;
    assert!(master.model("MODEL-SWIFT").is_none());
    assert!(master.variant("VAR-DELTA").is_none());
    assert!(master.mapping("MAP-0001").is_none());
    assert!(!master.mapping_pricing.contains_key("MAP-0001"));

    let cascade = &result.audit_events[0].diff.get("cascade").unwrap().from;
    assert_eq!(
        cascade["models"],
        json!(["MODEL-SWIFT", "MODEL-BALENO", "MODEL-BREZZA"])
    );
    assert_eq!(cascade["mappings"], json!(["MAP-0001"]));
}

#[test]
fn test_delete_unused_variant_has_no_cascade() {
    let state: State = create_test_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::DeleteVehicleMasterItem {
            kind: MasterKind::Variant,
            id: String::from("VAR-LXI"),
        },
    );

    assert!(result.audit_events[0].diff.get("cascade").is_none());
}

#[test]
fn test_upsert_new_vehicle_creates_mapping() {
    let state: State = create_test_state();

    let result: TransitionResult = apply_ok(
        &state,
        upsert(
            VehicleType::PreOwned,
            "MAKE-MARUTI",
            "MODEL-SWIFT",
            "VAR-ZXI",
            "CAT-HATCH",
        ),
    );

    assert_eq!(
        result.outcome,
        Outcome::Created {
            id: String::from("MAP-0006")
        }
    );
    let created: &VehicleMapping = &result.new_state.vehicle_master.mappings[0];
    assert_eq!(created.id, "MAP-0006");
    assert_eq!(created.condition, VehicleType::PreOwned);
    assert_eq!(result.audit_events[0].action, "create_vehicle_mapping");
}

#[test]
fn test_upsert_known_vehicle_recategorizes_it() {
    let state: State = create_test_state();

    let result: TransitionResult = apply_ok(
        &state,
        upsert(
            VehicleType::New,
            "MAKE-MARUTI",
            "MODEL-SWIFT",
            "VAR-VXI",
            "CAT-COMPACT",
        ),
    );

    assert_eq!(result.outcome, Outcome::Updated);
    assert_eq!(
        result.new_state.vehicle_master.mappings.len(),
        state.vehicle_master.mappings.len()
    );
    assert_eq!(
        result
            .new_state
            .vehicle_master
            .mapping("MAP-0001")
            .unwrap()
            .category_id,
        "CAT-COMPACT"
    );
    let event: &AuditEvent = &result.audit_events[0];
    assert_eq!(event.action, "update_vehicle_mapping");
    assert_eq!(event.diff.get("category_id").unwrap().from, json!("CAT-HATCH"));
}

#[test]
fn test_upsert_rejects_model_from_another_make() {
    let state: State = create_test_state();

    let err: DomainError = apply_domain_err(
        &state,
        upsert(
            VehicleType::New,
            "MAKE-HONDA",
            "MODEL-SWIFT",
            "VAR-VXI",
            "CAT-HATCH",
        ),
    );

    assert!(matches!(
        err,
        DomainError::HierarchyMismatch {
            child: "Model",
            ..
        }
    ));
}

#[test]
fn test_update_mapping_rejects_clash_with_other_mapping() {
    let state: State = create_test_state();
    let patch = MappingPatch {
        make_id: Some(String::from("MAKE-MARUTI")),
        model_id: Some(String::from("MODEL-SWIFT")),
        variant_id: Some(String::from("VAR-VXI")),
        ..MappingPatch::default()
    };

    let err: DomainError = apply_domain_err(
        &state,
        Command::UpdateVehicleMapping {
            mapping_id: String::from("MAP-0002"),
            patch,
        },
    );

    assert_eq!(
        err,
        DomainError::DuplicateId {
            entity: "Mapping",
            id: String::from("MAP-0001"),
        }
    );
}

#[test]
fn test_delete_mapping_removes_pricing() {
    let state: State = create_test_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::DeleteVehicleMapping {
            mapping_id: String::from("MAP-0003"),
        },
    );

    assert!(result.new_state.vehicle_master.mapping("MAP-0003").is_none());
    assert!(
        !result
            .new_state
            .vehicle_master
            .mapping_pricing
            .contains_key("MAP-0003")
    );
}

#[test]
fn test_mapping_pricing_records_previous_value() {
    let state: State = create_test_state();
    let pricing = MappingPricing {
        base_inr: 700,
        distant_after_km: 15,
        distant_extra_inr: 120,
    };

    let result: TransitionResult = apply_ok(
        &state,
        Command::SetMappingPricing {
            mapping_id: String::from("MAP-0004"),
            pricing,
        },
    );

    assert_eq!(
        result.new_state.vehicle_master.mapping_pricing["MAP-0004"],
        pricing
    );
    let change = result.audit_events[0].diff.get("pricing").unwrap();
    assert_eq!(change.from["base_inr"], json!(800));
    assert_eq!(change.to["distant_extra_inr"], json!(120));
}

#[test]
fn test_category_pricing_requires_known_category() {
    let state: State = create_test_state();

    let err: DomainError = apply_domain_err(
        &state,
        Command::SetCategoryPricing {
            category_id: String::from("CAT-VAN"),
            price_inr: 700,
        },
    );

    assert!(matches!(
        err,
        DomainError::NotFound {
            entity: "Category",
            ..
        }
    ));
}

#[test]
fn test_category_price_feeds_quote_without_mapping_pricing() {
    let state: State = create_test_state();
    let without_pricing: TransitionResult = apply_ok(
        &state,
        Command::DeleteVehicleMapping {
            mapping_id: String::from("MAP-0002"),
        },
    );
    let recreated: TransitionResult = apply_ok(
        &without_pricing.new_state,
        upsert(
            VehicleType::New,
            "MAKE-HONDA",
            "MODEL-CITY",
            "VAR-VX",
            "CAT-SEDAN",
        ),
    );
    let repriced: TransitionResult = apply_ok(
        &recreated.new_state,
        Command::SetCategoryPricing {
            category_id: String::from("CAT-SEDAN"),
            price_inr: 675,
        },
    );

    let quote = repriced
        .new_state
        .vehicle_master
        .quote(VehicleType::New, "MAKE-HONDA", "MODEL-CITY", "VAR-VX", 40, 500)
        .unwrap();

    assert_eq!(quote.total_inr, 675);
    assert_eq!(quote.distance_extra_inr, 0);
}
