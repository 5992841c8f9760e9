// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Demo data.
//!
//! Three locations, five inspectors, five queued jobs, the role catalogue
//! and a small vehicle taxonomy. Timestamps are relative to the instant the
//! state is built so the dashboard looks alive straight away.

use crate::state::{AccessControl, State};
use pdi_ops_audit::{Actor, AuditEvent, Diff, EntityRef};
use pdi_ops_domain::{
    Category, ChecklistField, ChecklistSection, ChecklistTemplate, Commission, CommissionStatus,
    CrudFlags, CrudMatrix, EmploymentType, InputType, Inspector, InspectorStatus, LeaveRequest,
    LeaveStatus, Location, Make, MappingPricing, Model, OperationalState, Permissions, Priority,
    QueueItem, QueueStatus, Role, SUPER_ADMIN_ROLE_ID, SUPER_ADMIN_USER_ID, ScoringRule, User,
    Variant, VehicleMapping, VehicleMaster, VehicleType,
};
use std::collections::BTreeMap;
use time::macros::date;
use time::{Date, Duration, OffsetDateTime};

/// Password every demo account starts with.
pub const DEMO_PASSWORD: &str = "admin123";

fn minutes_ago(now: OffsetDateTime, minutes: i64) -> OffsetDateTime {
    now - Duration::minutes(minutes)
}

fn locations() -> Vec<Location> {
    vec![
        Location::new("LOC-BLR-01", "Bengaluru - HSR", 45, 18),
        Location::new("LOC-HYD-01", "Hyderabad - Gachibowli", 50, 14),
        Location::new("LOC-PUN-01", "Pune - Hinjewadi", 55, 12),
    ]
}

const fn flags(managed: bool) -> CrudFlags {
    if managed {
        CrudFlags::NO_DELETE
    } else {
        CrudFlags::READ
    }
}

/// A staff role: manages the given modules without delete rights.
const fn managing(queue: bool, inspectors: bool, pricing: bool) -> Permissions {
    Permissions {
        view: true,
        manage_queue: queue,
        manage_inspectors: inspectors,
        manage_pricing: pricing,
        view_audit: true,
        manage_access: false,
        crud: CrudMatrix {
            queue: flags(queue),
            inspectors: flags(inspectors),
            pricing: flags(pricing),
            audit: CrudFlags::READ,
            access: CrudFlags::NONE,
        },
    }
}

fn access(password_hash: &str) -> AccessControl {
    let roles: Vec<Role> = [
        (SUPER_ADMIN_ROLE_ID, "Super Admin"),
        ("ops_admin", "Ops Admin"),
        ("location_manager", "Location Manager"),
        ("finance", "Finance"),
        ("read_only", "Read-only"),
    ]
    .into_iter()
    .map(|(id, name)| Role {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect();

    let role_permissions: BTreeMap<String, Permissions> = [
        (SUPER_ADMIN_ROLE_ID, Permissions::super_admin()),
        ("ops_admin", managing(true, true, true)),
        ("location_manager", managing(true, true, false)),
        ("finance", managing(false, false, true)),
        ("read_only", Permissions::read_only()),
    ]
    .into_iter()
    .map(|(id, permissions)| (id.to_string(), permissions))
    .collect();

    let users: Vec<User> = [
        (SUPER_ADMIN_USER_ID, "Super Admin", SUPER_ADMIN_ROLE_ID, "admin", "9999999999", "superadmin"),
        ("USR-OPS-1", "Ops Admin", "ops_admin", "ops", "9000000001", "opsadmin"),
        ("USR-LM-1", "Location Manager", "location_manager", "lm", "9000000002", "locmanager"),
        ("USR-FIN-1", "Finance", "finance", "finance", "9000000003", "finance"),
        ("USR-RO-1", "Read-only", "read_only", "viewer", "9000000004", "viewer"),
    ]
    .into_iter()
    .map(|(user_id, name, role_id, mailbox, phone, username)| User {
        user_id: user_id.to_string(),
        name: name.to_string(),
        role_id: role_id.to_string(),
        email: Some(format!("{mailbox}@carnalysis.local")),
        phone: Some(phone.to_string()),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        active: true,
    })
    .collect();

    AccessControl {
        roles,
        users,
        role_permissions,
        user_overrides: BTreeMap::new(),
    }
}

struct InspectorSeed {
    id: &'static str,
    name: &'static str,
    phone: &'static str,
    mailbox: &'static str,
    join_date: Date,
    employment_type: EmploymentType,
    status: InspectorStatus,
    location_id: &'static str,
    skills: &'static [VehicleType],
    utilization_pct: u8,
    state: OperationalState,
    minutes_in_state: i64,
}

const BOTH: &[VehicleType] = &[VehicleType::New, VehicleType::PreOwned];

fn inspectors(now: OffsetDateTime) -> Vec<Inspector> {
    let seeds: [InspectorSeed; 5] = [
        InspectorSeed {
            id: "INSP-001",
            name: "Asha N.",
            phone: "9000000101",
            mailbox: "asha",
            join_date: date!(2025 - 11 - 15),
            employment_type: EmploymentType::FullTime,
            status: InspectorStatus::Active,
            location_id: "LOC-BLR-01",
            skills: BOTH,
            utilization_pct: 78,
            state: OperationalState::Busy,
            minutes_in_state: 12,
        },
        InspectorSeed {
            id: "INSP-002",
            name: "Ravi K.",
            phone: "9000000102",
            mailbox: "ravi",
            join_date: date!(2025 - 09 - 01),
            employment_type: EmploymentType::Contract,
            status: InspectorStatus::Active,
            location_id: "LOC-BLR-01",
            skills: &[VehicleType::New],
            utilization_pct: 52,
            state: OperationalState::Idle,
            minutes_in_state: 30,
        },
        InspectorSeed {
            id: "INSP-003",
            name: "Neha S.",
            phone: "9000000103",
            mailbox: "neha",
            join_date: date!(2025 - 07 - 20),
            employment_type: EmploymentType::Freelancer,
            status: InspectorStatus::Active,
            location_id: "LOC-HYD-01",
            skills: &[VehicleType::PreOwned],
            utilization_pct: 64,
            state: OperationalState::Busy,
            minutes_in_state: 5,
        },
        InspectorSeed {
            id: "INSP-004",
            name: "Imran A.",
            phone: "9000000104",
            mailbox: "imran",
            join_date: date!(2025 - 10 - 10),
            employment_type: EmploymentType::FullTime,
            status: InspectorStatus::Inactive,
            location_id: "LOC-HYD-01",
            skills: BOTH,
            utilization_pct: 39,
            state: OperationalState::Idle,
            minutes_in_state: 42,
        },
        InspectorSeed {
            id: "INSP-005",
            name: "Priya M.",
            phone: "9000000105",
            mailbox: "priya",
            join_date: date!(2025 - 08 - 05),
            employment_type: EmploymentType::FullTime,
            status: InspectorStatus::Active,
            location_id: "LOC-PUN-01",
            skills: BOTH,
            utilization_pct: 71,
            state: OperationalState::Busy,
            minutes_in_state: 18,
        },
    ];

    seeds
        .into_iter()
        .map(|s| Inspector {
            id: s.id.to_string(),
            name: s.name.to_string(),
            phone: s.phone.to_string(),
            email: format!("{}@carnalysis.local", s.mailbox),
            profile_photo_url: String::new(),
            join_date: s.join_date,
            employment_type: s.employment_type,
            status: s.status,
            location_ids: vec![s.location_id.to_string()],
            skills: s.skills.to_vec(),
            utilization_pct: s.utilization_pct,
            state: s.state,
            last_state_change_at: minutes_ago(now, s.minutes_in_state),
        })
        .collect()
}

struct QueueSeed {
    id: &'static str,
    age_minutes: i64,
    location_id: &'static str,
    vehicle_type: VehicleType,
    customer_name: &'static str,
    customer_phone: &'static str,
    vehicle_number: &'static str,
    vehicle_summary: &'static str,
    priority: Priority,
    eta_minutes: u32,
    duration_minutes: u32,
}

fn queue(now: OffsetDateTime, default_inr: u32) -> Vec<QueueItem> {
    let seeds: [QueueSeed; 5] = [
        QueueSeed {
            id: "PDI-24001",
            age_minutes: 55,
            location_id: "LOC-BLR-01",
            vehicle_type: VehicleType::New,
            customer_name: "Amit Sharma",
            customer_phone: "+91 98765 43210",
            vehicle_number: "KA01AB2401",
            vehicle_summary: "Honda City",
            priority: Priority::P1,
            eta_minutes: 0,
            duration_minutes: 25,
        },
        QueueSeed {
            id: "PDI-24002",
            age_minutes: 35,
            location_id: "LOC-BLR-01",
            vehicle_type: VehicleType::PreOwned,
            customer_name: "Neha Verma",
            customer_phone: "+91 91234 56789",
            vehicle_number: "KA05CD1202",
            vehicle_summary: "Hyundai i20 (2019)",
            priority: Priority::P2,
            eta_minutes: 10,
            duration_minutes: 30,
        },
        QueueSeed {
            id: "PDI-24003",
            age_minutes: 80,
            location_id: "LOC-HYD-01",
            vehicle_type: VehicleType::PreOwned,
            customer_name: "Rahul Reddy",
            customer_phone: "+91 90000 12345",
            vehicle_number: "TS09EF9903",
            vehicle_summary: "Maruti Swift (2018)",
            priority: Priority::P0,
            eta_minutes: 0,
            duration_minutes: 35,
        },
        QueueSeed {
            id: "PDI-24004",
            age_minutes: 20,
            location_id: "LOC-HYD-01",
            vehicle_type: VehicleType::New,
            customer_name: "Sana Khan",
            customer_phone: "+91 90123 45678",
            vehicle_number: "TS10GH4404",
            vehicle_summary: "Tata Nexon",
            priority: Priority::P3,
            eta_minutes: 5,
            duration_minutes: 20,
        },
        QueueSeed {
            id: "PDI-24005",
            age_minutes: 15,
            location_id: "LOC-PUN-01",
            vehicle_type: VehicleType::New,
            customer_name: "Vikram Patil",
            customer_phone: "+91 99887 77665",
            vehicle_number: "MH12JK2405",
            vehicle_summary: "Mahindra XUV300",
            priority: Priority::P2,
            eta_minutes: 0,
            duration_minutes: 25,
        },
    ];

    seeds
        .into_iter()
        .map(|s| QueueItem {
            id: s.id.to_string(),
            created_at: minutes_ago(now, s.age_minutes),
            location_id: s.location_id.to_string(),
            vehicle_type: s.vehicle_type,
            customer_name: s.customer_name.to_string(),
            customer_phone: s.customer_phone.to_string(),
            vehicle_number: s.vehicle_number.to_string(),
            vehicle_summary: s.vehicle_summary.to_string(),
            priority: s.priority,
            status: QueueStatus::Pending,
            assigned_inspector_id: None,
            customer_eta_minutes: s.eta_minutes,
            expected_duration_minutes: s.duration_minutes,
            price_inr: default_inr,
            payment_at: None,
            closed_at: None,
            commission_override_inr: None,
        })
        .map(|mut item| {
            // Neha is already on the Swift and the customer has paid.
            if item.id == "PDI-24003" {
                item.status = QueueStatus::InProgress;
                item.assigned_inspector_id = Some(String::from("INSP-003"));
                item.payment_at = Some(minutes_ago(now, 10));
            }
            item
        })
        .collect()
}

fn commissions(now: OffsetDateTime) -> Vec<Commission> {
    vec![
        Commission {
            id: String::from("COM-9001"),
            inspector_id: String::from("INSP-001"),
            location_id: String::from("LOC-BLR-01"),
            pdi_id: String::from("PDI-23988"),
            visit_at: minutes_ago(now, 320),
            amount_inr: 500,
            status: CommissionStatus::Pending,
            payment_at: minutes_ago(now, 300),
        },
        Commission {
            id: String::from("COM-9002"),
            inspector_id: String::from("INSP-003"),
            location_id: String::from("LOC-HYD-01"),
            pdi_id: String::from("PDI-23991"),
            visit_at: minutes_ago(now, 210),
            amount_inr: 500,
            status: CommissionStatus::Approved,
            payment_at: minutes_ago(now, 205),
        },
    ]
}

fn leave_requests(now: OffsetDateTime) -> Vec<LeaveRequest> {
    vec![LeaveRequest {
        id: String::from("LVR-0001"),
        inspector_id: String::from("INSP-002"),
        from_date: date!(2026 - 02 - 15),
        to_date: date!(2026 - 02 - 16),
        reason: String::from("Family function"),
        status: LeaveStatus::Pending,
        requested_at: minutes_ago(now, 90),
        decided_at: None,
        rejection_reason: None,
    }]
}

fn vehicle_master() -> VehicleMaster {
    let makes: Vec<Make> = [
        ("MAKE-MARUTI", "Maruti Suzuki"),
        ("MAKE-HONDA", "Honda"),
        ("MAKE-HYUNDAI", "Hyundai"),
        ("MAKE-TATA", "Tata"),
        ("MAKE-MAHINDRA", "Mahindra"),
        ("MAKE-TOYOTA", "Toyota"),
        ("MAKE-KIA", "Kia"),
        ("MAKE-RENAULT", "Renault"),
        ("MAKE-SKODA", "Skoda"),
        ("MAKE-VW", "Volkswagen"),
    ]
    .into_iter()
    .map(|(id, name)| Make {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect();

    let models: Vec<Model> = [
        ("MODEL-SWIFT", "Swift", "MAKE-MARUTI"),
        ("MODEL-CITY", "City", "MAKE-HONDA"),
        ("MODEL-BALENO", "Baleno", "MAKE-MARUTI"),
        ("MODEL-BREZZA", "Brezza", "MAKE-MARUTI"),
        ("MODEL-AMAZE", "Amaze", "MAKE-HONDA"),
        ("MODEL-CRETA", "Creta", "MAKE-HYUNDAI"),
        ("MODEL-I20", "i20", "MAKE-HYUNDAI"),
        ("MODEL-NEXON", "Nexon", "MAKE-TATA"),
        ("MODEL-PUNCH", "Punch", "MAKE-TATA"),
        ("MODEL-XUV700", "XUV700", "MAKE-MAHINDRA"),
        ("MODEL-SCORPIO", "Scorpio-N", "MAKE-MAHINDRA"),
        ("MODEL-INNOVA", "Innova Crysta", "MAKE-TOYOTA"),
        ("MODEL-SELTO", "Seltos", "MAKE-KIA"),
        ("MODEL-KIGER", "Kiger", "MAKE-RENAULT"),
        ("MODEL-SLAVIA", "Slavia", "MAKE-SKODA"),
        ("MODEL-TAIGUN", "Taigun", "MAKE-VW"),
    ]
    .into_iter()
    .map(|(id, name, make_id)| Model {
        id: id.to_string(),
        name: name.to_string(),
        make_id: make_id.to_string(),
    })
    .collect();

    let variants: Vec<Variant> = [
        ("VAR-VXI", "VXI", "MODEL-SWIFT"),
        ("VAR-ZXI", "ZXI", "MODEL-SWIFT"),
        ("VAR-LXI", "LXI", "MODEL-SWIFT"),
        ("VAR-DELTA", "Delta", "MODEL-BALENO"),
        ("VAR-ALPHA", "Alpha", "MODEL-BALENO"),
        ("VAR-VX", "VX", "MODEL-CITY"),
        ("VAR-ZX", "ZX", "MODEL-CITY"),
        ("VAR-SX", "SX", "MODEL-CRETA"),
        ("VAR-SX-O", "SX (O)", "MODEL-CRETA"),
        ("VAR-SPORTZ", "Sportz", "MODEL-I20"),
        ("VAR-ASTA", "Asta", "MODEL-I20"),
        ("VAR-XZ", "XZ+", "MODEL-NEXON"),
        ("VAR-XM", "XM", "MODEL-PUNCH"),
        ("VAR-AX7", "AX7", "MODEL-XUV700"),
        ("VAR-Z8", "Z8", "MODEL-SCORPIO"),
        ("VAR-Z7", "Z7", "MODEL-SCORPIO"),
        ("VAR-GX", "GX", "MODEL-INNOVA"),
        ("VAR-HTK", "HTK", "MODEL-SELTO"),
        ("VAR-RXL", "RXL", "MODEL-KIGER"),
        ("VAR-STYLE", "Style", "MODEL-SLAVIA"),
        ("VAR-TOPLINE", "Topline", "MODEL-TAIGUN"),
    ]
    .into_iter()
    .map(|(id, name, model_id)| Variant {
        id: id.to_string(),
        name: name.to_string(),
        model_id: model_id.to_string(),
    })
    .collect();

    let category_seeds: [(&str, &str, u32); 6] = [
        ("CAT-HATCH", "Hatchback", 500),
        ("CAT-SEDAN", "Sedan", 650),
        ("CAT-SUV", "SUV", 800),
        ("CAT-MUV", "MUV/MPV", 900),
        ("CAT-LUX", "Luxury", 1400),
        ("CAT-COMPACT", "Compact", 550),
    ];
    let categories: Vec<Category> = category_seeds
        .iter()
        .map(|(id, name, _)| Category {
            id: (*id).to_string(),
            name: (*name).to_string(),
        })
        .collect();
    let category_pricing: BTreeMap<String, u32> = category_seeds
        .iter()
        .map(|(id, _, price)| ((*id).to_string(), *price))
        .collect();

    let mapping_seeds: [(&str, VehicleType, &str, &str, &str, &str, u32); 5] = [
        ("MAP-0001", VehicleType::New, "MAKE-MARUTI", "MODEL-SWIFT", "VAR-VXI", "CAT-HATCH", 500),
        ("MAP-0002", VehicleType::New, "MAKE-HONDA", "MODEL-CITY", "VAR-VX", "CAT-SEDAN", 650),
        ("MAP-0003", VehicleType::PreOwned, "MAKE-HYUNDAI", "MODEL-CRETA", "VAR-SX", "CAT-SUV", 800),
        ("MAP-0004", VehicleType::New, "MAKE-TATA", "MODEL-NEXON", "VAR-XZ", "CAT-SUV", 800),
        ("MAP-0005", VehicleType::New, "MAKE-TOYOTA", "MODEL-INNOVA", "VAR-GX", "CAT-MUV", 900),
    ];
    let mut mappings: Vec<VehicleMapping> = Vec::with_capacity(mapping_seeds.len());
    let mut mapping_pricing: BTreeMap<String, MappingPricing> = BTreeMap::new();
    for (id, condition, make_id, model_id, variant_id, category_id, base_inr) in mapping_seeds {
        mappings.push(VehicleMapping {
            id: id.to_string(),
            condition,
            make_id: make_id.to_string(),
            model_id: model_id.to_string(),
            variant_id: variant_id.to_string(),
            category_id: category_id.to_string(),
        });
        mapping_pricing.insert(
            id.to_string(),
            MappingPricing {
                base_inr,
                distant_after_km: 10,
                distant_extra_inr: 50,
            },
        );
    }

    VehicleMaster {
        makes,
        models,
        variants,
        categories,
        mappings,
        mapping_pricing,
        category_pricing,
    }
}

fn yes_no(id: &str, label: &str) -> ChecklistField {
    ChecklistField {
        id: id.to_string(),
        label: label.to_string(),
        input_type: InputType::YesNo,
        required: true,
        options: Vec::new(),
        min_photos: None,
    }
}

/// One exterior section and two scoring rules per condition. Ids come from
/// the shared checklist counter, which is returned advanced past them.
fn checklists(counter: &mut u32) -> BTreeMap<VehicleType, ChecklistTemplate> {
    let mut next = |prefix: &str| {
        let id: String = format!("{prefix}-{counter:03}");
        *counter += 1;
        id
    };

    VehicleType::ALL
        .into_iter()
        .map(|condition| {
            let section_id: String = next("SEC");
            let mut fields: Vec<ChecklistField> = vec![
                yes_no(&next("FLD"), "Body panels free of dents"),
                yes_no(&next("FLD"), "Paint finish consistent"),
            ];
            fields.push(ChecklistField {
                id: next("FLD"),
                label: String::from("Exterior photos"),
                input_type: InputType::Photos,
                required: true,
                options: Vec::new(),
                min_photos: Some(4),
            });
            if condition == VehicleType::PreOwned {
                fields.push(ChecklistField {
                    id: next("FLD"),
                    label: String::from("Tyre condition"),
                    input_type: InputType::Dropdown,
                    required: true,
                    options: vec![
                        String::from("Good"),
                        String::from("Fair"),
                        String::from("Replace"),
                    ],
                    min_photos: None,
                });
            }
            let template = ChecklistTemplate {
                condition,
                sections: vec![ChecklistSection {
                    id: section_id,
                    title: String::from("Exterior"),
                    order: 1,
                    fields,
                }],
                scoring_rules: vec![
                    ScoringRule {
                        id: next("RULE"),
                        min_checked: 2,
                        score_pct: 60,
                    },
                    ScoringRule {
                        id: next("RULE"),
                        min_checked: 4,
                        score_pct: 100,
                    },
                ],
            };
            (condition, template)
        })
        .collect()
}

fn seeded_events(now: OffsetDateTime) -> Vec<AuditEvent> {
    let actor = Actor::new(
        String::from("USR-OPS-1"),
        String::from("Ops Admin"),
        String::from("ops_admin"),
    );
    vec![
        AuditEvent::new(
            minutes_ago(now, 18),
            actor,
            EntityRef::new("queue_item", "PDI-24003"),
            "manual_assign",
            Diff::new().with("assigned_inspector_id", None::<String>, "INSP-003"),
            "High priority customer arrival",
        )
        .at_location("LOC-HYD-01")
        .correlated("BULK-0001"),
    ]
}

/// Builds the demo state and its historical audit events.
///
/// Every demo account gets `password_hash`.
#[must_use]
pub fn demo_state(now: OffsetDateTime, password_hash: &str) -> (State, Vec<AuditEvent>) {
    let mut state: State = State::new(locations());
    state.queue = queue(now, state.pricing.default_inr);
    state.inspectors = inspectors(now);
    state.commissions = commissions(now);
    state.leave_requests = leave_requests(now);
    state.vehicle_master = vehicle_master();
    state.checklists = checklists(&mut state.sequences.checklist);
    state.access = access(password_hash);
    (state, seeded_events(now))
}
