// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AuthenticatedActor, AuthenticationService, CreateQueueItemRequest, ReasonRequest};
use pdi_ops::{DEMO_PASSWORD, FixedClock, Store, StoreConfig};
use pdi_ops_domain::{Priority, VehicleType};
use std::sync::Arc;
use time::macros::datetime;

/// Lowest cost bcrypt accepts; keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn create_test_store() -> Store {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(datetime!(2026-02-10 06:00 UTC)));
    let hash: String = bcrypt::hash(DEMO_PASSWORD, TEST_BCRYPT_COST).unwrap();
    Store::seeded(clock, StoreConfig::default(), &hash)
}

pub fn create_test_actor(store: &Store, user_id: &str) -> AuthenticatedActor {
    AuthenticationService::authenticate(store, user_id).unwrap()
}

pub fn create_test_super_admin(store: &Store) -> AuthenticatedActor {
    create_test_actor(store, "USR-SA-1")
}

pub fn create_test_ops_admin(store: &Store) -> AuthenticatedActor {
    create_test_actor(store, "USR-OPS-1")
}

pub fn create_test_finance(store: &Store) -> AuthenticatedActor {
    create_test_actor(store, "USR-FIN-1")
}

pub fn create_test_viewer(store: &Store) -> AuthenticatedActor {
    create_test_actor(store, "USR-RO-1")
}

pub fn create_test_intake() -> CreateQueueItemRequest {
    CreateQueueItemRequest {
        location_id: String::from("LOC-PUN-01"),
        vehicle_type: VehicleType::New,
        customer_name: String::from("Kavya Iyer"),
        customer_phone: String::from("+91 98450 11223"),
        vehicle_number: String::from("mh12ab9090"),
        vehicle_summary: String::from("Kia Seltos"),
        priority: Priority::P2,
        customer_eta_minutes: 15,
        expected_duration_minutes: 30,
        price_inr: None,
        reason: String::from("Walk-in"),
    }
}

pub fn create_test_reason(reason: &str) -> ReasonRequest {
    ReasonRequest {
        reason: reason.to_string(),
    }
}
