#![allow(dead_code)] // each suite uses its own subset of the helpers

use chrono::NaiveDate;
use reception_core::core::session::ReceptionSession;
use reception_core::domain::item::{ItemDraft, ReceptionItem};
use reception_core::domain::unit::{Reception, Unit};
use reception_core::storage::InMemoryStore;
use uuid::Uuid;

/// Seed data shared by the integration suites: two units with work spread
/// across groups, base items, and both transaction kinds.
pub struct Fixture {
    pub scope_id: Uuid,
    pub unit_one: Unit,
    pub unit_two: Unit,
    pub items: Vec<ReceptionItem>,
}

pub fn fixture() -> Fixture {
    let scope_id = Uuid::new_v4();
    let unit_one = Unit::new(1, "Motor AIR-90").with_subdivision("Rolling shop");
    let unit_two = Unit::new(2, "Motor 4A-132");
    let items = vec![
        item(unit_one.id, "Rewind_ID_1", "Winding", "income", 2.0, 100.0),
        item(unit_one.id, "Rewind_ID_2", "Winding", "expense", 1.0, 50.0),
        item(unit_one.id, "Balance", "Mechanical", "income", 1.0, 80.0),
        item(unit_two.id, "Rewind_ID_3", "Winding", "income", 3.0, 60.0),
        item(unit_two.id, "Paint", "Cosmetic", "expense", 2.0, 15.0),
    ];
    Fixture {
        scope_id,
        unit_one,
        unit_two,
        items,
    }
}

pub fn item(
    unit_id: Uuid,
    description: &str,
    group: &str,
    tag: &str,
    qty: f64,
    price: f64,
) -> ReceptionItem {
    ReceptionItem::new(unit_id, &ItemDraft::new(description, group, tag, qty, price))
}

pub fn reception() -> Reception {
    Reception::new(
        "RC-104",
        NaiveDate::from_ymd_opt(2024, 3, 11).expect("valid date"),
        "Steelworks LLC",
    )
}

/// Builds a loaded session over an in-memory store seeded with `fixture`.
pub fn session(fixture: &Fixture) -> ReceptionSession {
    let store = InMemoryStore::seeded(fixture.scope_id, fixture.items.clone());
    session_with_store(fixture, Box::new(store))
}

pub fn session_with_store(
    fixture: &Fixture,
    store: Box<dyn reception_core::storage::ItemStore>,
) -> ReceptionSession {
    let mut session = ReceptionSession::new(fixture.scope_id, store).with_metadata(
        reception(),
        vec![fixture.unit_one.clone(), fixture.unit_two.clone()],
    );
    session.reload().expect("initial load");
    session
}
