// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gudang_domain::{Department, DepartmentCategory, Item, Role};

use super::helpers::{actor_id, dept, seed};
use crate::{ActorRecord, Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut db1);

    assert_eq!(db1.list_departments().unwrap().len(), 3);
    assert!(db2.list_departments().unwrap().is_empty());
}

#[test]
fn test_departments_round_trip_with_category() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);

    let qc: Department = persistence.get_department(&dept("QC")).unwrap().unwrap();
    assert_eq!(qc.category, DepartmentCategory::Indirect);
    assert_eq!(qc.name, "Quality Control");
    assert!(persistence.get_department(&dept("ZZZ")).unwrap().is_none());

    let codes: Vec<String> = persistence
        .list_departments()
        .unwrap()
        .into_iter()
        .map(|d| d.code.as_str().to_string())
        .collect();
    assert_eq!(codes, vec!["ASM", "MLD", "QC"]);
}

#[test]
fn test_duplicate_department_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);

    let result: Result<(), PersistenceError> = persistence.insert_department(&Department::new(
        dept("MLD"),
        "Again".to_string(),
        DepartmentCategory::Other,
    ));
    assert!(matches!(result, Err(PersistenceError::Duplicate(_))));
}

#[test]
fn test_actor_round_trip_with_assigned_departments() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);
    let spv = gudang_domain::Actor::new(actor_id("spv.multi"), Role::Supervisor)
        .with_primary_department(dept("MLD"))
        .with_department(dept("ASM"));
    persistence.insert_actor(&spv, "Multi Supervisor").unwrap();

    let record: ActorRecord = persistence.get_actor(&actor_id("spv.multi")).unwrap().unwrap();
    assert_eq!(record.actor, spv);
    assert_eq!(record.display_name, "Multi Supervisor");
    assert!(persistence.get_actor(&actor_id("nobody")).unwrap().is_none());
}

#[test]
fn test_actor_with_unknown_department_is_not_stored() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);
    let spv = gudang_domain::Actor::new(actor_id("spv.ghost"), Role::Supervisor)
        .with_department(dept("GHOST"));

    let result: Result<(), PersistenceError> = persistence.insert_actor(&spv, "Ghost");
    assert!(matches!(result, Err(PersistenceError::ConstraintViolation(_))));
    assert!(persistence.get_actor(&actor_id("spv.ghost")).unwrap().is_none());
}

#[test]
fn test_list_actor_ids_by_role() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);

    let hrga: Vec<String> = persistence
        .list_actor_ids_by_role(Role::Hrga)
        .unwrap()
        .into_iter()
        .map(|id| id.as_str().to_string())
        .collect();
    assert_eq!(hrga, vec!["hrga.1", "hrga.2"]);
    assert!(persistence
        .list_actor_ids_by_role(Role::AdminIndirect)
        .unwrap()
        .is_empty());
}

#[test]
fn test_duplicate_sku_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);

    let result: Result<Item, PersistenceError> =
        persistence.insert_item("GLV-01", "Other gloves", "pair", 0, 0);
    assert!(matches!(result, Err(PersistenceError::Duplicate(_))));
}

#[test]
fn test_update_item_keeps_stock() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);

    let updated: Item = persistence
        .update_item(seeded.gloves.id, "Nitrile gloves", "box", 10)
        .unwrap();
    assert_eq!(updated.name, "Nitrile gloves");
    assert_eq!(updated.unit, "box");
    assert_eq!(updated.min_stock, 10);
    assert_eq!(updated.current_stock, 20);
    assert_eq!(updated.sku, "GLV-01");
}

#[test]
fn test_update_unknown_item_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);

    let result: Result<Item, PersistenceError> =
        persistence.update_item(gudang_domain::ItemId::new(999), "x", "y", 0);
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_receive_stock_adds_to_current_level() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);

    let item: Item = persistence.receive_stock(seeded.tape.id, 12).unwrap();
    assert_eq!(item.current_stock, 15);
    assert_eq!(
        persistence.get_item(seeded.tape.id).unwrap().unwrap().current_stock,
        15
    );
}

#[test]
fn test_list_items_low_stock_filter() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    persistence
        .insert_item("BAG-03", "Trash bags", "pack", 4, 4)
        .unwrap();

    let all: Vec<Item> = persistence.list_items(false).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].sku, "BAG-03");

    let low: Vec<String> = persistence
        .list_items(true)
        .unwrap()
        .into_iter()
        .map(|i| i.sku)
        .collect();
    assert_eq!(low, vec!["BAG-03"]);

    let fetched: Vec<Item> = persistence
        .get_items(&[seeded.gloves.id, seeded.tape.id])
        .unwrap();
    assert_eq!(fetched.len(), 2);
}
