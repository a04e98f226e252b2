// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{actor_id, dept};
use crate::{Actor, ActorId, DepartmentCategory, DeptCode, DomainError, Item, ItemId, Role};

#[test]
fn test_dept_code_is_stored_verbatim() {
    assert_eq!(dept("MLD").as_str(), "MLD");
    assert_ne!(dept("mld"), dept("MLD"));
}

#[test]
fn test_dept_code_rejects_separator_and_whitespace() {
    for bad in ["", "M/LD", "M LD", " MLD", "MLD\n"] {
        assert!(
            matches!(DeptCode::new(bad), Err(DomainError::InvalidDeptCode(_))),
            "{bad:?}"
        );
    }
}

#[test]
fn test_dept_code_deserialization_validates() {
    let ok: DeptCode = serde_json::from_str("\"QC\"").unwrap();
    assert_eq!(ok, dept("QC"));
    assert!(serde_json::from_str::<DeptCode>("\"Q/C\"").is_err());
}

#[test]
fn test_actor_id_rejects_blank() {
    assert!(ActorId::new("").is_err());
    assert!(ActorId::new("   ").is_err());
    assert_eq!(actor_id("spv.qc").as_str(), "spv.qc");
}

#[test]
fn test_role_strings_round_trip() {
    for role in [
        Role::AdminProduksi,
        Role::AdminIndirect,
        Role::AdminDept,
        Role::Supervisor,
        Role::Hrga,
    ] {
        assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }
    assert!("admin".parse::<Role>().is_err());
}

#[test]
fn test_requester_roles() {
    assert!(Role::AdminProduksi.is_requester());
    assert!(Role::AdminIndirect.is_requester());
    assert!(Role::AdminDept.is_requester());
    assert!(!Role::Supervisor.is_requester());
    assert!(!Role::Hrga.is_requester());
}

#[test]
fn test_category_strings() {
    assert_eq!(
        "production".parse::<DepartmentCategory>().unwrap(),
        DepartmentCategory::Production
    );
    assert_eq!(DepartmentCategory::Indirect.as_str(), "indirect");
    assert!("support".parse::<DepartmentCategory>().is_err());
}

#[test]
fn test_assigned_departments_include_primary() {
    let actor: Actor = Actor::new(actor_id("spv"), Role::Supervisor)
        .with_primary_department(dept("QC"))
        .with_department(dept("MLD"))
        .with_department(dept("QC"));
    let assigned: Vec<String> = actor
        .assigned_departments()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(assigned, vec!["MLD", "QC"]);
}

#[test]
fn test_low_stock_threshold_is_inclusive() {
    let mut item: Item = Item {
        id: ItemId::new(1),
        sku: String::from("ATK-001"),
        name: String::from("Ballpoint pen"),
        unit: String::from("pcs"),
        current_stock: 10,
        min_stock: 10,
    };
    assert!(item.is_low_stock());
    item.current_stock = 11;
    assert!(!item.is_low_stock());
}
