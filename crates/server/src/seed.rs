// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Demo master data for a fresh database.

use gudang_api::{
    ApiError, RegisterActorRequest, RegisterDepartmentRequest, register_actor, register_department,
};
use gudang_persistence::Persistence;
use tracing::info;

const DEPARTMENTS: [(&str, &str, &str); 7] = [
    ("MLD", "Moulding", "production"),
    ("ASM", "Assembly", "production"),
    ("PNT", "Painting", "production"),
    ("QC", "Quality Control", "indirect"),
    ("QA", "Quality Assurance", "indirect"),
    ("PP", "Production Planning", "indirect"),
    ("GA", "General Affairs", "other"),
];

/// `(id, display name, role, assigned departments)`
const ACTORS: [(&str, &str, &str, &[&str]); 6] = [
    ("admin.produksi", "Admin Produksi", "admin_produksi", &[]),
    ("admin.indirect", "Admin Indirect", "admin_indirect", &[]),
    ("admin.ga", "Admin General Affairs", "admin_dept", &["GA"]),
    ("spv.mld", "Supervisor Moulding", "supervisor", &["MLD", "ASM"]),
    ("spv.qc", "Supervisor Quality", "supervisor", &["QC"]),
    ("hrga", "HRGA Staff", "hrga", &[]),
];

/// Installs demo departments and actors unless departments already exist.
///
/// Returns whether anything was installed.
///
/// # Errors
///
/// Returns an error if a registration fails.
pub fn seed_demo_data(persistence: &mut Persistence) -> Result<bool, ApiError> {
    let existing: usize = persistence
        .list_departments()
        .map_err(gudang_api::translate_persistence_error)?
        .len();
    if existing > 0 {
        info!(existing, "Departments present; skipping demo seed");
        return Ok(false);
    }

    for (code, name, category) in DEPARTMENTS {
        register_department(
            persistence,
            RegisterDepartmentRequest {
                code: code.to_string(),
                name: name.to_string(),
                category: category.to_string(),
            },
        )?;
    }
    for (actor_id, display_name, role, departments) in ACTORS {
        register_actor(
            persistence,
            RegisterActorRequest {
                actor_id: actor_id.to_string(),
                display_name: display_name.to_string(),
                role: role.to_string(),
                primary_department: departments.first().map(|d| (*d).to_string()),
                departments: departments.iter().map(|d| (*d).to_string()).collect(),
            },
        )?;
    }

    info!(
        departments = DEPARTMENTS.len(),
        actors = ACTORS.len(),
        "Installed demo data"
    );
    Ok(true)
}
