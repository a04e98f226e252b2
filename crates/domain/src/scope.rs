// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Department scope resolution.
//!
//! A scope is the set of department codes an actor may view and act on.
//! Resolution is read-scoping only: mutating operations must still check
//! that the target request's department is contained in the scope.
//!
//! Category admins derive their scope from the department catalogue
//! (department → category), so the rule cannot drift from the data.
//! Supervisors may be widened to neighbouring departments through
//! configurable widening rules.

use crate::types::{Actor, Department, DepartmentCategory, DeptCode, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The departments an actor may see and act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "departments", rename_all = "snake_case")]
pub enum Scope {
    /// No department filter applies.
    Unrestricted,
    /// Only the listed departments. May be empty (fail-closed).
    Departments(BTreeSet<DeptCode>),
}

impl Scope {
    /// Returns true if the department is visible under this scope.
    #[must_use]
    pub fn contains(&self, dept: &DeptCode) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Departments(codes) => codes.contains(dept),
        }
    }

    /// Returns true if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Departments(codes) if codes.is_empty())
    }

    /// Returns the department filter, or `None` when unrestricted.
    #[must_use]
    pub const fn departments(&self) -> Option<&BTreeSet<DeptCode>> {
        match self {
            Self::Unrestricted => None,
            Self::Departments(codes) => Some(codes),
        }
    }
}

/// Supervisor widening rules: an assigned department mapped to the full set
/// of departments its supervisor covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeWidenings {
    rules: BTreeMap<DeptCode, BTreeSet<DeptCode>>,
}

impl ScopeWidenings {
    /// Creates an empty rule set (no widening).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// The plant's standing rule: a quality-control supervisor also covers
    /// quality assurance and production planning.
    #[must_use]
    pub fn plant_defaults() -> Self {
        Self::none().with_rule(
            DeptCode::from_static("QC"),
            [DeptCode::from_static("QA"), DeptCode::from_static("PP")],
        )
    }

    /// Adds or replaces the widening for `dept`.
    ///
    /// The assigned department is always part of its own widened set.
    #[must_use]
    pub fn with_rule(mut self, dept: DeptCode, covers: impl IntoIterator<Item = DeptCode>) -> Self {
        let mut set: BTreeSet<DeptCode> = covers.into_iter().collect();
        set.insert(dept.clone());
        self.rules.insert(dept, set);
        self
    }

    /// Expands one assigned department.
    #[must_use]
    pub fn expand(&self, dept: &DeptCode) -> BTreeSet<DeptCode> {
        self.rules
            .get(dept)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([dept.clone()]))
    }

    /// Iterates over configured rules.
    pub fn iter(&self) -> impl Iterator<Item = (&DeptCode, &BTreeSet<DeptCode>)> {
        self.rules.iter()
    }
}

/// Everything needed to resolve scopes: the department catalogue and the
/// supervisor widenings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeRules {
    categories: BTreeMap<DeptCode, DepartmentCategory>,
    widenings: ScopeWidenings,
}

impl ScopeRules {
    /// Builds rules from the department catalogue and widenings.
    #[must_use]
    pub fn new<'a>(
        departments: impl IntoIterator<Item = &'a Department>,
        widenings: ScopeWidenings,
    ) -> Self {
        let categories: BTreeMap<DeptCode, DepartmentCategory> = departments
            .into_iter()
            .map(|d| (d.code.clone(), d.category))
            .collect();
        Self {
            categories,
            widenings,
        }
    }

    /// All department codes in the given category.
    #[must_use]
    pub fn codes_in_category(&self, category: DepartmentCategory) -> BTreeSet<DeptCode> {
        self.categories
            .iter()
            .filter(|(_, c)| **c == category)
            .map(|(code, _)| code.clone())
            .collect()
    }

    /// Returns true if the department is known to the catalogue.
    #[must_use]
    pub fn knows(&self, dept: &DeptCode) -> bool {
        self.categories.contains_key(dept)
    }

    /// Resolves the scope of an actor.
    ///
    /// | Role | Scope |
    /// |---|---|
    /// | `admin_produksi` | every production department |
    /// | `admin_indirect` | every indirect department |
    /// | `admin_dept` | the assigned department(s) |
    /// | `supervisor` | the assigned department(s), each expanded by the widenings |
    /// | `hrga` | unrestricted |
    ///
    /// Department-bound roles without any assignment resolve to an empty
    /// scope.
    #[must_use]
    pub fn resolve(&self, actor: &Actor) -> Scope {
        match actor.role {
            Role::AdminProduksi => {
                Scope::Departments(self.codes_in_category(DepartmentCategory::Production))
            }
            Role::AdminIndirect => {
                Scope::Departments(self.codes_in_category(DepartmentCategory::Indirect))
            }
            Role::AdminDept => Scope::Departments(actor.assigned_departments()),
            Role::Supervisor => Scope::Departments(
                actor
                    .assigned_departments()
                    .iter()
                    .flat_map(|d| self.widenings.expand(d))
                    .collect(),
            ),
            Role::Hrga => Scope::Unrestricted,
        }
    }
}
