// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// A department code such as `MLD` or `QC`.
///
/// Codes are stable identifiers referenced by requests and document numbers.
/// They are stored verbatim: no case folding or trimming is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeptCode(String);

impl DeptCode {
    /// Creates a validated department code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDeptCode` if the code is empty, contains
    /// whitespace, or contains `/` (the document number separator).
    pub fn new(code: &str) -> Result<Self, DomainError> {
        if code.is_empty() {
            return Err(DomainError::InvalidDeptCode(String::from(
                "department code cannot be empty",
            )));
        }
        if code.contains('/') || code.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidDeptCode(format!(
                "'{code}' contains '/' or whitespace"
            )));
        }
        Ok(Self(code.to_string()))
    }

    /// Builds a code from a literal known to be valid.
    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(code.to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeptCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeptCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DeptCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DeptCode> for String {
    fn from(code: DeptCode) -> Self {
        code.0
    }
}

/// Department grouping used to derive category-admin scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentCategory {
    /// Production floor departments.
    Production,
    /// Indirect (support) departments.
    Indirect,
    /// Anything else; never covered by a category admin.
    Other,
}

impl DepartmentCategory {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Indirect => "indirect",
            Self::Other => "other",
        }
    }
}

impl FromStr for DepartmentCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "indirect" => Ok(Self::Indirect),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidCategory(s.to_string())),
        }
    }
}

/// A department of the facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub code: DeptCode,
    pub name: String,
    pub category: DepartmentCategory,
}

impl Department {
    #[must_use]
    pub const fn new(code: DeptCode, name: String, category: DepartmentCategory) -> Self {
        Self {
            code,
            name,
            category,
        }
    }
}

/// Identity of a user as issued by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Creates an actor id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidActorId` if the id is blank.
    pub fn new(id: &str) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidActorId(String::from(
                "actor id cannot be empty",
            )));
        }
        Ok(Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roles a user may hold.
///
/// The role decides both which operations are permitted and how the
/// department scope is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Requester for every production-category department.
    AdminProduksi,
    /// Requester for every indirect-category department.
    AdminIndirect,
    /// Requester for the assigned department(s) only.
    AdminDept,
    /// Approver for the assigned department(s).
    Supervisor,
    /// HR/General Affairs: stock master data, batch scheduling and hand-over.
    Hrga,
}

impl Role {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdminProduksi => "admin_produksi",
            Self::AdminIndirect => "admin_indirect",
            Self::AdminDept => "admin_dept",
            Self::Supervisor => "supervisor",
            Self::Hrga => "hrga",
        }
    }

    /// Returns true for the three roles that may submit requests.
    #[must_use]
    pub const fn is_requester(&self) -> bool {
        matches!(
            self,
            Self::AdminProduksi | Self::AdminIndirect | Self::AdminDept
        )
    }

    /// Returns true if the role's scope comes from assigned departments.
    #[must_use]
    pub const fn is_department_bound(&self) -> bool {
        matches!(self, Self::AdminDept | Self::Supervisor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin_produksi" => Ok(Self::AdminProduksi),
            "admin_indirect" => Ok(Self::AdminIndirect),
            "admin_dept" => Ok(Self::AdminDept),
            "supervisor" => Ok(Self::Supervisor),
            "hrga" => Ok(Self::Hrga),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// The principal performing an operation.
///
/// An `Actor` is resolved by the session provider for every call and passed
/// explicitly into each operation. It is never cached process-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
    pub primary_department: Option<DeptCode>,
    pub departments: BTreeSet<DeptCode>,
}

impl Actor {
    #[must_use]
    pub const fn new(id: ActorId, role: Role) -> Self {
        Self {
            id,
            role,
            primary_department: None,
            departments: BTreeSet::new(),
        }
    }

    /// Sets the primary department.
    #[must_use]
    pub fn with_primary_department(mut self, dept: DeptCode) -> Self {
        self.primary_department = Some(dept);
        self
    }

    /// Adds an assigned department.
    #[must_use]
    pub fn with_department(mut self, dept: DeptCode) -> Self {
        self.departments.insert(dept);
        self
    }

    /// All departments the actor is assigned to, primary included.
    #[must_use]
    pub fn assigned_departments(&self) -> BTreeSet<DeptCode> {
        let mut assigned: BTreeSet<DeptCode> = self.departments.clone();
        if let Some(primary) = &self.primary_department {
            assigned.insert(primary.clone());
        }
        assigned
    }
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Database identifier of an item.
    ItemId
);
numeric_id!(
    /// Database identifier of a request.
    RequestId
);
numeric_id!(
    /// Database identifier of a pickup batch.
    BatchId
);

/// A stock item managed by HRGA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub current_stock: u64,
    pub min_stock: u64,
}

impl Item {
    /// Returns true when stock has fallen to or below the threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

/// One line of a request: an item and a positive quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl LineItem {
    #[must_use]
    pub const fn new(item_id: ItemId, quantity: u32) -> Self {
        Self { item_id, quantity }
    }
}
