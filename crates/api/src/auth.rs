// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization rules.
//!
//! Role checks come first and fail the whole call. Department checks are
//! made against the actor's resolved [`Scope`] for the request at hand,
//! which is what lets bulk operations report them per item.

use gudang_domain::{Actor, DeptCode, Role, Scope};

use crate::error::AuthError;

/// Authorization service for enforcing role and department rules.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor may submit requests at all.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor holds one of the three admin roles.
    pub fn authorize_requester(actor: &Actor) -> Result<(), AuthError> {
        if actor.role.is_requester() {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: String::from("create_request"),
            reason: format!("is not permitted for role '{}'", actor.role),
        })
    }

    /// Checks that the actor may submit a request for `dept`.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a requester or `dept` is
    /// outside its scope.
    pub fn authorize_create_request(
        actor: &Actor,
        scope: &Scope,
        dept: &DeptCode,
    ) -> Result<(), AuthError> {
        Self::authorize_requester(actor)?;
        Self::authorize_department("create_request", scope, dept)
    }

    /// Checks that the actor may approve or reject requests.
    ///
    /// Only supervisors decide. The department check is separate.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a supervisor.
    pub fn authorize_decision(actor: &Actor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Supervisor => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: action.to_string(),
                reason: String::from("requires the supervisor role"),
            }),
        }
    }

    /// Checks that `dept` lies inside the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns an error if it does not.
    pub fn authorize_department(
        action: &str,
        scope: &Scope,
        dept: &DeptCode,
    ) -> Result<(), AuthError> {
        if scope.contains(dept) {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            reason: format!("department '{dept}' is outside the actor's scope"),
        })
    }

    /// Checks that the actor is HRGA: stock master data, batch scheduling
    /// and hand-over.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is HRGA.
    pub fn authorize_hrga(actor: &Actor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Hrga => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: action.to_string(),
                reason: String::from("requires the hrga role"),
            }),
        }
    }
}
