// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use gudang::CoreError;
use gudang_domain::DomainError;
use gudang_persistence::PersistenceError;
use serde::Serialize;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be resolved to a known actor.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role or department scope does not permit the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor may not perform it.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}' {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ApiError {
    /// The caller could not be resolved to a known actor.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role or department scope does not permit the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor may not perform it.
        reason: String,
    },
    /// The request is not in a state that permits the transition. Nothing
    /// was changed.
    InvalidStateTransition {
        /// A human-readable description.
        message: String,
    },
    /// A request needs at least one line item.
    EmptyItems,
    /// A rejection needs a non-blank reason.
    EmptyReason,
    /// A month outside `1..=12` was given to the document number formatter.
    InvalidMonth {
        /// The rejected month.
        month: u8,
    },
    /// A batch member is not eligible. Nothing was changed.
    InvalidMembership {
        /// A human-readable description.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Storage was busy or unreachable. Reads may be retried; a mutation
    /// retry is safe because every transition is conditional.
    TransientFailure {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns true if the caller may retry the call as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientFailure { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}' {reason}")
            }
            Self::InvalidStateTransition { message } => {
                write!(f, "Invalid state transition: {message}")
            }
            Self::EmptyItems => write!(f, "A request must contain at least one line item"),
            Self::EmptyReason => write!(f, "A rejection reason is required"),
            Self::InvalidMonth { month } => {
                write!(f, "Invalid month: {month}. Must be between 1 and 12")
            }
            Self::InvalidMembership { message } => write!(f, "Invalid batch membership: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::TransientFailure { message } => write!(f, "Transient failure: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStateTransition { .. } => ApiError::InvalidStateTransition {
            message: err.to_string(),
        },
        DomainError::EmptyItems => ApiError::EmptyItems,
        DomainError::EmptyReason => ApiError::EmptyReason,
        DomainError::InvalidMonth { month } => ApiError::InvalidMonth { month },
        DomainError::EmptyBatch | DomainError::InvalidMembership { .. } => {
            ApiError::InvalidMembership {
                message: err.to_string(),
            }
        }
        DomainError::InconsistentRequest { .. } | DomainError::InconsistentBatch { .. } => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
        DomainError::InvalidYear { .. } => invalid("year", &err),
        DomainError::InvalidSequence { .. } => invalid("sequence", &err),
        DomainError::InvalidDocNumber(_) => invalid("doc_number", &err),
        DomainError::InvalidDeptCode(_) => invalid("dept_code", &err),
        DomainError::InvalidCategory(_) => invalid("category", &err),
        DomainError::InvalidRole(_) => invalid("role", &err),
        DomainError::InvalidActorId(_) => invalid("actor_id", &err),
        DomainError::InvalidRequestStatus(_) | DomainError::InvalidBatchStatus(_) => {
            invalid("status", &err)
        }
        DomainError::InvalidQuantity { .. } | DomainError::DuplicateLineItem { .. } => {
            invalid("items", &err)
        }
        DomainError::InvalidItem { field, .. } => invalid(field, &err),
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// A failed conditional update means another writer moved the record
/// first; the caller sees the same error it would have seen had it read
/// the newer state.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    if err.is_transient() {
        return ApiError::TransientFailure {
            message: err.to_string(),
        };
    }
    match err {
        PersistenceError::StaleState { .. } => ApiError::InvalidStateTransition {
            message: err.to_string(),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::Duplicate(message) => ApiError::InvalidInput {
            field: String::from("id"),
            message: format!("already exists: {message}"),
        },
        PersistenceError::ConstraintViolation(message) => ApiError::InvalidInput {
            field: String::from("reference"),
            message,
        },
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
