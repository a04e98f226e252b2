// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction at the server boundary.
//!
//! Identity is delegated to whatever sits in front of the server (a
//! reverse proxy or gateway), which forwards the resolved actor id in the
//! `X-Actor-Id` header. The actor is looked up fresh for every request and
//! never cached.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use gudang_api::authenticate;
use gudang_domain::Actor;
use tracing::{debug, warn};

use crate::AppState;

/// Header carrying the authenticated actor id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor for the calling actor.
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing, not valid text, or
/// names an unknown actor.
pub struct SessionActor(pub Actor);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor_id: &str = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| {
                debug!("Missing actor header");
                SessionError::MissingActorHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid actor header encoding");
                SessionError::InvalidActorHeader
            })?;

        let mut persistence = state.persistence.lock().await;
        let actor: Actor = authenticate(&mut persistence, actor_id).map_err(|e| {
            warn!(error = %e, "Actor lookup failed");
            SessionError::UnknownActor(e.to_string())
        })?;
        drop(persistence);

        debug!(actor = %actor.id, role = %actor.role, "Actor resolved");
        Ok(Self(actor))
    }
}

/// Actor extraction errors.
#[derive(Debug)]
pub enum SessionError {
    MissingActorHeader,
    InvalidActorHeader,
    UnknownActor(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingActorHeader => format!("Missing {ACTOR_HEADER} header"),
            Self::InvalidActorHeader => format!("Invalid {ACTOR_HEADER} header"),
            Self::UnknownActor(reason) => reason,
        };
        crate::routes::HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
