// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use gudang_api::{CreateItemRequest, FixedClock, SystemClock, authenticate, create_item};
use gudang_domain::{Actor, ScopeWidenings};
use gudang_persistence::Persistence;
use serde_json::Value;
use std::sync::Arc;
use time::macros::datetime;
use tower::ServiceExt;

use crate::AppState;
use crate::routes::build_router;
use crate::seed::seed_demo_data;
use crate::session::ACTOR_HEADER;

/// Seeded state with a frozen clock (2026-03-14) and two items:
/// gloves (id 1, 20 in stock) and tape (id 2, 3 in stock).
pub fn create_test_app_state() -> AppState {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    assert!(seed_demo_data(&mut persistence).unwrap());

    let hrga: Actor = authenticate(&mut persistence, "hrga").unwrap();
    for (sku, name, stock) in [("GLV-01", "Cotton gloves", 20), ("TAPE-02", "Duct tape", 3)] {
        create_item(
            &mut persistence,
            &hrga,
            CreateItemRequest {
                sku: sku.to_string(),
                name: name.to_string(),
                unit: String::from("pcs"),
                min_stock: 2,
                initial_stock: stock,
            },
        )
        .unwrap();
    }

    let mut state: AppState = AppState::new(
        persistence,
        ScopeWidenings::plant_defaults(),
        SystemClock::default(),
    );
    state.ctx = state
        .ctx
        .with_clock(Arc::new(FixedClock(datetime!(2026-03-14 09:30 UTC))));
    state
}

pub fn create_test_app() -> Router {
    build_router(create_test_app_state())
}

/// Sends one request and returns the status and JSON body (`Null` when
/// the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    actor: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor);
    }
    let request: Request<Body> = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
