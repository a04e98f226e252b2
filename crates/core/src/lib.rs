// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! The pure half of the request lifecycle engine.
//!
//! Nothing in this crate touches storage or delivers notifications. Each
//! function takes the current values and returns what should happen next;
//! the API layer commits it.

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, batch_fulfilled, plan_batch, plan_create};
pub use command::Command;
pub use error::CoreError;
pub use state::{BatchPlan, CreatePlan, TransitionContext, TransitionResult};
