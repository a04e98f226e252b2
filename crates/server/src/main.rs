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
#![allow(clippy::multiple_crate_versions)]

mod live;
mod routes;
mod seed;
mod session;

#[cfg(test)]
mod tests;

use axum::{Router, extract::FromRef};
use clap::Parser;
use gudang_api::{ApiContext, SystemClock};
use gudang_domain::{DeptCode, ScopeWidenings};
use gudang_notify::{FanOutSink, NotificationSink, TracingSink};
use gudang_persistence::Persistence;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::UtcOffset;
use tokio::sync::Mutex;
use tracing::info;

use crate::live::LiveEventBroadcaster;

/// Gudang Server - HTTP server for the Gudang request workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "GUDANG_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "GUDANG_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Supervisor scope widening, e.g. `QC=QA,PP`. Repeatable. Replaces the
    /// plant default (`QC=QA,PP`) when given.
    #[arg(long = "scope-widening", value_parser = parse_widening)]
    scope_widenings: Vec<(DeptCode, Vec<DeptCode>)>,

    /// Install demo departments and actors into an empty database
    #[arg(long)]
    seed: bool,

    /// Plant UTC offset in whole hours (7 for WIB). Document numbers use the
    /// month and year at this offset.
    #[arg(
        long,
        env = "GUDANG_UTC_OFFSET_HOURS",
        default_value_t = 0,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i8).range(-12..=14)
    )]
    utc_offset_hours: i8,
}

/// Parses `DEPT=COVERED,COVERED`.
fn parse_widening(raw: &str) -> Result<(DeptCode, Vec<DeptCode>), String> {
    let (dept, covers) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DEPT=COVERED[,COVERED...], got '{raw}'"))?;
    let dept: DeptCode = DeptCode::new(dept.trim()).map_err(|e| e.to_string())?;
    let covers: Vec<DeptCode> = covers
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| DeptCode::new(c).map_err(|e| e.to_string()))
        .collect::<Result<Vec<DeptCode>, String>>()?;
    Ok((dept, covers))
}

fn widenings_from(rules: Vec<(DeptCode, Vec<DeptCode>)>) -> ScopeWidenings {
    if rules.is_empty() {
        return ScopeWidenings::plant_defaults();
    }
    rules
        .into_iter()
        .fold(ScopeWidenings::none(), |widenings, (dept, covers)| {
            widenings.with_rule(dept, covers)
        })
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Storage, one connection serialized behind a mutex.
    persistence: Arc<Mutex<Persistence>>,
    /// Notification sink, scope widenings and clock.
    ctx: ApiContext,
    /// Live notification stream.
    live: Arc<LiveEventBroadcaster>,
}

impl AppState {
    fn new(persistence: Persistence, widenings: ScopeWidenings, clock: SystemClock) -> Self {
        let live: Arc<LiveEventBroadcaster> = Arc::new(LiveEventBroadcaster::new());
        let sink: Arc<dyn NotificationSink> = Arc::new(
            FanOutSink::new()
                .with(Arc::new(TracingSink))
                .with(live.clone()),
        );
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            ctx: ApiContext::new(sink, widenings).with_clock(Arc::new(clock)),
            live,
        }
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        state.live.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Gudang Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if args.seed {
        seed::seed_demo_data(&mut persistence)?;
    }

    let widenings: ScopeWidenings = widenings_from(args.scope_widenings);
    for (dept, covers) in widenings.iter() {
        info!(dept = %dept, covers = ?covers, "Supervisor scope widening");
    }

    let offset: UtcOffset = UtcOffset::from_hms(args.utc_offset_hours, 0, 0)?;
    info!(offset = %offset, "Plant clock offset");

    let app: Router =
        routes::build_router(AppState::new(persistence, widenings, SystemClock::new(offset)));

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
