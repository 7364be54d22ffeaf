//! Book Quest · Quiz Backend
//!
//! - Axum HTTP + WebSocket API over a static book-question dataset
//! - Randomized question selection with recency and book filters
//! - Static SPA fallback (<static_dir>/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   QUIZ_CONFIG_PATH : path to TOML config (dataset path, static dir, feedback copy)
//!   DATASET_PATH     : overrides the dataset location (default "data/questions.json")
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod dataset;
mod selector;
mod progress;
mod logic;
mod protocol;
mod state;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::load_quiz_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Dataset is loaded once here; a missing or malformed file stops startup.
  let cfg = load_quiz_config_from_env();
  let state = match AppState::new(cfg) {
    Ok(s) => Arc::new(s),
    Err(e) => {
      error!(target: "book_quest", error = %e, "Cannot start without a dataset");
      return Err(e.into());
    }
  };

  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "book_quest", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
