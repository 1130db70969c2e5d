//! HTTP surface for runtimes that fetch levels over the network instead of
//! linking the generator.

mod router;
mod routes_core;
mod routes_generation;
mod security;
mod state;
pub mod types;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::config::LevelConfig;
use crate::constraints::{self, ValidateResult};
use crate::error::{Error, Result};
use crate::generation::LevelGenerator;
use crate::random::SeededRng;
use router::build_router;
use routes_core::*;
use routes_generation::*;
use security::*;
use state::*;
use types::*;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Router with the level-endpoint guard configured from the environment.
pub fn router(config: LevelConfig) -> Result<Router> {
    let generator = LevelGenerator::new(config)?;
    Ok(build_router(AppState::new(generator), LevelAccess::from_env()))
}

pub async fn serve(config: LevelConfig, addr: &str) -> Result<()> {
    let app = router(config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!(%addr, "level API listening");
    axum::serve(listener, app).await.map_err(Error::Serve)
}
