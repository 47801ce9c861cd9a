//! Mutating endpoint handlers: refresh and kill.
//!
//! A kill never touches the published forest; the target's absence shows
//! up only after the next refresh.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use nix::sys::signal::Signal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use ptree_exporter::error::{RefreshError, TerminateError};
use ptree_exporter::gateway;

use crate::state::SharedState;

/// JSON payload for a successful /refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub nodes: usize,
    pub roots: usize,
    pub dropped_edges: usize,
    pub built_at: Option<DateTime<Utc>>,
    pub elapsed_micros: u64,
}

/// Handler for POST /refresh: full rebuild of the published forest.
#[instrument(skip(state))]
pub async fn refresh_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /refresh request");
    state.stats.record_http_request();

    let start = Instant::now();
    match state.reconciler.refresh() {
        Ok(forest) => {
            let elapsed_micros = start.elapsed().as_micros() as u64;
            state.stats.record_refresh_ok(elapsed_micros);
            (
                StatusCode::OK,
                Json(RefreshResponse {
                    nodes: forest.len(),
                    roots: forest.roots().len(),
                    dropped_edges: forest.dropped_edges().len(),
                    built_at: forest.built_at(),
                    elapsed_micros,
                }),
            )
                .into_response()
        }
        Err(RefreshError::InFlight) => {
            state.stats.record_refresh_rejected();
            (
                StatusCode::CONFLICT,
                "Refresh already in progress, previous forest retained\n",
            )
                .into_response()
        }
        Err(e @ RefreshError::Source(_)) => {
            state.stats.record_refresh_failed();
            warn!(error = %e, "Refresh failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Refresh failed, previous forest retained: {e}\n"),
            )
                .into_response()
        }
    }
}

/// Query parameters for POST /kill/{pid}.
#[derive(Debug, Deserialize)]
pub struct KillParams {
    /// Send SIGKILL instead of SIGTERM.
    #[serde(default)]
    pub force: bool,
}

/// JSON payload for a successful kill.
#[derive(Debug, Serialize)]
pub struct KillResponse {
    pub pid: u32,
    pub signal: String,
}

/// Handler for POST /kill/{pid}: forwards a termination request to the OS.
#[instrument(skip(state))]
pub async fn kill_handler(
    State(state): State<SharedState>,
    Path(pid): Path<u32>,
    Query(params): Query<KillParams>,
) -> impl IntoResponse {
    debug!(pid, force = params.force, "Processing /kill request");
    state.stats.record_http_request();

    let signal = if params.force {
        Signal::SIGKILL
    } else {
        Signal::SIGTERM
    };

    match gateway::terminate(pid, signal) {
        Ok(()) => {
            state.stats.record_kill(true);
            (
                StatusCode::OK,
                Json(KillResponse {
                    pid,
                    signal: signal.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            state.stats.record_kill(false);
            let status = match e {
                TerminateError::NoSuchProcess(_) => StatusCode::NOT_FOUND,
                TerminateError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                TerminateError::Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, format!("{e}\n")).into_response()
        }
    }
}
