//! Config endpoint handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Handler for the /config endpoint: effective configuration as YAML.
#[instrument(skip(state))]
pub async fn config_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /config request");
    state.stats.record_http_request();

    match serde_yaml::to_string(state.config.as_ref()) {
        Ok(yaml) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; charset=utf-8")],
            yaml,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("Content-Type", "text/plain; charset=utf-8")],
            format!("Failed to serialize config: {e}\n"),
        ),
    }
}
