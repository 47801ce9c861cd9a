//! Tree endpoint handlers: the published forest as JSON or plain text.
//!
//! These handlers only ever read the currently published forest snapshot;
//! a refresh happening concurrently swaps the published `Arc` and cannot
//! affect a response already being assembled.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use ptree_exporter::forest::NodeView;

use crate::render::render_forest_text;
use crate::state::SharedState;

/// JSON payload for the /tree endpoint.
#[derive(Debug, Serialize)]
pub struct TreeResponse {
    /// When the published forest was built; null before the first refresh.
    pub built_at: Option<DateTime<Utc>>,
    pub nodes: usize,
    pub roots: usize,
    /// Parent edges dropped by the cycle check, as (child, claimed parent).
    pub dropped_edges: Vec<(u32, u32)>,
    pub tree: Vec<NodeView>,
}

/// Handler for the /tree endpoint.
#[instrument(skip(state))]
pub async fn tree_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /tree request");
    state.stats.record_http_request();

    let forest = state.reconciler.current();
    Json(TreeResponse {
        built_at: forest.built_at(),
        nodes: forest.len(),
        roots: forest.roots().len(),
        dropped_edges: forest.dropped_edges().to_vec(),
        tree: forest.to_view(),
    })
}

/// Handler for the /tree/text endpoint.
#[instrument(skip(state))]
pub async fn tree_text_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /tree/text request");
    state.stats.record_http_request();

    let forest = state.reconciler.current();
    (
        [("Content-Type", "text/plain; charset=utf-8")],
        render_forest_text(&forest),
    )
}
