//! Index endpoint handler.

use axum::{extract::State, response::IntoResponse};
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Handler for the / endpoint: a plain-text endpoint directory.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");
    state.stats.record_http_request();

    let forest = state.reconciler.current();
    (
        [("Content-Type", "text/plain; charset=utf-8")],
        format!(
            "ptree-exporter\n\
             ==============\n\n\
             Published forest: {} nodes, {} roots\n\n\
             Endpoints:\n\
             GET  /            this page\n\
             GET  /tree        process tree as JSON\n\
             GET  /tree/text   process tree as plain text\n\
             GET  /health      exporter stats\n\
             GET  /config      effective configuration\n\
             POST /refresh     rebuild the forest from /proc\n\
             POST /kill/{{pid}}  send SIGTERM (?force=true for SIGKILL)\n",
            forest.len(),
            forest.roots().len()
        ),
    )
}
