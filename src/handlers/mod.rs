//! HTTP endpoint handlers.
//!
//! This module wires the reconstructed forest, the refresh reconciler, and
//! the terminate gateway to the axum router.

pub mod actions;
pub mod config;
pub mod health;
pub mod root;
pub mod tree;

pub use actions::{kill_handler, refresh_handler};
pub use config::config_handler;
pub use health::health_handler;
pub use root::root_handler;
pub use tree::{tree_handler, tree_text_handler};
