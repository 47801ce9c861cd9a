//! One-shot subcommand implementations.

pub mod check;
pub mod config;
pub mod kill;
pub mod tree;

pub use check::command_check;
pub use config::command_config;
pub use kill::command_kill;
pub use tree::command_tree;
