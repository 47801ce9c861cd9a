//! CLI arguments and subcommands for ptree-exporter.
//!
//! This module defines the command-line interface structure using the clap
//! library, including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output format for the one-shot `tree` subcommand
#[derive(Debug, Clone, ValueEnum)]
pub enum TreeFormat {
    Text,
    Json,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "ptree-exporter",
    about = "Process tree exporter: serves the reconstructed /proc hierarchy over HTTP",
    long_about = "Process tree exporter for Linux.\n\n\
                  Scans /proc, reconstructs the parent/child process hierarchy from the \
                  unordered record batch, and serves it over HTTP as JSON or plain text. \
                  Supports on-demand full-rebuild refresh and a terminate action.",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Proc filesystem root (override for testing)
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Maximum number of processes to scan per refresh
    #[arg(long)]
    pub max_processes: Option<usize>,

    /// Refresh the forest automatically every N seconds (0 = on demand only)
    #[arg(long)]
    pub refresh_interval: Option<u64>,

    /// Parallel detail-read threads (0 = auto)
    #[arg(long)]
    pub parallelism: Option<usize>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan once and print the process tree to stdout
    Tree {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: TreeFormat,

        /// Only the subtree rooted at this pid
        #[arg(long)]
        pid: Option<u32>,
    },

    /// Send a termination signal to a process
    Kill {
        /// Target pid
        pid: u32,

        /// Send SIGKILL instead of SIGTERM
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Validate /proc access and system requirements
    Check,

    /// Generate configuration files
    Config {
        /// Output file path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },
}
