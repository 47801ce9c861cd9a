//! ptree-exporter - version 0.1.0
//!
//! Process tree exporter with tracing logging. This is the main entry
//! point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod handlers;
mod render;
mod startup_checks;
mod state;
mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info, warn, Level};

use ptree_exporter::{ProcSource, Reconciler};

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config, command_kill, command_tree};
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_BIND_ADDR,
    DEFAULT_PORT, DEFAULT_PROC_ROOT,
};
use handlers::{
    config_handler, health_handler, kill_handler, refresh_handler, root_handler, tree_handler,
    tree_text_handler,
};
use state::AppState;
use stats::RefreshStats;

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", args.log_level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        // Kill and Config don't need a validated scan configuration
        match command {
            Commands::Kill { pid, force } => {
                return command_kill(*pid, *force);
            }
            Commands::Config { output, format } => {
                return command_config(output.clone(), format.clone());
            }
            _ => {}
        }

        let config = load_validated_config(&args)?;

        return match command {
            Commands::Tree { format, pid } => command_tree(format.clone(), *pid, &config),
            Commands::Check => command_check(&config),
            Commands::Kill { .. } => unreachable!("Kill handled above"),
            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    // Load configuration for main server mode
    let config = resolve_config(&args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&args);

    info!("Starting ptree-exporter");

    let proc_root: PathBuf = config
        .proc_root
        .clone()
        .unwrap_or_else(|| DEFAULT_PROC_ROOT.into());

    // Validate runtime requirements before serving
    if let Err(e) = startup_checks::validate_requirements(&proc_root) {
        error!("Startup validation failed: {}", e);
        error!("The exporter will start but refreshes will fail until fixed");
    }

    let bind_ip_str = config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
    let port = config.port.unwrap_or(DEFAULT_PORT);

    // Configure parallel detail reads
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }

    let source = Arc::new(ProcSource::new(proc_root).with_max_processes(config.max_processes));
    let reconciler = Reconciler::new(source);
    let refresh_stats = Arc::new(RefreshStats::new());

    let state = Arc::new(AppState {
        reconciler,
        config: Arc::new(config.clone()),
        stats: refresh_stats,
    });

    // Publish an initial forest so the first /tree request has data
    info!("Performing initial refresh");
    let start = Instant::now();
    match state.reconciler.refresh() {
        Ok(forest) => {
            state
                .stats
                .record_refresh_ok(start.elapsed().as_micros() as u64);
            info!(
                "Initial refresh complete: {} nodes, {} roots",
                forest.len(),
                forest.roots().len()
            );
        }
        Err(e) => {
            state.stats.record_refresh_failed();
            error!("Initial refresh failed: {}", e);
        }
    }

    // Optional periodic refresh; 0 means on demand only
    let refresh_interval = config.refresh_interval.unwrap_or(0);
    if refresh_interval > 0 {
        let task_state = state.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(refresh_interval));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            ticker.tick().await; // first tick fires immediately; initial refresh already ran
            loop {
                ticker.tick().await;
                let start = Instant::now();
                match task_state.reconciler.refresh() {
                    Ok(_) => task_state
                        .stats
                        .record_refresh_ok(start.elapsed().as_micros() as u64),
                    Err(ptree_exporter::RefreshError::InFlight) => {
                        task_state.stats.record_refresh_rejected();
                    }
                    Err(e) => {
                        task_state.stats.record_refresh_failed();
                        warn!("Periodic refresh failed: {}", e);
                    }
                }
            }
        });
        info!("Periodic refresh every {}s", refresh_interval);
    } else {
        info!("No periodic refresh - rebuilds triggered by POST /refresh only");
    }

    // Setup graceful shutdown signal handlers
    let shutdown_signal = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };

    // Configure HTTP server routes
    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port).parse()?;

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/tree", get(tree_handler))
        .route("/tree/text", get(tree_text_handler))
        .route("/health", get(health_handler))
        .route("/config", get(config_handler))
        .route("/refresh", post(refresh_handler))
        .route("/kill/{pid}", post(kill_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind(addr).await?;
    info!("ptree-exporter listening on http://{}:{}", bind_ip_str, port);

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("ptree-exporter stopped gracefully");
    Ok(())
}
