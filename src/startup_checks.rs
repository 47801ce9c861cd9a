//! Startup requirement validation for ptree-exporter.
//!
//! Validates that the exporter can enumerate processes before it starts
//! serving, and warns about reduced capability when not running as root.

use nix::unistd::geteuid;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(proc_root: &Path) -> Result<(), ValidationError> {
    info!("Validating runtime requirements...");

    check_user_privileges();
    check_proc_access(proc_root)?;

    info!("All runtime requirements validated");
    Ok(())
}

/// Warn when not running as root; signals to other users' processes and
/// some /proc details will be unavailable.
fn check_user_privileges() {
    if !geteuid().is_root() {
        warn!("Not running as root - kill requests against other users' processes will be denied");
    } else {
        info!("Running as root (uid=0)");
    }
}

/// Check that the proc root can be enumerated at all.
fn check_proc_access(proc_root: &Path) -> Result<(), ValidationError> {
    match fs::read_dir(proc_root) {
        Ok(_) => {
            info!("Process enumeration available at {}", proc_root.display());
            Ok(())
        }
        Err(e) => Err(ValidationError::ProcUnreadable {
            path: proc_root.display().to_string(),
            detail: e.to_string(),
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("cannot enumerate processes at {path}: {detail}")]
    ProcUnreadable { path: String, detail: String },
}
