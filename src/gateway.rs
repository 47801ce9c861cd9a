//! Terminate requests forwarded to the operating system.
//!
//! Fire-and-forget relative to the forest: sending a signal never touches
//! any node, and the effect (if any) becomes visible only on the next
//! refresh. PID reuse between the caller's last refresh and the request is
//! tolerated -- the signal goes to whatever the OS maps the pid to now,
//! and the OS answer is reported as-is.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, info};

use crate::error::TerminateError;

/// Sends `signal` to `pid`. Does not wait for the process to exit; signal
/// delivery is an effectively instantaneous OS-level request.
pub fn terminate(pid: u32, signal: Signal) -> Result<(), TerminateError> {
    // pid 0 would signal our own process group; never forward it.
    if pid == 0 {
        return Err(TerminateError::NoSuchProcess(0));
    }

    match kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) => {
            info!(pid, signal = %signal, "Signal sent");
            Ok(())
        }
        Err(Errno::ESRCH) => {
            debug!(pid, "Process already gone");
            Err(TerminateError::NoSuchProcess(pid))
        }
        Err(Errno::EPERM) | Err(Errno::EACCES) => Err(TerminateError::PermissionDenied(pid)),
        Err(errno) => Err(TerminateError::Other { pid, errno }),
    }
}
