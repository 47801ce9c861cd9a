//! `kill` subcommand: send a termination signal to one pid.

use nix::sys::signal::Signal;

use ptree_exporter::gateway;

pub fn command_kill(pid: u32, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let signal = if force {
        Signal::SIGKILL
    } else {
        Signal::SIGTERM
    };

    match gateway::terminate(pid, signal) {
        Ok(()) => {
            println!("Sent {signal} to pid {pid}");
            Ok(())
        }
        Err(e) => {
            // NoSuchProcess included: the pid may have exited in between,
            // and that is still a failed request from the caller's side.
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
