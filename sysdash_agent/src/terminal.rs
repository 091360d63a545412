//! Best-effort launch of the platform's terminal emulator.

use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::platform::Platform;

pub type Launch = (&'static str, &'static [&'static str]);

const DARWIN: &[Launch] = &[("open", &["-a", "Terminal", "."])];
const WINDOWS: &[Launch] = &[("cmd", &["/C", "start", "cmd.exe"])];
const LINUX: &[Launch] = &[
    ("gnome-terminal", &[]),
    ("konsole", &[]),
    ("xterm", &[]),
    ("terminator", &[]),
    ("urxvt", &[]),
];

/// Candidate launch commands, tried in order.
pub fn launch_candidates(platform: Platform) -> &'static [Launch] {
    match platform {
        Platform::Darwin => DARWIN,
        Platform::Windows => WINDOWS,
        Platform::Linux => LINUX,
    }
}

/// Spawn the first candidate that starts. The emulator is left running
/// detached; tokio reaps it once it exits.
pub fn open_terminal(platform: Platform) -> io::Result<&'static str> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no terminal emulator found");
    for &(program, args) in launch_candidates(platform) {
        match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_child) => {
                info!(%program, "terminal launched");
                return Ok(program);
            }
            Err(e) => {
                debug!(%program, error = %e, "terminal candidate failed");
                last_err = e;
            }
        }
    }
    Err(last_err)
}
