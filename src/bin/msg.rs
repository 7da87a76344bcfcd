//! `hyprmover-msg`: forward one command to the running daemon.
//!
//! Hyprland `exec` binds run this helper with the JSON command as its
//! argument:
//!
//! ```text
//! hyprmover-msg '{"Hotkey":3}'
//! hyprmover-msg '{"Activate":"MOVE"}'
//! hyprmover-msg '"Dismiss"'
//! ```
//!
//! The command is validated before it is sent.

use hyprmover::command::Command;
use hyprmover::ipc::default_socket_path;
use log::{debug, error};
use std::io::Write;
use std::os::unix::net::UnixStream;

fn main() {
    env_logger::init();

    let arg = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if arg.trim().is_empty() {
        eprintln!("usage: hyprmover-msg <json-command>");
        std::process::exit(2);
    }

    let cmd: Command = match serde_json::from_str(&arg) {
        Ok(cmd) => cmd,
        Err(e) => {
            error!("invalid command {:?}: {}", arg, e);
            std::process::exit(2);
        }
    };

    if let Err(e) = send(&cmd) {
        error!("failed to reach daemon: {}", e);
        std::process::exit(1);
    }
}

fn send(cmd: &Command) -> std::io::Result<()> {
    let path = default_socket_path();
    let line = serde_json::to_string(cmd)?;
    debug!("sending {} to {}", line, path.display());
    let mut stream = UnixStream::connect(&path)?;
    writeln!(stream, "{}", line)
}
