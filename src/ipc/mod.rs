//! IPC listener that accepts commands over a Unix socket.
//!
//! Hyprland `exec` binds (through `hyprmover-msg`) and external scripts
//! connect to the socket and send newline-delimited JSON commands.

pub mod listener;

use std::path::PathBuf;

/// `$XDG_RUNTIME_DIR/hyprmover.sock`, or `/tmp/hyprmover.sock` when the
/// runtime dir is unset.
pub fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("hyprmover.sock")
}
