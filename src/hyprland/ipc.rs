//! Direct Hyprland IPC helpers.
//!
//! Talks to Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`. Every
//! request opens a short-lived connection; no `hyprctl` process is spawned.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandError(pub(crate) String);

/// Hyprland's command socket.
#[derive(Debug, Clone)]
pub struct HyprlandSocket {
    path: PathBuf,
}

impl HyprlandSocket {
    /// Resolve the socket of the running Hyprland instance.
    ///
    /// Hyprland ≥ 0.40 stores its sockets at
    /// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
    pub fn from_env() -> Result<Self, HyprlandError> {
        let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
            .map_err(|_| HyprlandError("XDG_RUNTIME_DIR not set".into()))?;
        let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
            .map_err(|_| HyprlandError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
        Ok(Self::at(format!("{}/hypr/{}/.socket.sock", runtime_dir, his)))
    }

    /// Use the socket at `path`.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Send a raw request and return the response as a string.
    pub fn request(&self, command: &str) -> Result<String, HyprlandError> {
        let mut stream = UnixStream::connect(&self.path)
            .map_err(|e| HyprlandError(format!("connect to {}: {}", self.path.display(), e)))?;

        stream
            .write_all(command.as_bytes())
            .map_err(|e| HyprlandError(format!("write: {}", e)))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|e| HyprlandError(format!("read: {}", e)))?;

        String::from_utf8(response).map_err(|e| HyprlandError(format!("utf-8: {}", e)))
    }

    /// Send a JSON data query (`j/<query>`) and deserialize the response.
    pub fn json<T: serde::de::DeserializeOwned>(&self, query: &str) -> Result<T, HyprlandError> {
        let response = self.request(&format!("j/{}", query))?;
        serde_json::from_str(&response)
            .map_err(|e| HyprlandError(format!("parse {}: {}", query, e)))
    }

    /// Send a dispatch and check for `ok`.
    pub fn dispatch(&self, args: &str) -> Result<(), HyprlandError> {
        expect_ok("dispatch", &self.request(&format!("/dispatch {}", args))?)
    }

    /// Set a config keyword at runtime (`bind`, `unbind`, …) and check for
    /// `ok`.
    pub fn keyword(&self, args: &str) -> Result<(), HyprlandError> {
        expect_ok("keyword", &self.request(&format!("/keyword {}", args))?)
    }
}

fn expect_ok(what: &str, response: &str) -> Result<(), HyprlandError> {
    if response.trim() == "ok" {
        Ok(())
    } else {
        Err(HyprlandError(format!("{} error: {}", what, response.trim())))
    }
}
