//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Hotkey":3}
//! {"Activate":"MOVE"}
//! "Dismiss"
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands. When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse one wire line. Blank lines yield `None`.
fn parse_line(text: &str) -> Option<Result<Command, serde_json::Error>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str(text))
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is dropped. Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            for line in BufReader::new(stream).lines() {
                let text = match line {
                    Ok(text) => text,
                    Err(e) => {
                        error!("read error: {}", e);
                        break;
                    }
                };
                match parse_line(&text) {
                    None => continue,
                    Some(Ok(cmd)) => {
                        debug!("received {:?}", cmd);
                        if sink.send(cmd).is_err() {
                            info!("sink closed, shutting down");
                            let _ = std::fs::remove_file(&self.path);
                            return Ok(());
                        }
                    }
                    Some(Err(e)) => error!("bad command {:?}: {}", text, e),
                }
            }
            debug!("client disconnected");
        }
        Ok(())
    }
}

//  Tests
