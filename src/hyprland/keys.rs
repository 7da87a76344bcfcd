//! [`HotkeyRegistrar`] implementation backed by Hyprland's runtime `bind`
//! keyword.
//!
//! Each binding becomes an `exec` bind that runs the `hyprmover-msg` helper
//! with `{"Hotkey":<id>}`, which in turn writes that command to the daemon
//! socket. Handles are allocated locally and never reused.

use super::ipc::{HyprlandError, HyprlandSocket};
use crate::command::{Command, HotkeyHandle, KeyChord, Modifier};
use crate::traits::HotkeyRegistrar;
use log::debug;
use std::collections::HashMap;

/// Hyprland-backed hotkey registrar.
#[derive(Debug)]
pub struct HyprlandKeys {
    socket: HyprlandSocket,
    /// Shell-quoted path of the message helper.
    msg_command: String,
    next: u64,
    bound: HashMap<HotkeyHandle, KeyChord>,
}

impl HyprlandKeys {
    /// `msg_path` is the `hyprmover-msg` executable Hyprland will run.
    pub fn new(socket: HyprlandSocket, msg_path: impl AsRef<std::path::Path>) -> Self {
        Self {
            socket,
            msg_command: shell_quote(&msg_path.as_ref().to_string_lossy()),
            next: 0,
            bound: HashMap::new(),
        }
    }

    /// Number of bindings this registrar currently holds.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl HotkeyRegistrar for HyprlandKeys {
    type Error = HyprlandError;

    fn bind(&mut self, chord: &KeyChord) -> Result<HotkeyHandle, Self::Error> {
        let handle = HotkeyHandle(self.next + 1);
        self.socket.keyword(&bind_args(chord, &self.msg_command, handle)?)?;
        self.next = handle.0;
        debug!("bound {} as {}", chord, handle);
        self.bound.insert(handle, chord.clone());
        Ok(handle)
    }

    fn unbind(&mut self, handle: HotkeyHandle) -> Result<(), Self::Error> {
        let Some(chord) = self.bound.remove(&handle) else {
            return Ok(());
        };
        debug!("unbinding {} ({})", chord, handle);
        self.socket.keyword(&format!("unbind {}", hypr_chord(&chord)))
    }
}

/// `bind MODS,KEY,exec,<msg> '<json>'`
fn bind_args(
    chord: &KeyChord,
    msg_command: &str,
    handle: HotkeyHandle,
) -> Result<String, HyprlandError> {
    let payload = serde_json::to_string(&Command::Hotkey(handle))
        .map_err(|e| HyprlandError(format!("encode: {}", e)))?;
    Ok(format!(
        "bind {},exec,{} {}",
        hypr_chord(chord),
        msg_command,
        shell_quote(&payload)
    ))
}

/// `MODS,KEY` as Hyprland's bind syntax expects it, e.g. `SUPER_CTRL,up`.
fn hypr_chord(chord: &KeyChord) -> String {
    let mods: Vec<&str> = chord.modifiers.iter().map(|m| modifier_name(*m)).collect();
    format!("{},{}", mods.join("_"), keysym(&chord.key))
}

fn modifier_name(m: Modifier) -> &'static str {
    match m {
        Modifier::Super => "SUPER",
        Modifier::Ctrl => "CTRL",
        Modifier::Alt => "ALT",
        Modifier::Shift => "SHIFT",
    }
}

/// Translate a key name into the xkb keysym name Hyprland matches on.
///
/// Punctuation must be spelled out: a literal `,` would split the bind.
fn keysym(key: &str) -> String {
    let name = match key {
        "=" => "equal",
        "-" => "minus",
        "," => "comma",
        "." => "period",
        "/" => "slash",
        "\\" => "backslash",
        ";" => "semicolon",
        "'" => "apostrophe",
        "`" => "grave",
        "[" => "bracketleft",
        "]" => "bracketright",
        " " | "space" => "space",
        "escape" | "esc" => "Escape",
        "return" | "enter" => "Return",
        "tab" => "Tab",
        "backspace" => "BackSpace",
        other => other,
    };
    name.to_string()
}

/// Wrap `s` in single quotes for `sh -c`.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
