//! Core traits that decouple hyprmover from any specific window manager,
//! hotkey mechanism, overlay toolkit or transport.
//!
//! Every concrete backend (Hyprland, a GTK overlay, a Unix-socket listener,
//! a test harness, …) implements one of these traits. The
//! [`ModeCoordinator`](crate::coordinator::ModeCoordinator) only depends on
//! these abstractions.

use crate::command::{Command, HotkeyHandle, KeyChord, MonitorInfo, WindowInfo};
use crate::geometry::{Frame, Point, Size};
use std::sync::mpsc;

/// Abstraction over a window manager that can report the focused window and
/// move or resize it.
///
/// An implementation might talk to Hyprland via IPC, or it might be a
/// recording stub used in tests.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Return the list of monitors the window manager knows about.
    fn monitors(&self) -> Result<Vec<MonitorInfo>, Self::Error>;

    /// Return the name of the currently focused monitor, or `None` if no
    /// monitor is focused. Used as the "main" screen when no window has
    /// focus.
    fn active_monitor(&self) -> Result<Option<String>, Self::Error>;

    /// Return information about the currently focused window, or `None` if
    /// no window is focused.
    fn active_window(&self) -> Result<Option<WindowInfo>, Self::Error>;

    /// Move and resize `window` in one go.
    fn set_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), Self::Error>;

    /// Move `window` so its top-left corner lands on `point`.
    fn set_top_left(&self, window: &WindowInfo, point: Point) -> Result<(), Self::Error>;

    /// Resize `window`, keeping its top-left corner.
    fn set_size(&self, window: &WindowInfo, size: Size) -> Result<(), Self::Error>;

    /// Use the window manager's own maximize.
    fn maximize(&self, window: &WindowInfo) -> Result<(), Self::Error>;
}

/// Registers global hotkeys with the host.
///
/// When a bound chord is pressed the host must eventually deliver
/// [`Command::Hotkey`] carrying the handle returned by [`bind`] to the
/// daemon, typically through a [`CommandSource`].
///
/// [`bind`]: HotkeyRegistrar::bind
pub trait HotkeyRegistrar {
    /// The error type produced by this registrar.
    type Error: std::error::Error + Send + 'static;

    /// Grab `chord` globally and return a handle identifying the binding.
    fn bind(&mut self, chord: &KeyChord) -> Result<HotkeyHandle, Self::Error>;

    /// Release a binding. Unknown handles are not an error.
    fn unbind(&mut self, handle: HotkeyHandle) -> Result<(), Self::Error>;
}

/// The floating text panel shown while a mode is active.
///
/// Implementations never fail loudly: if the panel cannot be shown (no
/// display, no matching monitor) they log and carry on.
pub trait Overlay {
    /// Show `text` centered on `anchor`, replacing whatever was shown.
    fn show(&mut self, text: &str, anchor: &MonitorInfo);

    /// Hide the panel. Hiding a hidden panel is a no-op.
    fn hide(&mut self);

    fn is_visible(&self) -> bool;
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, …) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    ///
    /// This method blocks the calling thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    //  Mock HotkeyRegistrar

    #[derive(Debug, Default)]
    struct MockKeys {
        next: u64,
        bound: BTreeMap<HotkeyHandle, KeyChord>,
    }

    impl HotkeyRegistrar for MockKeys {
        type Error = MockError;

        fn bind(&mut self, chord: &KeyChord) -> Result<HotkeyHandle, MockError> {
            self.next += 1;
            let handle = HotkeyHandle(self.next);
            self.bound.insert(handle, chord.clone());
            Ok(handle)
        }

        fn unbind(&mut self, handle: HotkeyHandle) -> Result<(), MockError> {
            self.bound.remove(&handle);
            Ok(())
        }
    }

    #[test]
    fn mock_keys_issue_distinct_handles() {
        let mut keys = MockKeys::default();
        let a = keys.bind(&KeyChord::bare("up")).unwrap();
        let b = keys.bind(&KeyChord::bare("up")).unwrap();
        assert_ne!(a, b);
        keys.unbind(a).unwrap();
        keys.unbind(a).unwrap();
        assert_eq!(keys.bound.len(), 1);
        assert_eq!(keys.bound[&b], KeyChord::bare("up"));
    }

    //  Mock CommandSource

    /// A test double that emits a fixed sequence of commands.
    struct MockSource {
        commands: Vec<Command>,
    }

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let _ = sink.send(cmd);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_commands() {
        let mut src = MockSource {
            commands: vec![
                Command::Activate("MOVE".into()),
                Command::Hotkey(HotkeyHandle(4)),
                Command::Dismiss,
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0], Command::Activate("MOVE".into()));
        assert_eq!(cmds[1], Command::Hotkey(HotkeyHandle(4)));
        assert_eq!(cmds[2], Command::Dismiss);
    }
}
