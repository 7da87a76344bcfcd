//! **hyprmover**: keyboard-driven modal window moving and resizing.
//!
//! Pressing `super+ctrl+up` enters MOVE mode, `super+ctrl+right` enters
//! RESIZE mode. While a mode is active the arrow keys (plain, with shift,
//! alt or super) move or resize the focused window by 1, 10 or 100 pixels
//! or up to the screen edge, and a floating panel lists the bindings.
//! Escape leaves the mode.
//!
//! # Architecture
//!
//! The crate is organised around a handful of traits in [`traits`]:
//!
//! * [`traits::WindowManager`] reads and writes the focused window's frame.
//! * [`traits::HotkeyRegistrar`] grabs and releases global key chords.
//! * [`traits::Overlay`] shows the panel of the active mode.
//! * [`traits::CommandSource`] delivers hotkey events and external
//!   commands to the main loop.
//!
//! [`coordinator::ModeCoordinator`] drives the mode state machine on top of
//! them, and [`geometry`] holds the pure frame arithmetic. Concrete
//! backends live in [`hyprland`] (Hyprland IPC), [`ipc`] (Unix-socket
//! command listener) and [`overlay`].

pub mod autostart;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod geometry;
pub mod hyprland;
pub mod ipc;
pub mod keymap;
pub mod mode;
pub mod overlay;
pub mod traits;
