//! Hyprland-specific implementations.
//!
//! This module provides concrete backends for the
//! [`WindowManager`](crate::traits::WindowManager) and
//! [`HotkeyRegistrar`](crate::traits::HotkeyRegistrar) traits, powered by
//! Hyprland's IPC socket.
//!
//! Nothing outside this module should reference Hyprland directly.

pub mod ipc;
pub mod keys;
pub mod wm;

pub use ipc::{HyprlandError, HyprlandSocket};
pub use keys::HyprlandKeys;
pub use wm::HyprlandWm;
