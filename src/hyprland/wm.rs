//! [`WindowManager`] implementation backed by Hyprland IPC.

use super::ipc::{HyprlandError, HyprlandSocket};
use crate::command::{MonitorInfo, WindowInfo};
use crate::geometry::{Frame, Point, Size};
use crate::traits::WindowManager;
use log::debug;
use serde::Deserialize;

/// Hyprland-backed window accessor.
///
/// No connection is opened eagerly; each method call opens a short-lived
/// IPC request.
#[derive(Debug, Clone)]
pub struct HyprlandWm {
    socket: HyprlandSocket,
}

impl HyprlandWm {
    pub fn new(socket: HyprlandSocket) -> Self {
        Self { socket }
    }

    /// Tiled windows ignore pixel moves, so float them first.
    fn ensure_floating(&self, window: &WindowInfo) -> Result<(), HyprlandError> {
        if window.floating {
            return Ok(());
        }
        debug!("floating {}", window.address);
        self.socket.dispatch(&format!("setfloating address:{}", window.address))
    }

    fn move_to(&self, window: &WindowInfo, point: Point) -> Result<(), HyprlandError> {
        self.socket.dispatch(&format!(
            "movewindowpixel exact {} {},address:{}",
            point.x, point.y, window.address
        ))
    }

    fn resize_to(&self, window: &WindowInfo, size: Size) -> Result<(), HyprlandError> {
        self.socket.dispatch(&format!(
            "resizewindowpixel exact {} {},address:{}",
            size.width, size.height, window.address
        ))
    }
}

//  Minimal serde structs for the JSON we care about

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Debug, Deserialize)]
struct MonitorJson {
    id: i64,
    name: String,
    /// Physical pixels.
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    #[serde(default = "one")]
    scale: f64,
    /// `[left, top, right, bottom]` taken by bars and docks.
    #[serde(default)]
    reserved: [i32; 4],
    #[serde(default)]
    focused: bool,
    /// `wl_output` transform; odd values are rotated by 90° or 270°.
    #[serde(default)]
    transform: u8,
}

fn one() -> f64 {
    1.0
}

impl MonitorJson {
    fn info(&self) -> MonitorInfo {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        let (width, height) = if self.transform % 2 == 1 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        let frame = Frame::new(
            self.x,
            self.y,
            (f64::from(width) / scale).round() as i32,
            (f64::from(height) / scale).round() as i32,
        );
        MonitorInfo {
            name: self.name.clone(),
            frame,
            visible_frame: frame.inset(self.reserved),
        }
    }
}

/// Subset of the JSON object returned by `j/activewindow`.
#[derive(Debug, Deserialize)]
struct ActiveWindowJson {
    address: String,
    #[serde(default)]
    title: String,
    monitor: i64,
    at: [i32; 2],
    size: [i32; 2],
    #[serde(default)]
    floating: bool,
    #[serde(default)]
    fullscreen: FullscreenJson,
}

/// `fullscreen` is a bool before Hyprland 0.42 and a mode number
/// (0 none, 1 maximized, 2 fullscreen) since.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum FullscreenJson {
    Flag(bool),
    Mode(u8),
}

impl Default for FullscreenJson {
    fn default() -> Self {
        FullscreenJson::Mode(0)
    }
}

impl FullscreenJson {
    fn is_set(self) -> bool {
        match self {
            FullscreenJson::Flag(on) => on,
            FullscreenJson::Mode(mode) => mode != 0,
        }
    }
}

/// Hyprland answers `{}` when nothing is focused.
fn parse_active_window(json: &str) -> Result<Option<ActiveWindowJson>, HyprlandError> {
    if json.trim() == "{}" || json.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(json)
        .map(Some)
        .map_err(|e| HyprlandError(format!("parse activewindow: {}", e)))
}

fn window_info(w: ActiveWindowJson, monitors: &[MonitorJson]) -> WindowInfo {
    let monitor = monitors
        .iter()
        .find(|m| m.id == w.monitor)
        .map(|m| m.name.clone())
        .unwrap_or_default();
    WindowInfo {
        address: w.address,
        title: w.title,
        monitor,
        frame: Frame::new(w.at[0], w.at[1], w.size[0], w.size[1]),
        floating: w.floating,
        maximized: w.fullscreen.is_set(),
    }
}

/// Dispatches that maximize `window`. `fullscreen 1` toggles, so nothing is
/// sent for a window that already fills the screen.
fn maximize_dispatches(window: &WindowInfo) -> Vec<String> {
    if window.maximized {
        return Vec::new();
    }
    vec![
        format!("focuswindow address:{}", window.address),
        "fullscreen 1".to_string(),
    ]
}

//  WindowManager implementation

impl WindowManager for HyprlandWm {
    type Error = HyprlandError;

    fn monitors(&self) -> Result<Vec<MonitorInfo>, Self::Error> {
        let monitors: Vec<MonitorJson> = self.socket.json("monitors")?;
        Ok(monitors.iter().map(MonitorJson::info).collect())
    }

    fn active_monitor(&self) -> Result<Option<String>, Self::Error> {
        let monitors: Vec<MonitorJson> = self.socket.json("monitors")?;
        Ok(monitors.into_iter().find(|m| m.focused).map(|m| m.name))
    }

    fn active_window(&self) -> Result<Option<WindowInfo>, Self::Error> {
        let Some(window) = parse_active_window(&self.socket.request("j/activewindow")?)? else {
            return Ok(None);
        };
        let monitors: Vec<MonitorJson> = self.socket.json("monitors")?;
        Ok(Some(window_info(window, &monitors)))
    }

    fn set_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), Self::Error> {
        self.ensure_floating(window)?;
        self.resize_to(window, frame.size())?;
        self.move_to(window, frame.top_left())
    }

    fn set_top_left(&self, window: &WindowInfo, point: Point) -> Result<(), Self::Error> {
        self.ensure_floating(window)?;
        self.move_to(window, point)
    }

    fn set_size(&self, window: &WindowInfo, size: Size) -> Result<(), Self::Error> {
        self.ensure_floating(window)?;
        self.resize_to(window, size)
    }

    fn maximize(&self, window: &WindowInfo) -> Result<(), Self::Error> {
        let dispatches = maximize_dispatches(window);
        if dispatches.is_empty() {
            debug!("{} is already maximized", window.address);
        }
        for args in dispatches {
            self.socket.dispatch(&args)?;
        }
        Ok(())
    }
}
