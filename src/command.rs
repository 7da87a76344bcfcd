//! Commands and types used throughout hyprmover.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every event the daemon reacts to, [`Action`]
//! describes every geometry operation a sub-action can perform, and
//! [`Direction`] / [`Modifier`] / [`KeyChord`] / [`MonitorInfo`] /
//! [`WindowInfo`] provide the supporting data types.
//!
//! Direction and modifier strings are parsed leniently (case-insensitive,
//! with the usual aliases such as `"cmd"` for [`Modifier::Super`]) so that
//! config files written for other platforms keep working.

use crate::geometry::{Frame, Point};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Cardinal direction for moves, resizes and edge snaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All four directions, in the order sub-actions are registered.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// The key name of the arrow key for this direction.
    pub fn arrow_key(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arrow_key())
    }
}

/// Parse a direction string (case-insensitive; accepts "right", "Right", " UP ").
fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// A keyboard modifier.
///
/// The derived ordering is the canonical order used when normalizing a
/// [`KeyChord`] and when rendering it for the hotkey backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Modifier {
    /// The logo key (`cmd` on a Mac keyboard). The primary modifier.
    Super,
    Ctrl,
    Alt,
    Shift,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Super => write!(f, "super"),
            Modifier::Ctrl => write!(f, "ctrl"),
            Modifier::Alt => write!(f, "alt"),
            Modifier::Shift => write!(f, "shift"),
        }
    }
}

/// Parse a modifier name, accepting the common aliases.
fn parse_modifier(s: &str) -> Option<Modifier> {
    match s.trim().to_lowercase().as_str() {
        "super" | "cmd" | "command" | "meta" | "win" | "logo" | "mod4" => Some(Modifier::Super),
        "ctrl" | "control" => Some(Modifier::Ctrl),
        "alt" | "option" | "opt" | "mod1" => Some(Modifier::Alt),
        "shift" => Some(Modifier::Shift),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_modifier(&s).ok_or_else(|| DeError::custom(format!("invalid modifier: {:?}", s)))
    }
}

/// A key plus the exact set of modifiers that must be held.
///
/// Modifiers are kept sorted and deduplicated so that two chords describing
/// the same physical combination compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeyChord {
    pub key: String,
    pub modifiers: Vec<Modifier>,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        let mut modifiers: Vec<Modifier> = modifiers.into_iter().collect();
        modifiers.sort();
        modifiers.dedup();
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// A chord with no modifiers.
    pub fn bare(key: impl Into<String>) -> Self {
        Self::new(key, [])
    }

    /// The chord that dismisses an active mode.
    pub fn escape() -> Self {
        Self::bare("escape")
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}+", m)?;
        }
        f.write_str(&self.key)
    }
}

/// Magnitude tier of a directional sub-action, selected by which modifier
/// is held together with the arrow key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// No modifier: 1 pixel.
    Fine,
    /// Shift: 10 pixels.
    Coarse,
    /// Alt: 100 pixels.
    Large,
    /// Super: snap to the screen edge instead of a fixed increment.
    Edge,
}

pub const INCREMENT_LOW: i32 = 1;
pub const INCREMENT_MID: i32 = 10;
pub const INCREMENT_HIGH: i32 = 100;

impl Step {
    pub const ALL: [Step; 4] = [Step::Fine, Step::Coarse, Step::Large, Step::Edge];

    /// Modifiers that select this tier.
    pub fn modifiers(self) -> Vec<Modifier> {
        match self {
            Step::Fine => vec![],
            Step::Coarse => vec![Modifier::Shift],
            Step::Large => vec![Modifier::Alt],
            Step::Edge => vec![Modifier::Super],
        }
    }

    /// Fixed increment in pixels, or `None` for the edge-snap tier.
    pub fn amount(self) -> Option<i32> {
        match self {
            Step::Fine => Some(INCREMENT_LOW),
            Step::Coarse => Some(INCREMENT_MID),
            Step::Large => Some(INCREMENT_HIGH),
            Step::Edge => None,
        }
    }
}

/// A geometry operation bound to a sub-action.
///
/// Actions are plain data; [`geometry::interpret`](crate::geometry::interpret)
/// turns one into a [`Mutation`](crate::geometry::Mutation) for the focused
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Translate the window by `amount` pixels.
    Move { direction: Direction, amount: i32 },
    /// Slide the window until its edge touches the screen edge.
    MoveToEdge(Direction),
    /// Grow (`Right`/`Down`) or shrink (`Left`/`Up`) the window, anchored at
    /// its top-left corner.
    Resize { edge: Direction, amount: i32 },
    /// Stretch the window until its far edge meets the screen edge.
    ResizeToEdge(Direction),
    /// Native maximize of the host window manager.
    Maximize,
    /// Center the window within the screen's visible area.
    Center,
    /// Fill the left half of the screen.
    HalfLeft,
    /// Set the window to a literal frame.
    ApplyPreset(Frame),
    /// Move the window's top-left corner to a literal point.
    PlaceAt(Point),
}

impl Action {
    /// The directional action for `step` in the given mode kind.
    pub fn directional(kind: ModeKind, direction: Direction, step: Step) -> Action {
        match (kind, step.amount()) {
            (ModeKind::Move, Some(amount)) => Action::Move { direction, amount },
            (ModeKind::Move, None) => Action::MoveToEdge(direction),
            (ModeKind::Resize, Some(amount)) => Action::Resize {
                edge: direction,
                amount,
            },
            (ModeKind::Resize, None) => Action::ResizeToEdge(direction),
        }
    }
}

/// The two built-in mode flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Move,
    Resize,
}

/// Opaque id of a hotkey registered with a
/// [`HotkeyRegistrar`](crate::traits::HotkeyRegistrar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotkeyHandle(pub u64);

impl fmt::Display for HotkeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every event the [`ModeCoordinator`](crate::coordinator::ModeCoordinator)
/// reacts to.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations. On the wire they are encoded as JSON, one per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A previously bound hotkey fired.
    Hotkey(HotkeyHandle),

    /// Activate the mode with the given name (e.g. `"MOVE"`), exactly as if
    /// its activation chord had been pressed.
    Activate(String),

    /// Deactivate whichever mode is active, as if escape had been pressed.
    Dismiss,
}

/// Static information about a monitor known to the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Unique name the window manager uses for this monitor (e.g. `"DP-1"`).
    pub name: String,
    /// Full bounds in layout coordinates.
    pub frame: Frame,
    /// Bounds minus areas reserved by bars and docks.
    pub visible_frame: Frame,
}

/// Minimal information about the currently focused window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Window manager address / id.
    pub address: String,
    /// Human-readable title.
    pub title: String,
    /// Name of the monitor the window is on (e.g. `"DP-1"`).
    pub monitor: String,
    /// Current position and size.
    pub frame: Frame,
    /// Whether the window is floating (free to move and resize).
    pub floating: bool,
    /// Whether the window already fills its monitor (maximized or
    /// fullscreen).
    pub maximized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Left.to_string(), "left");
        assert_eq!(Direction::Right.to_string(), "right");
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Down.to_string(), "down");
    }

    #[test]
    fn direction_deserializes_case_insensitively() {
        let d: Direction = serde_json::from_str(r#"" UP ""#).unwrap();
        assert_eq!(d, Direction::Up);
        let d: Direction = serde_json::from_str(r#""Right""#).unwrap();
        assert_eq!(d, Direction::Right);
        assert!(serde_json::from_str::<Direction>(r#""up-left""#).is_err());
    }

    #[test]
    fn opposite_is_an_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn modifier_aliases() {
        let mods: Vec<Modifier> =
            serde_json::from_str(r#"["cmd", "Control", "option", "SHIFT", "super"]"#).unwrap();
        assert_eq!(
            mods,
            vec![
                Modifier::Super,
                Modifier::Ctrl,
                Modifier::Alt,
                Modifier::Shift,
                Modifier::Super
            ]
        );
        assert!(serde_json::from_str::<Modifier>(r#""hyper""#).is_err());
    }

    #[test]
    fn key_chord_normalizes_modifiers() {
        let a = KeyChord::new("up", [Modifier::Ctrl, Modifier::Super, Modifier::Ctrl]);
        let b = KeyChord::new("up", [Modifier::Super, Modifier::Ctrl]);
        assert_eq!(a, b);
        assert_eq!(a.modifiers, vec![Modifier::Super, Modifier::Ctrl]);
        assert_eq!(a.to_string(), "super+ctrl+up");
        assert_eq!(KeyChord::escape().to_string(), "escape");
    }

    #[test]
    fn step_tiers() {
        assert_eq!(Step::Fine.amount(), Some(1));
        assert_eq!(Step::Coarse.amount(), Some(10));
        assert_eq!(Step::Large.amount(), Some(100));
        assert_eq!(Step::Edge.amount(), None);
        assert!(Step::Fine.modifiers().is_empty());
        assert_eq!(Step::Edge.modifiers(), vec![Modifier::Super]);
    }

    #[test]
    fn directional_actions() {
        assert_eq!(
            Action::directional(ModeKind::Move, Direction::Left, Step::Coarse),
            Action::Move {
                direction: Direction::Left,
                amount: 10
            }
        );
        assert_eq!(
            Action::directional(ModeKind::Resize, Direction::Down, Step::Edge),
            Action::ResizeToEdge(Direction::Down)
        );
    }

    #[test]
    fn command_wire_format() {
        let cmd: Command = serde_json::from_str(r#"{"Hotkey":7}"#).unwrap();
        assert_eq!(cmd, Command::Hotkey(HotkeyHandle(7)));
        let cmd: Command = serde_json::from_str(r#"{"Activate":"MOVE"}"#).unwrap();
        assert_eq!(cmd, Command::Activate("MOVE".into()));
        let cmd: Command = serde_json::from_str(r#""Dismiss""#).unwrap();
        assert_eq!(cmd, Command::Dismiss);
        assert_eq!(
            serde_json::to_string(&Command::Hotkey(HotkeyHandle(3))).unwrap(),
            r#"{"Hotkey":3}"#
        );
    }
}
