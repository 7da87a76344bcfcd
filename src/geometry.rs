//! Pure window geometry.
//!
//! Every function here maps a window frame (and, where needed, the frames
//! of the screen the window lives on) to a new frame. Nothing in this module
//! talks to a window manager; [`interpret`] is the single entry point the
//! [`ModeCoordinator`](crate::coordinator::ModeCoordinator) uses to turn an
//! [`Action`] into a [`Mutation`] it can apply.
//!
//! Arithmetic is exact: shrinking a window past zero yields a negative size
//! here, so that increment operations stay exact inverses of each other.
//! Clamping happens when a frame is written back (see [`Frame::clamped`]).

use crate::command::{Action, Direction};

/// A point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Same size with negative dimensions clamped to zero.
    pub fn clamped(self) -> Size {
        Size {
            width: self.width.max(0),
            height: self.height.max(0),
        }
    }
}

/// Position plus size of a window or a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Same frame with negative dimensions clamped to zero.
    pub fn clamped(self) -> Frame {
        Frame {
            width: self.width.max(0),
            height: self.height.max(0),
            ..self
        }
    }

    /// Shrink by reserved margins `[left, top, right, bottom]`.
    pub fn inset(&self, reserved: [i32; 4]) -> Frame {
        let [left, top, right, bottom] = reserved;
        Frame {
            x: self.x + left,
            y: self.y + top,
            width: self.width - left - right,
            height: self.height - top - bottom,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// The two frames of the screen a window lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenFrames {
    /// Full screen bounds.
    pub frame: Frame,
    /// Bounds minus reserved system chrome (bars, docks).
    pub visible: Frame,
}

/// What the window manager has to do to the focused window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    SetFrame(Frame),
    SetTopLeft(Point),
    SetSize(Size),
    Maximize,
}

/// Grow or shrink the window, anchored at its top-left corner.
///
/// `Right` and `Down` grow, `Left` and `Up` shrink.
pub fn resize_by(window: Frame, amount: i32, edge: Direction) -> Frame {
    let mut f = window;
    match edge {
        Direction::Right => f.width += amount,
        Direction::Left => f.width -= amount,
        Direction::Down => f.height += amount,
        Direction::Up => f.height -= amount,
    }
    f
}

/// Stretch the window so that its edge in `edge` direction meets the
/// matching screen edge while the opposite edge stays put.
pub fn resize_to_edge(window: Frame, screen: &ScreenFrames, edge: Direction) -> Frame {
    let s = screen.frame;
    let mut f = window;
    match edge {
        Direction::Right => {
            f.width = s.width - (s.x - window.x).abs();
        }
        Direction::Left => {
            f.width = (s.x - window.x).abs() + window.width;
            f.x = s.x;
        }
        Direction::Up => {
            // Visible frame, so the window stops below a top bar.
            let v = screen.visible;
            f.height = (v.y - window.y).abs() + window.height;
            f.y = v.y;
        }
        Direction::Down => {
            f.height = s.height - (s.y - window.y).abs();
        }
    }
    f
}

/// Translate the window by `amount` pixels.
pub fn move_by(window: Frame, amount: i32, direction: Direction) -> Frame {
    let mut f = window;
    match direction {
        Direction::Right => f.x += amount,
        Direction::Left => f.x -= amount,
        Direction::Down => f.y += amount,
        Direction::Up => f.y -= amount,
    }
    f
}

/// Slide the window until its edge touches the screen edge. Size is kept.
pub fn move_to_edge(window: Frame, screen: &ScreenFrames, direction: Direction) -> Frame {
    let s = screen.frame;
    let mut f = window;
    match direction {
        Direction::Right => f.x = s.x + s.width - window.width,
        Direction::Left => f.x = s.x,
        Direction::Up => f.y = s.y,
        Direction::Down => f.y = s.y + s.height - window.height,
    }
    f
}

/// Center the window within `visible`, truncating toward zero.
pub fn center(window: Frame, visible: Frame) -> Frame {
    Frame {
        x: visible.x + (visible.width - window.width) / 2,
        y: visible.y + (visible.height - window.height) / 2,
        ..window
    }
}

/// The left half of the screen, regardless of where the window is.
pub fn half_left(screen: Frame) -> Frame {
    Frame {
        x: screen.x,
        y: screen.y,
        width: screen.width / 2,
        height: screen.height,
    }
}

/// A preset frame is applied verbatim.
pub fn apply_preset(preset: Frame) -> Frame {
    preset
}

/// Turn an [`Action`] into the [`Mutation`] to apply to `window`.
///
/// Fixed-increment moves only touch the origin and fixed-increment resizes
/// only touch the size, so those produce the narrower mutations.
pub fn interpret(action: &Action, window: Frame, screen: &ScreenFrames) -> Mutation {
    match *action {
        Action::Move { direction, amount } => {
            Mutation::SetTopLeft(move_by(window, amount, direction).top_left())
        }
        Action::MoveToEdge(direction) => {
            Mutation::SetTopLeft(move_to_edge(window, screen, direction).top_left())
        }
        Action::Resize { edge, amount } => Mutation::SetSize(resize_by(window, amount, edge).size()),
        Action::ResizeToEdge(edge) => Mutation::SetFrame(resize_to_edge(window, screen, edge)),
        Action::Maximize => Mutation::Maximize,
        Action::Center => Mutation::SetTopLeft(center(window, screen.visible).top_left()),
        Action::HalfLeft => Mutation::SetFrame(half_left(screen.frame)),
        Action::ApplyPreset(frame) => Mutation::SetFrame(apply_preset(frame)),
        Action::PlaceAt(point) => Mutation::SetTopLeft(point),
    }
}
