//! Overlay implementations for the mode panel.
//!
//! [`LogOverlay`] is always available and only logs. When the
//! `overlay-gtk` feature is enabled, [`gtk::GtkOverlay`] renders a
//! layer-shell panel and [`gtk::run_main_loop`] takes over the main thread,
//! driving both command processing and the panel through the GLib main
//! loop.

#[cfg(feature = "overlay-gtk")]
pub mod gtk;

use crate::command::MonitorInfo;
use crate::traits::Overlay;
use log::info;
use std::time::{Duration, Instant};

/// Overlay that writes the panel text to the log instead of drawing it.
///
/// Used by the plain event loop when the daemon is built without GTK.
#[derive(Debug, Default)]
pub struct LogOverlay {
    shown: Option<String>,
}

impl LogOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown, if any.
    pub fn text(&self) -> Option<&str> {
        self.shown.as_deref()
    }
}

impl Overlay for LogOverlay {
    fn show(&mut self, text: &str, anchor: &MonitorInfo) {
        info!("overlay on {}:\n{}", anchor.name, text);
        self.shown = Some(text.to_string());
    }

    fn hide(&mut self) {
        if self.shown.take().is_some() {
            info!("overlay hidden");
        }
    }

    fn is_visible(&self) -> bool {
        self.shown.is_some()
    }
}

/// Show → fade-out → hidden lifecycle of a drawn panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    /// Fully opaque.
    Visible,
    /// Opacity is being animated from 1 → 0.
    Fading(Instant),
}

impl Visibility {
    pub fn show(&mut self) {
        *self = Visibility::Visible;
    }

    /// Start fading out, or hide at once when `fade` is zero.
    pub fn hide(&mut self, now: Instant, fade: Duration) {
        if *self == Visibility::Visible {
            *self = if fade.is_zero() {
                Visibility::Hidden
            } else {
                Visibility::Fading(now)
            };
        }
    }

    /// Opacity at `now`. A finished fade moves to `Hidden`.
    pub fn tick(&mut self, now: Instant, fade: Duration) -> f64 {
        match *self {
            Visibility::Hidden => 0.0,
            Visibility::Visible => 1.0,
            Visibility::Fading(since) => {
                let t = if fade.is_zero() {
                    1.0
                } else {
                    (now.saturating_duration_since(since).as_secs_f64() / fade.as_secs_f64())
                        .min(1.0)
                };
                if t >= 1.0 {
                    *self = Visibility::Hidden;
                    0.0
                } else {
                    1.0 - t
                }
            }
        }
    }
}
