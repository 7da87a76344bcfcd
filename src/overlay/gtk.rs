//! GTK4 + layer-shell overlay that runs on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window                 (layer-shell, transparent)
//! └ .mover-overlay       (dark rounded box, centered)
//!     └ .mover-text      (monospace label)
//! ```
//!
//! # CSS selectors
//!
//! | Selector          | Targets                               |
//! |-------------------|---------------------------------------|
//! | `window`          | The overlay window (keep transparent) |
//! | `.mover-overlay`  | Container around the text             |
//! | `.mover-text`     | The mode instructions                 |
//!
//! A user stylesheet replaces the built-in one entirely. Fade-out timing is
//! controlled by [`OverlayConfig`].

use super::Visibility;
use crate::command::{Command, MonitorInfo};
use crate::config::OverlayConfig;
use crate::coordinator::{CoordinatorError, ModeCoordinator};
use crate::mode::Mode;
use crate::traits::{HotkeyRegistrar, Overlay, WindowManager};
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use gtk4_layer_shell::LayerShell;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

const DEFAULT_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}

.mover-overlay {
    background-color: rgba(0, 0, 0, 0.75);
    border-radius: 16px;
    padding: 18px 24px;
}

.mover-text {
    font-family: monospace;
    color: rgba(255, 255, 255, 0.95);
}
"#;

/// Errors from setting up the GTK overlay.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("GTK error: {0}")]
    Gtk(String),
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

/// Layer-shell panel showing the active mode's instructions.
pub struct GtkOverlay {
    window: gtk4::Window,
    container: gtk4::Box,
    label: gtk4::Label,
    visibility: Visibility,
    fade: Duration,
}

impl GtkOverlay {
    /// Initialise GTK on the current thread and build the (hidden) panel.
    pub fn new(css_path: Option<&Path>, config: &OverlayConfig) -> Result<Self, OverlayError> {
        gtk4::init().map_err(|e| OverlayError::Gtk(e.to_string()))?;
        info!("GTK4 initialised on main thread");

        load_css(css_path, config);

        let window = gtk4::Window::new();
        window.init_layer_shell();
        window.set_layer(gtk4_layer_shell::Layer::Overlay);
        window.set_namespace("hyprmover");
        window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::None);
        window.set_decorated(false);
        window.remove_css_class("background");

        let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
        container.add_css_class("mover-overlay");
        container.set_halign(gtk4::Align::Center);
        container.set_valign(gtk4::Align::Center);

        let label = gtk4::Label::new(None);
        label.add_css_class("mover-text");
        label.set_justify(gtk4::Justification::Left);
        label.set_xalign(0.0);
        container.append(&label);
        window.set_child(Some(&container));

        // Map the Wayland surface once, then keep it hidden until needed.
        window.present();
        window.set_visible(false);

        Ok(Self {
            window,
            container,
            label,
            visibility: Visibility::Hidden,
            fade: Duration::from_millis(config.fade_out_ms),
        })
    }

    /// Advance the fade-out. Call about once per frame.
    pub fn tick(&mut self) {
        let was_fading = matches!(self.visibility, Visibility::Fading(_));
        let opacity = self.visibility.tick(Instant::now(), self.fade);
        match self.visibility {
            Visibility::Fading(_) => self.container.set_opacity(opacity),
            Visibility::Hidden if was_fading => self.conceal(),
            _ => {}
        }
    }

    fn conceal(&self) {
        self.window.set_visible(false);
        // Reset for the next show.
        self.container.set_opacity(1.0);
    }
}

impl Overlay for GtkOverlay {
    fn show(&mut self, text: &str, anchor: &MonitorInfo) {
        self.label.set_text(text);
        match gdk_monitor_for(anchor) {
            Some(monitor) => self.window.set_monitor(Some(&monitor)),
            None => warn!("no GDK monitor matches {}, using compositor default", anchor.name),
        }
        self.container.set_opacity(1.0);
        self.window.set_visible(true);
        self.window.present();
        self.visibility.show();
        debug!("overlay shown on {}", anchor.name);
    }

    fn hide(&mut self) {
        self.visibility.hide(Instant::now(), self.fade);
        if self.visibility == Visibility::Hidden {
            self.conceal();
        }
        debug!("overlay hide ({}ms fade)", self.fade.as_millis());
    }

    fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

/// Find the GDK monitor for `anchor`: by connector name, then by origin.
fn gdk_monitor_for(anchor: &MonitorInfo) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let list = display.monitors();
    let monitors: Vec<gdk::Monitor> = (0..list.n_items())
        .filter_map(|i| list.item(i).and_downcast::<gdk::Monitor>())
        .collect();

    monitors
        .iter()
        .find(|m| m.connector().is_some_and(|c| c.as_str() == anchor.name))
        .or_else(|| {
            monitors.iter().find(|m| {
                let g = m.geometry();
                g.x() == anchor.frame.x && g.y() == anchor.frame.y
            })
        })
        .cloned()
}

//  Public API

/// Build the overlay and coordinator, then run the GLib main loop on the
/// **current** (main) thread until every command source has closed or
/// `stop` is raised. Every binding is released before returning.
pub fn run_main_loop<W, H>(
    wm: W,
    keys: H,
    modes: Vec<Mode>,
    cmd_rx: mpsc::Receiver<Command>,
    css_path: Option<PathBuf>,
    config: OverlayConfig,
    stop: Arc<AtomicBool>,
) -> Result<(), OverlayError>
where
    W: WindowManager + 'static,
    H: HotkeyRegistrar + 'static,
{
    let overlay = GtkOverlay::new(css_path.as_deref(), &config)?;
    let mut coordinator = ModeCoordinator::new(wm, keys, overlay, modes);
    coordinator.start()?;

    info!(
        "overlay ready (font {}pt, fade {}ms, CSS: {})",
        config.font_size,
        config.fade_out_ms,
        css_path
            .as_ref()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in>".into()),
    );

    let main_loop = glib::MainLoop::new(None, false);
    let quit = main_loop.clone();

    // ~60 fps
    glib::timeout_add_local(Duration::from_millis(16), move || {
        let connected = coordinator.drain(&cmd_rx);
        coordinator.overlay_mut().tick();

        if !connected || stop.load(Ordering::Relaxed) {
            info!("stopping");
            coordinator.shutdown();
            quit.quit();
            return glib::ControlFlow::Break;
        }
        glib::ControlFlow::Continue
    });

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
    Ok(())
}

//  CSS loading

fn load_css(css_path: Option<&Path>, config: &OverlayConfig) {
    let provider = gtk4::CssProvider::new();

    let builtin = || {
        format!(
            "{}\n.mover-text {{ font-size: {}pt; }}\n",
            DEFAULT_CSS, config.font_size
        )
    };
    let css_content = match css_path.filter(|p| p.exists()) {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(content) => {
                info!("user CSS: {} ({} bytes)", p.display(), content.len());
                content
            }
            Err(e) => {
                warn!("CSS read failed ({}): {}, using built-in", p.display(), e);
                builtin()
            }
        },
        None => {
            info!("no user CSS, using built-in default");
            builtin()
        }
    };

    #[allow(deprecated)]
    provider.load_from_data(&css_content);

    if let Some(display) = gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
        info!("CSS registered on display");
    } else {
        warn!("no GDK display, CSS will not be applied");
    }
}
