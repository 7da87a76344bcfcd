//! Overlay demo: cycles through the MOVE and RESIZE panels with a fade-out
//! in between, using the same CSS-styleable widget as the daemon.
//!
//! Run with:
//!     cargo run --bin hyprmover-test-overlay
//!
//! Press Ctrl-C to quit.

use hyprmover::command::MonitorInfo;
use hyprmover::config::{Config, OverlayConfig};
use hyprmover::geometry::Frame;
use hyprmover::keymap::build_modes;
use hyprmover::overlay::gtk::GtkOverlay;
use hyprmover::traits::Overlay;
use gtk4::glib;
use log::{error, info};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Milliseconds between each step.
const STEP_MS: u64 = 1500;

fn main() {
    env_logger::init();

    let config = OverlayConfig {
        fade_out_ms: 300,
        ..OverlayConfig::default()
    };
    let overlay = match GtkOverlay::new(None, &config) {
        Ok(o) => Rc::new(RefCell::new(o)),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let texts: Vec<String> = build_modes(&Config::default())
        .iter()
        .map(|m| m.overlay_text().to_string())
        .collect();
    // Matches the first GDK monitor by origin.
    let anchor = MonitorInfo {
        name: String::new(),
        frame: Frame::new(0, 0, 0, 0),
        visible_frame: Frame::new(0, 0, 0, 0),
    };

    {
        let overlay = overlay.clone();
        let mut step = 0usize;
        glib::timeout_add_local(Duration::from_millis(STEP_MS), move || {
            let mut overlay = overlay.borrow_mut();
            if step % 2 == 0 {
                let text = &texts[(step / 2) % texts.len()];
                info!("show {}", text.lines().next().unwrap_or_default());
                overlay.show(text, &anchor);
            } else {
                info!("hide");
                overlay.hide();
            }
            step += 1;
            glib::ControlFlow::Continue
        });
    }

    glib::timeout_add_local(Duration::from_millis(16), move || {
        overlay.borrow_mut().tick();
        glib::ControlFlow::Continue
    });

    glib::MainLoop::new(None, false).run();
}
