//! Entry point for the **hyprmover** daemon.
//!
//! Spawns the Unix-socket [`CommandSource`](hyprmover::traits::CommandSource)
//! on a background thread and processes incoming commands on the main
//! thread.
//!
//! When the `overlay-gtk` feature is enabled the main thread runs the GLib
//! main loop (GTK4 requires it) and polls the command channel from there.
//! Without the feature, a simple blocking loop is used instead.
//!
//! SIGINT, SIGTERM and SIGHUP raise a stop flag that both loops check, so
//! the runtime Hyprland binds are released before the process exits. A
//! second signal terminates immediately.

use hyprmover::autostart;
use hyprmover::command::Command;
use hyprmover::config::Config;
use hyprmover::hyprland::{HyprlandKeys, HyprlandSocket, HyprlandWm};
use hyprmover::ipc::{default_socket_path, listener::UnixSocketListener};
use hyprmover::keymap::build_modes;
use hyprmover::mode::Mode;
use hyprmover::traits::{CommandSource, HotkeyRegistrar, WindowManager};
use log::{error, info, warn};
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};

/// Resolve the config directory (`$XDG_CONFIG_HOME/hyprmover`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("hyprmover")
}

/// Try to load the config from `$XDG_CONFIG_HOME/hyprmover/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) if e.is_missing() => {
            info!("no config file at {}, using defaults", path.display());
            Config::default()
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            Config::default()
        }
    }
}

/// `hyprmover-msg` is installed next to the daemon.
fn msg_helper_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("hyprmover-msg")))
        .unwrap_or_else(|| PathBuf::from("hyprmover-msg"))
}

/// Raise the returned flag on the first termination signal; exit on the
/// second.
fn install_signal_handlers() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM, SIGHUP] {
        let registered =
            signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(&stop))
                .and_then(|_| signal_hook::flag::register(signal, Arc::clone(&stop)));
        if let Err(e) = registered {
            warn!("cannot handle signal {}: {}", signal, e);
        }
    }
    stop
}

fn install_autostart() {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            warn!("cannot resolve own executable for autostart: {}", e);
            return;
        }
    };
    if let Err(e) = autostart::install(&autostart::autostart_dir(), &exe) {
        warn!("{}", e);
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();
    if config.open_at_login {
        install_autostart();
    }

    let socket = match HyprlandSocket::from_env() {
        Ok(socket) => socket,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let wm = HyprlandWm::new(socket.clone());
    match wm.monitors() {
        Ok(m) => info!("found {} monitor(s)", m.len()),
        Err(e) => {
            error!("failed to query monitors: {}", e);
            std::process::exit(1);
        }
    }

    let keys = HyprlandKeys::new(socket, msg_helper_path());
    let modes = build_modes(&config);

    let stop = install_signal_handlers();
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_source(cmd_tx);

    start_event_loop(wm, keys, modes, cmd_rx, config, stop);
    info!("bindings released, exiting");
}

//  Event loops

#[cfg(feature = "overlay-gtk")]
fn start_event_loop<W, H>(
    wm: W,
    keys: H,
    modes: Vec<Mode>,
    cmd_rx: mpsc::Receiver<Command>,
    config: Config,
    stop: Arc<AtomicBool>,
) where
    W: WindowManager + 'static,
    H: HotkeyRegistrar + 'static,
{
    let css_path = config_dir().join("style.css");
    if let Err(e) = hyprmover::overlay::gtk::run_main_loop(
        wm,
        keys,
        modes,
        cmd_rx,
        Some(css_path),
        config.overlay,
        stop,
    ) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "overlay-gtk"))]
fn start_event_loop<W, H>(
    wm: W,
    keys: H,
    modes: Vec<Mode>,
    cmd_rx: mpsc::Receiver<Command>,
    _config: Config,
    stop: Arc<AtomicBool>,
) where
    W: WindowManager,
    H: HotkeyRegistrar,
{
    use hyprmover::coordinator::ModeCoordinator;
    use hyprmover::overlay::LogOverlay;

    let mut coordinator = ModeCoordinator::new(wm, keys, LogOverlay::new(), modes);
    if let Err(e) = coordinator.start() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("hyprmover running");
    coordinator.run(&cmd_rx, &stop);
}

//  Helpers

fn spawn_command_source(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
