//! The mode state machine that ties modes, the window manager, the hotkey
//! registrar and the overlay together.
//!
//! [`ModeCoordinator`] owns every [`Mode`] and is the only place that
//! activates or deactivates one. It reacts to [`Command`]s by resolving
//! hotkey handles to their targets and by issuing calls to the
//! [`WindowManager`], [`HotkeyRegistrar`] and [`Overlay`] traits.
//!
//! At most one mode is active at any time: activating a mode first
//! deactivates every other mode, releasing its hotkeys and hiding the
//! overlay.

use crate::command::{Command, HotkeyHandle, KeyChord, MonitorInfo};
use crate::geometry::{self, Mutation, ScreenFrames};
use crate::mode::{ActiveBindingSet, Mode};
use crate::traits::{HotkeyRegistrar, Overlay, WindowManager};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

/// How often [`ModeCoordinator::run`] checks its stop flag.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Possible errors from the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// The window manager returned an error.
    #[error("window manager error: {0}")]
    WindowManager(String),
    /// The hotkey registrar returned an error.
    #[error("hotkey error: {0}")]
    Hotkey(String),
    /// `Activate` named a mode that does not exist.
    #[error("unknown mode: {0}")]
    UnknownMode(String),
    /// The window manager reported no monitor to compute geometry against.
    #[error("no monitor found for window on {0}")]
    NoMonitor(String),
}

/// What a registered hotkey handle does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Activate(usize),
    Escape(usize),
    SubAction { mode: usize, index: usize },
}

/// Orchestrates mode transitions and sub-action invocation.
///
/// # Typical usage
///
/// ```ignore
/// let modes = keymap::build_modes(&config);
/// let mut coordinator = ModeCoordinator::new(wm, keys, overlay, modes);
/// coordinator.start()?;
/// coordinator.run(&cmd_rx, &stop);
/// ```
pub struct ModeCoordinator<W: WindowManager, H: HotkeyRegistrar, O: Overlay> {
    wm: W,
    keys: H,
    overlay: O,
    modes: Vec<Mode>,
    /// Permanent activation bindings, one per mode.
    activation: Vec<HotkeyHandle>,
    targets: HashMap<HotkeyHandle, Target>,
}

impl<W: WindowManager, H: HotkeyRegistrar, O: Overlay> ModeCoordinator<W, H, O> {
    /// Create a coordinator. No hotkey is grabbed until [`start`](Self::start).
    pub fn new(wm: W, keys: H, overlay: O, modes: Vec<Mode>) -> Self {
        Self {
            wm,
            keys,
            overlay,
            modes,
            activation: Vec::new(),
            targets: HashMap::new(),
        }
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// The currently active mode, if any.
    pub fn active_mode(&self) -> Option<&Mode> {
        self.modes.iter().find(|m| m.is_active())
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut O {
        &mut self.overlay
    }

    /// Grab every mode's activation chord.
    ///
    /// If any chord cannot be grabbed, the ones already grabbed are
    /// released again and the error is returned.
    pub fn start(&mut self) -> Result<(), CoordinatorError> {
        let chords: Vec<KeyChord> = self.modes.iter().map(|m| m.activation().clone()).collect();
        for (i, chord) in chords.iter().enumerate() {
            match self.keys.bind(chord) {
                Ok(handle) => {
                    info!("{} mode on {}", self.modes[i].name(), chord);
                    self.targets.insert(handle, Target::Activate(i));
                    self.activation.push(handle);
                }
                Err(e) => {
                    self.shutdown();
                    return Err(CoordinatorError::Hotkey(format!("bind {}: {}", chord, e)));
                }
            }
        }
        Ok(())
    }

    /// Deactivate the active mode and release the activation chords.
    pub fn shutdown(&mut self) {
        self.dismiss();
        for handle in std::mem::take(&mut self.activation) {
            self.targets.remove(&handle);
            if let Err(e) = self.keys.unbind(handle) {
                warn!("unbind {} failed: {}", handle, e);
            }
        }
    }

    /// Process commands until every sender is gone or `stop` is raised,
    /// then [`shutdown`](Self::shutdown).
    pub fn run(&mut self, cmd_rx: &mpsc::Receiver<Command>, stop: &AtomicBool) {
        loop {
            if stop.load(Ordering::Relaxed) {
                info!("stop requested");
                break;
            }
            match cmd_rx.recv_timeout(STOP_POLL) {
                Ok(cmd) => self.handle_logged(cmd),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    info!("all command sources closed");
                    break;
                }
            }
        }
        self.shutdown();
    }

    /// Process every command already queued without blocking.
    ///
    /// Returns `false` once every sender is gone.
    pub fn drain(&mut self, cmd_rx: &mpsc::Receiver<Command>) -> bool {
        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => self.handle_logged(cmd),
                Err(mpsc::TryRecvError::Empty) => return true,
                Err(mpsc::TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn handle_logged(&mut self, cmd: Command) {
        debug!("command: {:?}", cmd);
        if let Err(e) = self.handle(cmd) {
            error!("command error: {}", e);
        }
    }

    /// Process a single [`Command`].
    ///
    /// Mode transitions never fail; an error is only returned when a
    /// sub-action could not be applied or `Activate` names an unknown mode.
    pub fn handle(&mut self, cmd: Command) -> Result<(), CoordinatorError> {
        match cmd {
            Command::Hotkey(handle) => match self.targets.get(&handle).copied() {
                Some(Target::Activate(mode)) => self.activate(mode),
                Some(Target::Escape(mode)) => {
                    info!("escape");
                    self.deactivate(mode);
                }
                Some(Target::SubAction { mode, index }) => return self.invoke(mode, index),
                None => debug!("ignoring hotkey {} with no binding", handle),
            },

            Command::Activate(name) => {
                let mode = self
                    .modes
                    .iter()
                    .position(|m| m.name().eq_ignore_ascii_case(&name))
                    .ok_or(CoordinatorError::UnknownMode(name))?;
                self.activate(mode);
            }

            Command::Dismiss => self.dismiss(),
        }
        Ok(())
    }

    //  Transitions

    /// Enter `mode`, closing any other active mode first.
    ///
    /// Re-entering the active mode re-binds its hotkeys and re-shows the
    /// overlay.
    fn activate(&mut self, mode: usize) {
        info!("activate {}", self.modes[mode].name());
        for other in 0..self.modes.len() {
            if other != mode && self.modes[other].is_active() {
                self.deactivate(other);
            }
        }
        self.release_bindings(mode);

        let mut set = ActiveBindingSet::default();
        match self.keys.bind(&KeyChord::escape()) {
            Ok(handle) => {
                self.targets.insert(handle, Target::Escape(mode));
                set.escape = Some(handle);
            }
            Err(e) => warn!("bind escape failed: {}", e),
        }
        for (index, sub) in self.modes[mode].sub_actions().iter().enumerate() {
            match self.keys.bind(&sub.chord) {
                Ok(handle) => {
                    self.targets.insert(handle, Target::SubAction { mode, index });
                    set.sub_actions.push((handle, index));
                }
                Err(e) => warn!("bind {} failed: {}", sub.chord, e),
            }
        }
        debug!("{} hotkey(s) bound", set.len());
        self.modes[mode].set_active(set);

        match self.overlay_anchor() {
            Some(anchor) => self.overlay.show(self.modes[mode].overlay_text(), &anchor),
            None => warn!("no monitor to show the overlay on"),
        }
    }

    /// Leave `mode` if it is active: release its hotkeys and hide the
    /// overlay.
    fn deactivate(&mut self, mode: usize) {
        if !self.modes[mode].is_active() {
            return;
        }
        info!("deactivate {}", self.modes[mode].name());
        self.release_bindings(mode);
        self.overlay.hide();
    }

    fn dismiss(&mut self) {
        for mode in 0..self.modes.len() {
            self.deactivate(mode);
        }
    }

    fn release_bindings(&mut self, mode: usize) {
        let Some(set) = self.modes[mode].take_bindings() else {
            return;
        };
        for handle in set.handles() {
            self.targets.remove(&handle);
            if let Err(e) = self.keys.unbind(handle) {
                warn!("unbind {} failed: {}", handle, e);
            }
        }
    }

    /// Monitor holding the focused window, falling back to the focused
    /// monitor and then to the first one.
    fn overlay_anchor(&self) -> Option<MonitorInfo> {
        let monitors = match self.wm.monitors() {
            Ok(m) => m,
            Err(e) => {
                warn!("failed to query monitors: {}", e);
                return None;
            }
        };
        let window_monitor = self.wm.active_window().ok().flatten().map(|w| w.monitor);
        let active_monitor = self.wm.active_monitor().ok().flatten();
        resolve_monitor(
            &monitors,
            &[window_monitor.as_deref(), active_monitor.as_deref()],
        )
        .cloned()
    }

    //  Sub-actions

    /// Apply sub-action `index` of `mode` to the focused window.
    fn invoke(&mut self, mode: usize, index: usize) -> Result<(), CoordinatorError> {
        let action = self.modes[mode].sub_actions()[index].action;

        let Some(window) = self.wm.active_window().map_err(wm_error)? else {
            debug!("no focused window, {:?} skipped", action);
            return Ok(());
        };

        let monitors = self.wm.monitors().map_err(wm_error)?;
        let monitor = resolve_monitor(&monitors, &[Some(window.monitor.as_str())])
            .ok_or_else(|| CoordinatorError::NoMonitor(window.monitor.clone()))?;
        let screen = ScreenFrames {
            frame: monitor.frame,
            visible: monitor.visible_frame,
        };

        let mutation = geometry::interpret(&action, window.frame, &screen);
        info!("{}: {:?} on {:?} → {:?}", self.modes[mode].name(), action, window.title, mutation);

        let applied = match mutation {
            Mutation::SetFrame(frame) => self.wm.set_frame(&window, frame.clamped()),
            Mutation::SetTopLeft(point) => self.wm.set_top_left(&window, point),
            Mutation::SetSize(size) => self.wm.set_size(&window, size.clamped()),
            Mutation::Maximize => self.wm.maximize(&window),
        };
        applied.map_err(wm_error)
    }
}

fn wm_error<E: std::error::Error>(e: E) -> CoordinatorError {
    CoordinatorError::WindowManager(e.to_string())
}

/// Pick the first monitor whose name matches one of `preferred` (in order),
/// or the first monitor overall.
fn resolve_monitor<'a>(
    monitors: &'a [MonitorInfo],
    preferred: &[Option<&str>],
) -> Option<&'a MonitorInfo> {
    preferred
        .iter()
        .flatten()
        .find_map(|name| monitors.iter().find(|m| m.name == *name))
        .or_else(|| monitors.first())
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Modifier, WindowInfo};
    use crate::config::{Config, Preset, PresetApply};
    use crate::geometry::{Frame, Point, Size};
    use crate::keymap::{build_modes, MOVE_MODE, RESIZE_MODE};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    //  Recording collaborators

    /// Record-keeping mock window manager.
    #[derive(Debug)]
    struct RecorderWm {
        window: RefCell<Option<WindowInfo>>,
        focused_monitor: Option<String>,
        frames: RefCell<Vec<Frame>>,
        top_lefts: RefCell<Vec<Point>>,
        sizes: RefCell<Vec<Size>>,
        maximized: RefCell<usize>,
    }

    impl RecorderWm {
        fn mutation_count(&self) -> usize {
            self.frames.borrow().len()
                + self.top_lefts.borrow().len()
                + self.sizes.borrow().len()
                + *self.maximized.borrow()
        }
    }

    impl Default for RecorderWm {
        fn default() -> Self {
            Self {
                window: RefCell::new(Some(WindowInfo {
                    address: "0xbeef".into(),
                    title: "test".into(),
                    monitor: "DP-1".into(),
                    frame: Frame::new(100, 100, 500, 400),
                    floating: true,
                    maximized: false,
                })),
                focused_monitor: Some("DP-1".into()),
                frames: RefCell::default(),
                top_lefts: RefCell::default(),
                sizes: RefCell::default(),
                maximized: RefCell::default(),
            }
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    struct RecorderErr;

    impl WindowManager for RecorderWm {
        type Error = RecorderErr;

        fn monitors(&self) -> Result<Vec<MonitorInfo>, RecorderErr> {
            Ok(vec![
                MonitorInfo {
                    name: "DP-1".into(),
                    frame: Frame::new(0, 0, 1920, 1080),
                    visible_frame: Frame::new(0, 30, 1920, 1050),
                },
                MonitorInfo {
                    name: "HDMI-A-1".into(),
                    frame: Frame::new(1920, 0, 2560, 1440),
                    visible_frame: Frame::new(1920, 0, 2560, 1440),
                },
            ])
        }

        fn active_monitor(&self) -> Result<Option<String>, RecorderErr> {
            Ok(self.focused_monitor.clone())
        }

        fn active_window(&self) -> Result<Option<WindowInfo>, RecorderErr> {
            Ok(self.window.borrow().clone())
        }

        fn set_frame(&self, _: &WindowInfo, frame: Frame) -> Result<(), RecorderErr> {
            self.frames.borrow_mut().push(frame);
            Ok(())
        }

        fn set_top_left(&self, _: &WindowInfo, point: Point) -> Result<(), RecorderErr> {
            self.top_lefts.borrow_mut().push(point);
            Ok(())
        }

        fn set_size(&self, _: &WindowInfo, size: Size) -> Result<(), RecorderErr> {
            self.sizes.borrow_mut().push(size);
            Ok(())
        }

        fn maximize(&self, _: &WindowInfo) -> Result<(), RecorderErr> {
            *self.maximized.borrow_mut() += 1;
            Ok(())
        }
    }

    /// Registrar that remembers what is bound and can refuse given keys.
    #[derive(Debug, Default)]
    struct RecorderKeys {
        next: u64,
        bound: BTreeMap<HotkeyHandle, KeyChord>,
        refuse: Vec<String>,
    }

    impl RecorderKeys {
        fn handle_for(&self, chord: &KeyChord) -> HotkeyHandle {
            self.bound
                .iter()
                .find(|(_, c)| *c == chord)
                .map(|(h, _)| *h)
                .unwrap_or_else(|| panic!("{} is not bound", chord))
        }

        fn is_bound(&self, chord: &KeyChord) -> bool {
            self.bound.values().any(|c| c == chord)
        }
    }

    impl HotkeyRegistrar for RecorderKeys {
        type Error = RecorderErr;

        fn bind(&mut self, chord: &KeyChord) -> Result<HotkeyHandle, RecorderErr> {
            if self.refuse.contains(&chord.key) {
                return Err(RecorderErr);
            }
            self.next += 1;
            let handle = HotkeyHandle(self.next);
            self.bound.insert(handle, chord.clone());
            Ok(handle)
        }

        fn unbind(&mut self, handle: HotkeyHandle) -> Result<(), RecorderErr> {
            self.bound.remove(&handle);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct RecorderOverlay {
        shown: Option<(String, String)>,
        show_count: usize,
    }

    impl Overlay for RecorderOverlay {
        fn show(&mut self, text: &str, anchor: &MonitorInfo) {
            self.shown = Some((text.to_string(), anchor.name.clone()));
            self.show_count += 1;
        }

        fn hide(&mut self) {
            self.shown = None;
        }

        fn is_visible(&self) -> bool {
            self.shown.is_some()
        }
    }

    type TestCoordinator = ModeCoordinator<RecorderWm, RecorderKeys, RecorderOverlay>;

    fn preset_config() -> Config {
        Config {
            presets: vec![Preset {
                key: "f".into(),
                modifiers: vec![],
                width: 2560,
                height: 1578,
                x: 0,
                y: 22,
                apply: PresetApply::Frame,
            }],
            ..Config::default()
        }
    }

    fn make_coordinator_with(wm: RecorderWm, keys: RecorderKeys) -> TestCoordinator {
        let mut c = ModeCoordinator::new(
            wm,
            keys,
            RecorderOverlay::default(),
            build_modes(&preset_config()),
        );
        c.start().unwrap();
        c
    }

    fn make_coordinator() -> TestCoordinator {
        make_coordinator_with(RecorderWm::default(), RecorderKeys::default())
    }

    fn move_chord() -> KeyChord {
        KeyChord::new("up", [Modifier::Super, Modifier::Ctrl])
    }

    fn resize_chord() -> KeyChord {
        KeyChord::new("right", [Modifier::Super, Modifier::Ctrl])
    }

    fn press(c: &mut TestCoordinator, chord: &KeyChord) -> Result<(), CoordinatorError> {
        let handle = c.keys.handle_for(chord);
        c.handle(Command::Hotkey(handle))
    }

    fn mode(c: &TestCoordinator, name: &str) -> usize {
        c.modes().iter().position(|m| m.name() == name).unwrap()
    }

    //  Transitions

    #[test]
    fn start_binds_only_activation_chords() {
        let c = make_coordinator();
        assert_eq!(c.keys.bound.len(), 2);
        assert!(c.keys.is_bound(&move_chord()));
        assert!(c.keys.is_bound(&resize_chord()));
        assert!(c.active_mode().is_none());
        assert!(!c.overlay().is_visible());
    }

    #[test]
    fn start_failure_releases_partial_bindings() {
        let keys = RecorderKeys {
            refuse: vec!["right".into()],
            ..RecorderKeys::default()
        };
        let mut c = ModeCoordinator::new(
            RecorderWm::default(),
            keys,
            RecorderOverlay::default(),
            build_modes(&Config::default()),
        );
        assert!(matches!(c.start(), Err(CoordinatorError::Hotkey(_))));
        assert!(c.keys.bound.is_empty());
    }

    #[test]
    fn activation_binds_escape_and_every_sub_action() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();

        let m = &c.modes()[mode(&c, MOVE_MODE)];
        assert!(m.is_active());
        // 19 built-ins + 1 preset + escape.
        assert_eq!(m.active_binding_count(), 21);
        assert_eq!(c.keys.bound.len(), 2 + 21);
        assert!(c.keys.is_bound(&KeyChord::escape()));

        let (text, monitor) = c.overlay().shown.clone().unwrap();
        assert!(text.starts_with("MOVE"));
        assert_eq!(monitor, "DP-1");
    }

    #[test]
    fn activating_another_mode_closes_the_first() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        press(&mut c, &resize_chord()).unwrap();

        assert!(!c.modes()[mode(&c, MOVE_MODE)].is_active());
        assert_eq!(c.modes()[mode(&c, MOVE_MODE)].active_binding_count(), 0);
        assert_eq!(c.active_mode().map(|m| m.name()), Some(RESIZE_MODE));
        // Only RESIZE's bindings remain besides the activation chords.
        assert_eq!(c.keys.bound.len(), 2 + 21);
        assert!(c.overlay().shown.as_ref().unwrap().0.starts_with("RESIZE"));

        press(&mut c, &move_chord()).unwrap();
        assert_eq!(c.active_mode().map(|m| m.name()), Some(MOVE_MODE));
        assert!(!c.modes()[mode(&c, RESIZE_MODE)].is_active());
        assert_eq!(c.keys.bound.len(), 2 + 21);
        assert!(c.overlay().shown.as_ref().unwrap().0.starts_with("MOVE"));
        assert_eq!(c.modes().iter().filter(|m| m.is_active()).count(), 1);
    }

    #[test]
    fn escape_releases_every_binding_and_hides_overlay() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        press(&mut c, &KeyChord::escape()).unwrap();

        assert!(c.active_mode().is_none());
        assert_eq!(c.modes()[mode(&c, MOVE_MODE)].active_binding_count(), 0);
        assert_eq!(c.keys.bound.len(), 2);
        assert!(!c.keys.is_bound(&KeyChord::escape()));
        assert!(!c.overlay().is_visible());
    }

    #[test]
    fn retriggering_same_mode_rebinds_without_leaking() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        let first_escape = c.keys.handle_for(&KeyChord::escape());
        press(&mut c, &move_chord()).unwrap();

        assert_eq!(c.active_mode().map(|m| m.name()), Some(MOVE_MODE));
        assert_eq!(c.keys.bound.len(), 2 + 21);
        assert_ne!(c.keys.handle_for(&KeyChord::escape()), first_escape);
        assert_eq!(c.overlay().show_count, 2);

        // The old escape handle is dead.
        c.handle(Command::Hotkey(first_escape)).unwrap();
        assert!(c.active_mode().is_some());
    }

    #[test]
    fn stale_hotkey_is_ignored() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        let m = c.keys.handle_for(&KeyChord::bare("m"));
        press(&mut c, &KeyChord::escape()).unwrap();

        c.handle(Command::Hotkey(m)).unwrap();
        assert_eq!(c.wm.mutation_count(), 0);
        c.handle(Command::Hotkey(HotkeyHandle(9999))).unwrap();
    }

    #[test]
    fn activate_and_dismiss_by_command() {
        let mut c = make_coordinator();
        c.handle(Command::Activate("resize".into())).unwrap();
        assert_eq!(c.active_mode().map(|m| m.name()), Some(RESIZE_MODE));

        c.handle(Command::Dismiss).unwrap();
        assert!(c.active_mode().is_none());
        assert!(!c.overlay().is_visible());
        // Dismiss with nothing active is a no-op.
        c.handle(Command::Dismiss).unwrap();

        assert!(matches!(
            c.handle(Command::Activate("ZOOM".into())),
            Err(CoordinatorError::UnknownMode(_))
        ));
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        c.shutdown();
        assert!(c.keys.bound.is_empty());
        assert!(c.active_mode().is_none());
        assert!(!c.overlay().is_visible());
    }

    #[test]
    fn failed_sub_action_bind_is_tolerated() {
        let keys = RecorderKeys {
            refuse: vec!["h".into()],
            ..RecorderKeys::default()
        };
        let mut c = make_coordinator_with(RecorderWm::default(), keys);
        press(&mut c, &move_chord()).unwrap();
        assert!(c.active_mode().is_some());
        assert_eq!(c.active_mode().unwrap().active_binding_count(), 20);
        assert!(c.overlay().is_visible());
    }

    //  Event loop

    #[test]
    fn run_releases_everything_when_sources_close() {
        let mut c = make_coordinator();
        let (tx, rx) = mpsc::channel();
        tx.send(Command::Activate("MOVE".into())).unwrap();
        drop(tx);

        c.run(&rx, &AtomicBool::new(false));

        assert!(c.keys.bound.is_empty());
        assert!(c.active_mode().is_none());
        assert!(!c.overlay().is_visible());
    }

    #[test]
    fn run_releases_everything_on_stop() {
        let mut c = make_coordinator();
        let (tx, rx) = mpsc::channel();
        tx.send(Command::Activate("RESIZE".into())).unwrap();

        let stop = std::sync::Arc::new(AtomicBool::new(false));
        let raiser = std::sync::Arc::clone(&stop);
        let signal = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            raiser.store(true, Ordering::Relaxed);
        });

        // `tx` stays alive, so only the stop flag can end the loop.
        c.run(&rx, &stop);
        signal.join().unwrap();

        assert_eq!(c.overlay().show_count, 1);
        assert!(c.keys.bound.is_empty());
        assert!(c.active_mode().is_none());
        drop(tx);
    }

    #[test]
    fn drain_processes_queue_and_reports_disconnect() {
        let mut c = make_coordinator();
        let (tx, rx) = mpsc::channel();
        assert!(c.drain(&rx));

        tx.send(Command::Activate("MOVE".into())).unwrap();
        tx.send(Command::Activate("NOPE".into())).unwrap();
        assert!(c.drain(&rx));
        assert_eq!(c.active_mode().map(|m| m.name()), Some(MOVE_MODE));

        drop(tx);
        assert!(!c.drain(&rx));
    }

    //  Overlay placement

    #[test]
    fn overlay_follows_focused_window_monitor() {
        let wm = RecorderWm::default();
        if let Some(w) = wm.window.borrow_mut().as_mut() {
            w.monitor = "HDMI-A-1".into();
        }
        let mut c = make_coordinator_with(wm, RecorderKeys::default());
        press(&mut c, &resize_chord()).unwrap();
        assert_eq!(c.overlay().shown.as_ref().unwrap().1, "HDMI-A-1");
    }

    #[test]
    fn overlay_falls_back_to_active_monitor() {
        let wm = RecorderWm {
            focused_monitor: Some("HDMI-A-1".into()),
            ..RecorderWm::default()
        };
        *wm.window.borrow_mut() = None;
        let mut c = make_coordinator_with(wm, RecorderKeys::default());
        press(&mut c, &move_chord()).unwrap();
        assert_eq!(c.overlay().shown.as_ref().unwrap().1, "HDMI-A-1");
    }

    #[test]
    fn overlay_falls_back_to_first_monitor() {
        let wm = RecorderWm {
            focused_monitor: None,
            ..RecorderWm::default()
        };
        *wm.window.borrow_mut() = None;
        let mut c = make_coordinator_with(wm, RecorderKeys::default());
        press(&mut c, &move_chord()).unwrap();
        assert_eq!(c.overlay().shown.as_ref().unwrap().1, "DP-1");
    }

    //  Sub-actions

    #[test]
    fn resize_to_right_edge() {
        let mut c = make_coordinator();
        press(&mut c, &resize_chord()).unwrap();
        press(&mut c, &KeyChord::new("right", [Modifier::Super])).unwrap();
        assert_eq!(*c.wm.frames.borrow(), vec![Frame::new(100, 100, 1820, 400)]);
        // The mode stays active after an action.
        assert!(c.active_mode().is_some());
    }

    #[test]
    fn move_to_left_edge() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        press(&mut c, &KeyChord::new("left", [Modifier::Super])).unwrap();
        assert_eq!(*c.wm.top_lefts.borrow(), vec![Point { x: 0, y: 100 }]);
    }

    #[test]
    fn move_by_increments() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        press(&mut c, &KeyChord::bare("right")).unwrap();
        press(&mut c, &KeyChord::new("down", [Modifier::Shift])).unwrap();
        press(&mut c, &KeyChord::new("left", [Modifier::Alt])).unwrap();
        assert_eq!(
            *c.wm.top_lefts.borrow(),
            vec![
                Point { x: 101, y: 100 },
                Point { x: 100, y: 110 },
                Point { x: 0, y: 100 },
            ]
        );
    }

    #[test]
    fn preset_applies_verbatim() {
        let mut c = make_coordinator();
        press(&mut c, &resize_chord()).unwrap();
        press(&mut c, &KeyChord::bare("f")).unwrap();
        assert_eq!(*c.wm.frames.borrow(), vec![Frame::new(0, 22, 2560, 1578)]);
    }

    #[test]
    fn maximize_and_center() {
        let mut c = make_coordinator();
        press(&mut c, &move_chord()).unwrap();
        press(&mut c, &KeyChord::bare("m")).unwrap();
        press(&mut c, &KeyChord::bare("=")).unwrap();
        assert_eq!(*c.wm.maximized.borrow(), 1);
        assert_eq!(*c.wm.top_lefts.borrow(), vec![Point { x: 710, y: 355 }]);
    }

    #[test]
    fn edge_snap_uses_window_monitor() {
        let wm = RecorderWm::default();
        if let Some(w) = wm.window.borrow_mut().as_mut() {
            w.monitor = "HDMI-A-1".into();
            w.frame = Frame::new(2000, 50, 800, 600);
        }
        let mut c = make_coordinator_with(wm, RecorderKeys::default());
        press(&mut c, &move_chord()).unwrap();
        press(&mut c, &KeyChord::new("right", [Modifier::Super])).unwrap();
        assert_eq!(*c.wm.top_lefts.borrow(), vec![Point { x: 3680, y: 50 }]);
    }

    #[test]
    fn no_focused_window_is_a_silent_noop() {
        let wm = RecorderWm::default();
        *wm.window.borrow_mut() = None;
        let mut c = make_coordinator_with(wm, RecorderKeys::default());
        press(&mut c, &resize_chord()).unwrap();
        let chords: Vec<KeyChord> = c.modes()[mode(&c, RESIZE_MODE)]
            .sub_actions()
            .iter()
            .map(|s| s.chord.clone())
            .collect();
        for chord in &chords {
            press(&mut c, chord).unwrap();
        }
        assert_eq!(c.wm.mutation_count(), 0);
    }

    #[test]
    fn shrinking_below_zero_is_clamped() {
        let wm = RecorderWm::default();
        if let Some(w) = wm.window.borrow_mut().as_mut() {
            w.frame = Frame::new(100, 100, 50, 400);
        }
        let mut c = make_coordinator_with(wm, RecorderKeys::default());
        press(&mut c, &resize_chord()).unwrap();
        press(&mut c, &KeyChord::new("left", [Modifier::Alt])).unwrap();
        assert_eq!(
            *c.wm.sizes.borrow(),
            vec![Size {
                width: 0,
                height: 400
            }]
        );
    }

    #[test]
    fn resolve_monitor_preference_order() {
        let monitors = RecorderWm::default().monitors().unwrap();
        let pick = |p: &[Option<&str>]| resolve_monitor(&monitors, p).map(|m| m.name.clone());
        assert_eq!(pick(&[Some("HDMI-A-1"), Some("DP-1")]), Some("HDMI-A-1".into()));
        assert_eq!(pick(&[Some("NOPE"), Some("HDMI-A-1")]), Some("HDMI-A-1".into()));
        assert_eq!(pick(&[None, None]), Some("DP-1".into()));
        assert_eq!(resolve_monitor(&[], &[Some("DP-1")]), None);
    }
}
