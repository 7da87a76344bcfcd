//! Modal contexts and their sub-actions.
//!
//! A [`Mode`] is a named context ("MOVE", "RESIZE") entered through its
//! activation chord. While a mode is active, each of its [`SubAction`]s is
//! grabbed as a global hotkey; the set of handles currently grabbed is the
//! mode's [`ActiveBindingSet`].
//!
//! Modes are assembled at startup (see [`keymap`](crate::keymap)) and then
//! handed to the [`ModeCoordinator`](crate::coordinator::ModeCoordinator),
//! which is the only component that changes their [`ModeState`].

use crate::command::{Action, HotkeyHandle, KeyChord};
use log::warn;

/// A key chord bound to an [`Action`] while the owning mode is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAction {
    pub chord: KeyChord,
    pub action: Action,
}

/// Hotkey handles held by an active mode.
///
/// The first handle is always the escape binding; the rest line up with the
/// mode's sub-actions that were bound successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveBindingSet {
    pub(crate) escape: Option<HotkeyHandle>,
    pub(crate) sub_actions: Vec<(HotkeyHandle, usize)>,
}

impl ActiveBindingSet {
    /// Number of handles currently held, escape included.
    pub fn len(&self) -> usize {
        self.sub_actions.len() + usize::from(self.escape.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every handle in the set, escape first.
    pub fn handles(&self) -> impl Iterator<Item = HotkeyHandle> + '_ {
        self.escape
            .into_iter()
            .chain(self.sub_actions.iter().map(|(h, _)| *h))
    }
}

/// Lifecycle of a mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModeState {
    #[default]
    Inactive,
    Active(ActiveBindingSet),
}

/// One top-level modal context.
#[derive(Debug, Clone)]
pub struct Mode {
    name: String,
    activation: KeyChord,
    overlay_text: String,
    sub_actions: Vec<SubAction>,
    state: ModeState,
}

impl Mode {
    pub fn new(name: impl Into<String>, activation: KeyChord, overlay_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activation,
            overlay_text: overlay_text.into(),
            sub_actions: Vec::new(),
            state: ModeState::Inactive,
        }
    }

    /// Append a sub-action. Registration order is binding order.
    ///
    /// A chord already taken in this mode keeps its first action; the new
    /// one is dropped and `false` is returned.
    pub fn register_sub_action(&mut self, chord: KeyChord, action: Action) -> bool {
        if let Some(existing) = self.sub_actions.iter().find(|s| s.chord == chord) {
            warn!(
                "{}: {} is already bound to {:?}, ignoring {:?}",
                self.name, chord, existing.action, action
            );
            return false;
        }
        self.sub_actions.push(SubAction { chord, action });
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn activation(&self) -> &KeyChord {
        &self.activation
    }

    pub fn overlay_text(&self) -> &str {
        &self.overlay_text
    }

    pub fn sub_actions(&self) -> &[SubAction] {
        &self.sub_actions
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ModeState::Active(_))
    }

    /// Handles currently held by this mode (zero when inactive).
    pub fn active_binding_count(&self) -> usize {
        match &self.state {
            ModeState::Active(set) => set.len(),
            ModeState::Inactive => 0,
        }
    }

    pub(crate) fn set_active(&mut self, bindings: ActiveBindingSet) {
        self.state = ModeState::Active(bindings);
    }

    /// Move the mode to `Inactive`, returning the bindings it held.
    pub(crate) fn take_bindings(&mut self) -> Option<ActiveBindingSet> {
        match std::mem::take(&mut self.state) {
            ModeState::Active(set) => Some(set),
            ModeState::Inactive => None,
        }
    }
}
