//! The built-in MOVE and RESIZE modes.
//!
//! Each mode is entered with `main_modifiers + <arrow>` (up for MOVE, right
//! for RESIZE) and binds, in order:
//!
//! | Chord                    | MOVE                  | RESIZE                   |
//! |--------------------------|-----------------------|--------------------------|
//! | arrow                    | move 1 px             | resize 1 px              |
//! | shift + arrow            | move 10 px            | resize 10 px             |
//! | alt + arrow              | move 100 px           | resize 100 px            |
//! | super + arrow            | move to screen edge   | resize to screen edge    |
//! | `m`                      | maximize              | maximize                 |
//! | `=`                      | center                | center                   |
//! | `h`                      | left half             | left half                |
//! | preset keys              | preset                | preset                   |

use crate::command::{
    Action, Direction, KeyChord, ModeKind, Step, INCREMENT_HIGH, INCREMENT_LOW, INCREMENT_MID,
};
use crate::config::Config;
use crate::mode::Mode;
use log::{debug, warn};

pub const MOVE_MODE: &str = "MOVE";
pub const RESIZE_MODE: &str = "RESIZE";

const ARROWS: &str = "    ↑\n←      →\n    ↓";

/// Build both modes from `config`.
pub fn build_modes(config: &Config) -> Vec<Mode> {
    vec![
        build_mode(ModeKind::Move, config),
        build_mode(ModeKind::Resize, config),
    ]
}

fn build_mode(kind: ModeKind, config: &Config) -> Mode {
    let (name, key) = match kind {
        ModeKind::Move => (MOVE_MODE, "up"),
        ModeKind::Resize => (RESIZE_MODE, "right"),
    };
    let activation = KeyChord::new(key, config.main_modifiers.iter().copied());
    let mut mode = Mode::new(name, activation, overlay_text(kind));

    for step in Step::ALL {
        for direction in Direction::ALL {
            mode.register_sub_action(
                KeyChord::new(direction.arrow_key(), step.modifiers()),
                Action::directional(kind, direction, step),
            );
        }
    }

    mode.register_sub_action(KeyChord::bare("m"), Action::Maximize);
    mode.register_sub_action(KeyChord::bare("="), Action::Center);
    mode.register_sub_action(KeyChord::bare("h"), Action::HalfLeft);

    for preset in &config.presets {
        let chord = preset.chord();
        if chord == KeyChord::escape() {
            warn!("{}: escape is reserved, ignoring preset", name);
            continue;
        }
        mode.register_sub_action(chord, preset.action());
    }

    debug!(
        "built {} mode on {} with {} sub-action(s)",
        name,
        mode.activation(),
        mode.sub_actions().len()
    );
    mode
}

fn overlay_text(kind: ModeKind) -> String {
    let (title, verb) = match kind {
        ModeKind::Move => (MOVE_MODE, "move"),
        ModeKind::Resize => (RESIZE_MODE, "resize"),
    };
    [
        title.to_string(),
        String::new(),
        ARROWS.to_string(),
        String::new(),
        "Hit esc to dismiss".to_string(),
        format!("Use no modifier key to {} {} pixel.", verb, INCREMENT_LOW),
        format!("Use the shift key to {} {} pixels.", verb, INCREMENT_MID),
        format!("Use the alt key to {} {} pixels.", verb, INCREMENT_HIGH),
        format!("Use the super key to {} to the edge of the screen.", verb),
    ]
    .join("\n")
}
