use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which key drives which direction. Defaults to the ZQSD layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub up: char,
    pub down: char,
    pub left: char,
    pub right: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: 'Z',
            down: 'S',
            left: 'Q',
            right: 'D',
        }
    }
}

/// Directional intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Intent {
    pub fn from_keys(bindings: &KeyBindings, pressed: &[char]) -> Self {
        let is_down = |key: char| pressed.iter().any(|p| p.eq_ignore_ascii_case(&key));

        Self {
            up: is_down(bindings.up),
            down: is_down(bindings.down),
            left: is_down(bindings.left),
            right: is_down(bindings.right),
        }
    }

    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    /// Each pressed axis moves at full `speed`, so diagonals are faster. When
    /// opposite keys are both held, the later of the pair wins (right over
    /// left, down over up).
    pub fn velocity(&self, speed: f32) -> Vec2 {
        let mut velocity = Vec2::ZERO;

        if self.left {
            velocity.x = -speed;
        }
        if self.right {
            velocity.x = speed;
        }
        if self.up {
            velocity.y = -speed;
        }
        if self.down {
            velocity.y = speed;
        }

        velocity
    }
}

/// Heads from `from` to `to`, ignoring axes already within `tolerance`.
pub fn toward(from: Vec2, to: Vec2, tolerance: f32) -> Intent {
    let delta = to - from;
    Intent {
        up: delta.y < -tolerance,
        down: delta.y > tolerance,
        left: delta.x < -tolerance,
        right: delta.x > tolerance,
    }
}
