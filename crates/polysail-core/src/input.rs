//! Per-frame input snapshot and its translation into boat controls.
//!
//! The platform layer fills an [`InputSnapshot`] each frame. Held keys and
//! a held pointer over one of the three [`ControlPads`] adjust the boat a
//! little every frame; the left half of a pad increases its control, the
//! right half decreases it.

use bitflags::bitflags;
use glam::Vec2;

use crate::config::ScreenSize;
use crate::entity::boat::Boat;
use crate::menu::Rect;

/// Sail change per frame of held input.
pub const SAIL_STEP: f32 = 0.5;

/// Rudder change per frame of held input.
pub const RUDDER_STEP: f32 = 0.05;

/// Reef input per frame of held input, before the boat's own scaling.
pub const REEF_STEP_INPUT: f32 = 0.05;

bitflags! {
    /// Keys currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeySet: u8 {
        /// Q: open the sail
        const SAIL_OUT = 1 << 0;
        /// E: close the sail
        const SAIL_IN = 1 << 1;
        /// A: rudder to port
        const RUDDER_PORT = 1 << 2;
        /// D: rudder to starboard
        const RUDDER_STARBOARD = 1 << 3;
        /// W: unreef
        const UNREEF = 1 << 4;
        /// S: reef
        const REEF = 1 << 5;
        /// Escape: step back a menu level
        const ESCAPE = 1 << 6;
    }
}

impl KeySet {
    /// Maps a key character (case-insensitive) to its flag.
    #[must_use]
    pub fn from_char(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'q' => Some(Self::SAIL_OUT),
            'e' => Some(Self::SAIL_IN),
            'a' => Some(Self::RUDDER_PORT),
            'd' => Some(Self::RUDDER_STARBOARD),
            'w' => Some(Self::UNREEF),
            's' => Some(Self::REEF),
            _ => None,
        }
    }
}

/// Everything the session needs from the platform for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Keys held this frame
    pub keys: KeySet,
    /// Pointer position while the button is held
    pub pointer: Option<Vec2>,
    /// Position of a click that started this frame
    pub click: Option<Vec2>,
}

impl InputSnapshot {
    /// Snapshot with only keys held.
    #[must_use]
    pub fn keys(keys: KeySet) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    /// Snapshot of a fresh click that is still held.
    #[must_use]
    pub fn click(at: Vec2) -> Self {
        Self {
            keys: KeySet::empty(),
            pointer: Some(at),
            click: Some(at),
        }
    }

    /// True if Escape is held.
    #[must_use]
    pub fn escape(&self) -> bool {
        self.keys.contains(KeySet::ESCAPE)
    }
}

/// The three on-screen touch pads along the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPads {
    /// Sail trim pad
    pub sail: Rect,
    /// Rudder pad
    pub rudder: Rect,
    /// Reef pad
    pub reef: Rect,
}

impl ControlPads {
    /// Lays the pads out for a screen: a quarter width each, 15% high.
    #[must_use]
    pub fn for_screen(screen: ScreenSize) -> Self {
        let height = (screen.height * 0.15).floor();
        let top = screen.height - height;
        let width = screen.width * 0.25;
        let pad = |left: f32| Rect::new(screen.width * left, top, width, height);
        Self {
            sail: pad(0.05),
            rudder: pad(0.35),
            reef: pad(0.65),
        }
    }

    /// Pads with their captions, in drawing order.
    #[must_use]
    pub fn labelled(&self) -> [(&'static str, Rect); 3] {
        [("Sail", self.sail), ("Rudder", self.rudder), ("Reef", self.reef)]
    }

    /// Applies held pointer and keys to the boat. Ignored while docked.
    pub fn apply(&self, input: &InputSnapshot, boat: &mut Boat) {
        if boat.is_docked() {
            return;
        }

        if let Some(p) = input.pointer {
            let sign = |rect: &Rect| if p.x < rect.center_x() { 1.0 } else { -1.0 };
            if self.sail.contains(p) {
                boat.adjust_sail(SAIL_STEP * sign(&self.sail));
            } else if self.rudder.contains(p) {
                boat.adjust_rudder(RUDDER_STEP * sign(&self.rudder));
            } else if self.reef.contains(p) {
                boat.adjust_reef(REEF_STEP_INPUT * sign(&self.reef));
            }
        }

        let keys = input.keys;
        if keys.contains(KeySet::SAIL_OUT) {
            boat.adjust_sail(SAIL_STEP);
        }
        if keys.contains(KeySet::SAIL_IN) {
            boat.adjust_sail(-SAIL_STEP);
        }
        if keys.contains(KeySet::RUDDER_PORT) {
            boat.adjust_rudder(RUDDER_STEP);
        }
        if keys.contains(KeySet::RUDDER_STARBOARD) {
            boat.adjust_rudder(-RUDDER_STEP);
        }
        if keys.contains(KeySet::UNREEF) {
            boat.adjust_reef(REEF_STEP_INPUT);
        }
        if keys.contains(KeySet::REEF) {
            boat.adjust_reef(-REEF_STEP_INPUT);
        }
    }
}
