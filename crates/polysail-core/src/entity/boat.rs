//! The player boat: wind propulsion, steering and the docking state machine.
//!
//! A boat is either [`BoatState::Sailing`] or [`BoatState::Docked`]. The
//! state is not stored separately: a boat is docked exactly when it holds
//! the id of an island.
//!
//! ```text
//!            dock_at(island)              release()
//! Sailing ───────────────────▶ Docked ───────────────▶ Sailing
//!    │  speed 0, rudder 0                heading +180°,
//!    │  heading remembered               speed RELEASE_SPEED
//!    │
//!    └── bounce_back(): heading +180°, stays Sailing
//! ```
//!
//! # Example
//!
//! ```
//! use polysail_core::config::WorldBounds;
//! use polysail_core::entity::boat::Boat;
//! use polysail_core::wind::Wind;
//! use glam::Vec2;
//!
//! let mut boat = Boat::new(Vec2::ZERO);
//! boat.adjust_reef(10.0); // fully unreefed
//! let wind = Wind::new(0.0, 20.0); // boat heads east, wind from the north
//!
//! for _ in 0..600 {
//!     boat.apply_wind(&wind, 1.0 / 60.0);
//!     boat.advance(1.0 / 60.0, &WorldBounds::default());
//! }
//! assert!(boat.speed() > 0.0);
//! ```

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ambient::Wake;
use super::{EntityId, EntityTag, OffsetCache, WorldObject};
use crate::config::{Palette, WorldBounds};
use crate::math::{compass_forward, normalize_degrees, signed_angle_diff};
use crate::render::Shape;
use crate::wind::Wind;

/// Hull size of the boat.
pub const BOAT_SIZE: f32 = 20.0;

/// Docking requires the boat to be strictly slower than this.
pub const DOCKING_SPEED_THRESHOLD: f32 = 2.0;

/// Speed given to the boat when it leaves an island.
///
/// Kept above [`DOCKING_SPEED_THRESHOLD`] so a released boat cannot dock
/// again before it has slowed down.
pub const RELEASE_SPEED: f32 = 3.0;

/// Seconds of sailing between two wake spawns.
pub const WAKE_INTERVAL: f32 = 0.1;

/// Boats at or below this speed leave no wake.
pub const WAKE_MIN_SPEED: f32 = 0.1;

/// Scale from speed units to world units per second.
pub const MOVE_MULTIPLIER: f32 = 10.0;

/// Most wakes a boat keeps alive; the oldest is dropped first.
pub const MAX_WAKES: usize = 64;

/// Sail angle range in degrees.
pub const SAIL_RANGE: (f32, f32) = (0.0, 90.0);

/// Rudder angle range in degrees.
pub const RUDDER_RANGE: (f32, f32) = (-30.0, 30.0);

/// Scale applied to reef adjustments.
pub const REEF_STEP: f32 = 0.1;

const WIND_POWER: f32 = 0.2;
const CLOSE_HAULED_PENALTY: f32 = 0.2;
const SPEED_MULTIPLIER: f32 = 2.0;
const ACCEL_UP: f32 = 0.5;
const ACCEL_DOWN: f32 = 0.2;
const DRAG: f32 = 0.005;
const TURN_GAIN: f32 = 2.0;
const TURN_SMOOTHING: f32 = 0.05;
const WEATHERVANE_RATE: f32 = 0.001;

/// Docking state, derived from the island reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoatState {
    /// Free to move
    Sailing,
    /// Stopped at an island
    Docked,
}

/// The player-controlled boat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    position: Vec2,
    orientation: f32,
    last_orientation: f32,
    speed: f32,
    angular_velocity: f32,
    sail: f32,
    rudder: f32,
    reef: f32,
    island: Option<EntityId>,
    #[serde(skip)]
    leaving: Option<EntityId>,
    #[serde(skip)]
    wakes: VecDeque<Wake>,
    #[serde(skip)]
    wake_timer: f32,
    #[serde(skip)]
    offset_cache: OffsetCache,
}

impl Boat {
    /// Creates a sailing boat heading east with a half-open sail, fully
    /// reefed and at rest.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            orientation: 90.0,
            last_orientation: 90.0,
            speed: 0.0,
            angular_velocity: 0.0,
            sail: 45.0,
            rudder: 0.0,
            reef: 0.0,
            island: None,
            leaving: None,
            wakes: VecDeque::new(),
            wake_timer: 0.0,
            offset_cache: OffsetCache::default(),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Current docking state.
    #[must_use]
    pub fn state(&self) -> BoatState {
        if self.island.is_some() {
            BoatState::Docked
        } else {
            BoatState::Sailing
        }
    }

    /// True while docked at an island.
    #[must_use]
    pub fn is_docked(&self) -> bool {
        self.island.is_some()
    }

    /// Island the boat is docked at, if any.
    #[must_use]
    pub fn docked_at(&self) -> Option<EntityId> {
        self.island
    }

    /// Compass heading in degrees, `[0, 360)`.
    #[must_use]
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    /// Heading at the moment of the last dock.
    #[must_use]
    pub fn last_orientation(&self) -> f32 {
        self.last_orientation
    }

    /// Scalar speed, never negative.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Smoothed turn rate in degrees per second.
    #[must_use]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Sail angle, `[0, 90]`.
    #[must_use]
    pub fn sail(&self) -> f32 {
        self.sail
    }

    /// Rudder angle, `[-30, 30]`.
    #[must_use]
    pub fn rudder(&self) -> f32 {
        self.rudder
    }

    /// Reef fraction, `[0, 1]`. Zero means no sail area.
    #[must_use]
    pub fn reef(&self) -> f32 {
        self.reef
    }

    /// Island just left that the boat has not yet sailed clear of.
    #[must_use]
    pub fn leaving(&self) -> Option<EntityId> {
        self.leaving
    }

    pub(crate) fn clear_leaving(&mut self) {
        self.leaving = None;
    }

    /// Active wakes, oldest first.
    #[must_use]
    pub fn wakes(&self) -> &VecDeque<Wake> {
        &self.wakes
    }

    pub(crate) fn wakes_mut(&mut self) -> impl Iterator<Item = &mut Wake> {
        self.wakes.iter_mut()
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Opens or closes the sail, clamped to `[0, 90]`.
    pub fn adjust_sail(&mut self, delta: f32) {
        self.sail = (self.sail + delta).clamp(SAIL_RANGE.0, SAIL_RANGE.1);
    }

    /// Turns the rudder, clamped to `[-30, 30]`.
    pub fn adjust_rudder(&mut self, delta: f32) {
        self.rudder = (self.rudder + delta).clamp(RUDDER_RANGE.0, RUDDER_RANGE.1);
    }

    /// Changes the reef by `delta * 0.1`, clamped to `[0, 1]`.
    pub fn adjust_reef(&mut self, delta: f32) {
        self.reef = (self.reef + delta * REEF_STEP).clamp(0.0, 1.0);
    }

    /// Overrides the speed, floored at zero.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Overrides the heading, wrapped into `[0, 360)`.
    pub fn set_orientation(&mut self, degrees: f32) {
        self.orientation = normalize_degrees(degrees);
    }

    /// Teleports the boat.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    // =========================================================================
    // Physics
    // =========================================================================

    /// Angle of the wind relative to the bow, `[0, 360)`.
    #[must_use]
    pub fn relative_wind(&self, wind: &Wind) -> f32 {
        normalize_degrees(wind.direction() - self.orientation)
    }

    /// Speed the boat would settle at in this wind with its current trim.
    ///
    /// The ideal sail angle is the relative wind folded into `[0, 90]`.
    /// Effectiveness is the cosine of the gap to the actual sail angle, cut
    /// to a fifth outside the beam-reach bands (45°–135° and 225°–315°).
    #[must_use]
    pub fn target_speed(&self, wind: &Wind) -> f32 {
        let relative = self.relative_wind(wind);

        let mut ideal_sail = relative % 180.0;
        if ideal_sail > 90.0 {
            ideal_sail = 180.0 - ideal_sail;
        }

        let mut gap = (ideal_sail - self.sail).abs();
        if gap > 90.0 {
            gap = 180.0 - gap;
        }

        let beam_reach = (45.0 < relative && relative < 135.0) || (225.0 < relative && relative < 315.0);
        let mut effectiveness = gap.to_radians().cos();
        if !beam_reach {
            effectiveness *= CLOSE_HAULED_PENALTY;
        }
        let effectiveness = effectiveness.max(0.0);

        let raw = wind.speed() * WIND_POWER * effectiveness * self.reef;
        let cap = 10.0 * self.reef + 2.0;
        raw.min(cap) * SPEED_MULTIPLIER
    }

    /// Eases speed toward the wind's target, applies drag and steers.
    ///
    /// Does nothing while docked.
    pub fn apply_wind(&mut self, wind: &Wind, dt: f32) {
        if self.is_docked() {
            return;
        }

        let target = self.target_speed(wind);
        if self.speed < target {
            self.speed = (self.speed + ACCEL_UP * dt).min(target);
        } else if self.speed > target {
            self.speed = (self.speed - ACCEL_DOWN * dt).max(target);
        }
        self.speed = (self.speed * (1.0 - DRAG * dt)).max(0.0);

        let turn_rate = TURN_GAIN / (1.0 + self.speed);
        let desired = self.rudder * turn_rate;
        self.angular_velocity += (desired - self.angular_velocity) * TURN_SMOOTHING;
        let turned = normalize_degrees(self.orientation + self.angular_velocity * dt);

        // Weak weathervaning toward the wind.
        let drift = signed_angle_diff(turned, wind.direction()) * WEATHERVANE_RATE * dt;
        self.orientation = normalize_degrees(turned + drift);
    }

    /// Ages wakes, then moves the boat along its heading and drops new wakes.
    ///
    /// Wakes keep fading while docked; the boat itself does not move.
    pub fn advance(&mut self, dt: f32, bounds: &WorldBounds) {
        for wake in &mut self.wakes {
            wake.update(dt);
        }
        self.wakes.retain(|w| !w.is_expired());

        if self.is_docked() {
            return;
        }

        let forward = compass_forward(self.orientation);
        self.position = bounds.wrap(self.position + forward * self.speed * dt * MOVE_MULTIPLIER);

        self.wake_timer += dt;
        if self.speed > WAKE_MIN_SPEED && self.wake_timer > WAKE_INTERVAL {
            let stern = self.position - forward * BOAT_SIZE * 0.5;
            self.wakes.push_back(Wake::new(self.speed, stern));
            if self.wakes.len() > MAX_WAKES {
                self.wakes.pop_front();
            }
            self.wake_timer = 0.0;
        }
    }

    // =========================================================================
    // Docking
    // =========================================================================

    /// Docks at an island: speed and rudder reset, heading remembered.
    ///
    /// Returns `false` and leaves the boat untouched if already docked.
    pub fn dock_at(&mut self, island: EntityId) -> bool {
        if self.is_docked() {
            return false;
        }
        self.island = Some(island);
        self.leaving = None;
        self.last_orientation = self.orientation;
        self.rudder = 0.0;
        self.speed = 0.0;
        self.angular_velocity = 0.0;
        true
    }

    /// Leaves the island: turns around and gets a small push.
    ///
    /// The island is remembered in [`Boat::leaving`] until the boat is
    /// outside it, so the departure is not mistaken for a fast approach.
    /// Returns the island left, or `None` if the boat was not docked.
    pub fn release(&mut self) -> Option<EntityId> {
        let island = self.island.take()?;
        self.leaving = Some(island);
        self.orientation = normalize_degrees(self.orientation + 180.0);
        self.speed = RELEASE_SPEED;
        Some(island)
    }

    /// Turns the boat around after hitting an obstacle at `obstacle`.
    ///
    /// The boat is not pushed out of the obstacle. Returns the unit normal
    /// from the obstacle toward the boat, or `None` without changing
    /// anything if the boat is docked or sits exactly on the obstacle centre.
    pub fn bounce_back(&mut self, obstacle: Vec2) -> Option<Vec2> {
        if self.is_docked() {
            return None;
        }
        let normal = (self.position - obstacle).try_normalize()?;
        self.orientation = normalize_degrees(self.orientation + 180.0);
        Some(normal)
    }

    /// Drops presentation-only state: wakes and cached offsets.
    pub fn clear_transient(&mut self) {
        self.wakes.clear();
        self.wake_timer = 0.0;
        self.leaving = None;
        self.offset_cache.clear();
    }
}

impl WorldObject for Boat {
    fn tag(&self) -> EntityTag {
        EntityTag::Boat
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> f32 {
        BOAT_SIZE
    }

    fn offset_cache(&mut self) -> &mut OffsetCache {
        &mut self.offset_cache
    }

    fn draw_shape(&self, palette: &Palette) -> Shape<'_> {
        Shape::Hull {
            size: BOAT_SIZE,
            heading: self.orientation,
            color: palette.white,
        }
    }
}
