//! Global wind model.
//!
//! The wind is a single direction/speed pair shared by the whole world. It is
//! polled every frame but only changes once per [`WIND_CHANGE_INTERVAL_MS`]:
//! the direction receives a small jitter and the speed drifts with a bias
//! back toward [`MEAN_WIND_SPEED`].
//!
//! Direction is a compass bearing in degrees (0 = up, clockwise on screen).
//!
//! # Example
//!
//! ```
//! use polysail_core::wind::{Wind, MAX_WIND_SPEED};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let mut wind = Wind::new(90.0, 20.0);
//!
//! assert!(!wind.update(1_000, &mut rng)); // too early
//! assert!(wind.update(5_000, &mut rng));
//! assert!(wind.speed() <= MAX_WIND_SPEED);
//! ```

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{heading_vector, normalize_degrees};

/// Minimum time between two wind changes.
pub const WIND_CHANGE_INTERVAL_MS: u64 = 5_000;

/// Upper bound of the wind speed.
pub const MAX_WIND_SPEED: f32 = 35.0;

/// Speed the drift is pulled back toward.
pub const MEAN_WIND_SPEED: f32 = 20.0;

const DIRECTION_JITTER_DEG: f32 = 5.0;
const SPEED_DRIFT: f32 = 1.0;
const MEAN_REVERSION: f32 = 0.05;

/// Slowly drifting global wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    direction: f32,
    speed: f32,
    interval_ms: u64,
    last_change_ms: u64,
}

impl Wind {
    /// Creates a wind with the given compass direction and speed.
    ///
    /// The direction is wrapped into `[0, 360)` and the speed clamped into
    /// `[0, MAX_WIND_SPEED]`.
    #[must_use]
    pub fn new(direction: f32, speed: f32) -> Self {
        Self {
            direction: normalize_degrees(direction),
            speed: speed.clamp(0.0, MAX_WIND_SPEED),
            interval_ms: WIND_CHANGE_INTERVAL_MS,
            last_change_ms: 0,
        }
    }

    /// Creates a wind with a random direction and a speed in `[5, 35]`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let direction = rng.gen_range(0.0..360.0);
        let speed: u8 = rng.gen_range(5..=35);
        Self::new(direction, f32::from(speed))
    }

    /// Overrides the change interval.
    #[must_use]
    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Compass direction in degrees, `[0, 360)`.
    #[must_use]
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Speed, `[0, MAX_WIND_SPEED]`.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Minimum time between changes.
    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Clock value of the last change.
    #[must_use]
    pub fn last_change_ms(&self) -> u64 {
        self.last_change_ms
    }

    /// Restarts the change clock at `now_ms`.
    ///
    /// Called after restoring a snapshot, since the saved clock belongs to a
    /// previous session.
    pub fn reset_clock(&mut self, now_ms: u64) {
        self.last_change_ms = now_ms;
    }

    /// Advances the wind if at least one interval has elapsed.
    ///
    /// Returns `true` if the wind changed.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> bool {
        if now_ms.saturating_sub(self.last_change_ms) < self.interval_ms {
            return false;
        }

        let jitter = rng.gen_range(-DIRECTION_JITTER_DEG..=DIRECTION_JITTER_DEG);
        self.direction = normalize_degrees(self.direction + jitter);

        let drift = rng.gen_range(-SPEED_DRIFT..=SPEED_DRIFT);
        let bias = (MEAN_WIND_SPEED - self.speed) * MEAN_REVERSION;
        self.speed = (self.speed + drift + bias).clamp(0.0, MAX_WIND_SPEED);

        self.last_change_ms = now_ms;
        true
    }

    /// Cartesian wind force: `(cos θ, sin θ) * speed` with θ the direction in
    /// radians.
    #[must_use]
    pub fn vector(&self) -> Vec2 {
        heading_vector(self.direction) * self.speed
    }

    /// Screen-space drift of the wind: the compass bearing turned into a
    /// screen vector (0° points up, y grows downward), scaled by speed.
    #[must_use]
    pub fn screen_vector(&self) -> Vec2 {
        heading_vector(self.direction - 90.0) * self.speed
    }
}

impl Default for Wind {
    fn default() -> Self {
        Self::new(0.0, MEAN_WIND_SPEED)
    }
}
