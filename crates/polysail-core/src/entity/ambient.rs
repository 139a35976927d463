//! Ambient entities: wakes, clouds and seagulls.
//!
//! None of these interact with the boat. Wakes are owned by the boat that
//! spawned them, clouds drift with the wind, and seagulls wander around a
//! fixed home point (an island or rock).

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{EntityTag, OffsetCache, WorldObject};
use crate::config::{Color, Palette, WorldBounds};
use crate::math::{heading_vector, normalize_degrees};
use crate::render::{Puff, Shape};
use crate::wind::Wind;

// =============================================================================
// Wake
// =============================================================================

/// Lifetime lost per second of simulated time.
pub const WAKE_DECAY_RATE: f32 = 5.0;

/// Radius gained per second of simulated time.
pub const WAKE_GROWTH_RATE: f32 = 5.0;

/// Radius of a freshly spawned wake.
pub const WAKE_INITIAL_SIZE: f32 = 10.0;

/// Minimum lifetime of a wake, regardless of boat speed.
pub const WAKE_MIN_LIFETIME: f32 = 10.0;

const WAKE_COLOR_START: Color = Color::rgb(180, 220, 255);
const WAKE_COLOR_END: Color = Color::rgb(100, 200, 255);

/// Short-lived trail decal left behind a moving boat.
#[derive(Debug, Clone, PartialEq)]
pub struct Wake {
    position: Vec2,
    lifetime: f32,
    max_lifetime: f32,
    size: f32,
    offset_cache: OffsetCache,
}

impl Wake {
    /// Spawns a wake for a boat moving at `speed`.
    ///
    /// Faster boats leave longer-lived wakes.
    #[must_use]
    pub fn new(speed: f32, position: Vec2) -> Self {
        Self::with_lifetime(WAKE_MIN_LIFETIME.max(speed * 0.75), position)
    }

    /// Spawns a wake with an explicit lifetime.
    #[must_use]
    pub fn with_lifetime(lifetime: f32, position: Vec2) -> Self {
        Self {
            position,
            lifetime,
            max_lifetime: lifetime,
            size: WAKE_INITIAL_SIZE,
            offset_cache: OffsetCache::default(),
        }
    }

    /// Ages the wake and grows its radius.
    pub fn update(&mut self, dt: f32) {
        self.lifetime = (self.lifetime - WAKE_DECAY_RATE * dt).max(0.0);
        self.size += WAKE_GROWTH_RATE * dt;
    }

    /// Remaining lifetime.
    #[must_use]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// True once the wake has no lifetime left. Expired wakes are not drawn.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Colour fading from bright to soft blue over the wake's life.
    #[must_use]
    pub fn color(&self) -> Color {
        let t = if self.max_lifetime > 0.0 {
            1.0 - self.lifetime / self.max_lifetime
        } else {
            1.0
        };
        WAKE_COLOR_START.lerp(WAKE_COLOR_END, t)
    }
}

impl WorldObject for Wake {
    fn tag(&self) -> EntityTag {
        EntityTag::Wake
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn offset_cache(&mut self) -> &mut OffsetCache {
        &mut self.offset_cache
    }

    fn draw_shape(&self, _palette: &Palette) -> Shape<'_> {
        Shape::Circle {
            radius: self.size,
            color: self.color(),
        }
    }
}

// =============================================================================
// Cloud
// =============================================================================

/// Radius of a cloud.
pub const CLOUD_SIZE: f32 = 50.0;

/// Number of blobs making up one cloud.
pub const CLOUD_PUFFS: usize = 25;

const CLOUD_WIND_FACTOR: f32 = 0.05;
const CLOUD_SWAY: f32 = 0.2;

/// Wind-driven cloud drawn over everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    position: Vec2,
    puffs: Vec<Puff>,
    offset_cache: OffsetCache,
}

impl Cloud {
    /// Cloud at a uniformly random position inside `bounds`.
    pub fn random<R: Rng + ?Sized>(bounds: &WorldBounds, rng: &mut R) -> Self {
        let position = Vec2::new(
            rng.gen_range(-bounds.half_width..=bounds.half_width),
            rng.gen_range(-bounds.half_height..=bounds.half_height),
        );
        Self::at(position, rng)
    }

    /// Cloud at an explicit position with a random puff layout.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn at<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Self {
        let max_radius = (CLOUD_SIZE / 2.0) as i32;
        let puffs = (0..CLOUD_PUFFS)
            .map(|_| Puff {
                offset: Vec2::new(
                    rng.gen_range(-max_radius..=max_radius) as f32,
                    rng.gen_range(-max_radius..=max_radius) as f32,
                ),
                radius: rng.gen_range(max_radius / 2..=max_radius) as f32,
                alpha: rng.gen_range(200..=250),
            })
            .collect();
        Self {
            position,
            puffs,
            offset_cache: OffsetCache::default(),
        }
    }

    /// The fixed puff layout.
    #[must_use]
    pub fn puffs(&self) -> &[Puff] {
        &self.puffs
    }

    /// Drifts the cloud downwind with a little random sway, then wraps.
    pub fn apply_wind<R: Rng + ?Sized>(&mut self, wind: &Wind, bounds: &WorldBounds, rng: &mut R) {
        let sway = Vec2::new(
            rng.gen_range(-CLOUD_SWAY..=CLOUD_SWAY),
            rng.gen_range(-CLOUD_SWAY..=CLOUD_SWAY),
        );
        self.position = bounds.wrap(self.position + wind.screen_vector() * CLOUD_WIND_FACTOR + sway);
    }
}

impl WorldObject for Cloud {
    fn tag(&self) -> EntityTag {
        EntityTag::Cloud
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> f32 {
        CLOUD_SIZE
    }

    fn offset_cache(&mut self) -> &mut OffsetCache {
        &mut self.offset_cache
    }

    fn draw_shape(&self, palette: &Palette) -> Shape<'_> {
        Shape::Puffs {
            puffs: &self.puffs,
            color: palette.white,
        }
    }
}

// =============================================================================
// Seagull
// =============================================================================

/// Wing span of a seagull.
pub const SEAGULL_SIZE: f32 = 20.0;

const SEAGULL_STEP_FACTOR: f32 = 1.5;
const FLAP_RATE: f32 = 0.05;
const FLAP_AMPLITUDE_DEG: f32 = 15.0;

/// Seagull wandering around a home point.
///
/// Movement runs on every second call to [`Seagull::update`]; the wing flap
/// animates on every call. Headings use the mathematical convention
/// (0° along +x), unlike the boat's compass heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Seagull {
    home: Vec2,
    max_radius: f32,
    position: Vec2,
    orientation: f32,
    speed: f32,
    flap_phase: f32,
    interval_ms: u64,
    last_change_ms: u64,
    move_pending: bool,
    offset_cache: OffsetCache,
}

impl Seagull {
    /// Seagull starting within half its wander radius of `home`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn new<R: Rng + ?Sized>(home: Vec2, max_radius: f32, rng: &mut R) -> Self {
        let half = (max_radius / 2.0) as i32;
        let start = home
            + Vec2::new(
                rng.gen_range(-half..=half) as f32,
                rng.gen_range(-half..=half) as f32,
            );
        let orientation: u16 = rng.gen_range(0..=360);
        Self {
            home,
            max_radius,
            position: start,
            orientation: f32::from(orientation),
            speed: rng.gen_range(1.5..=3.0),
            flap_phase: rng.gen_range(0.0..TAU),
            interval_ms: rng.gen_range(1_500..=2_500),
            last_change_ms: 0,
            move_pending: false,
            offset_cache: OffsetCache::default(),
        }
    }

    /// Anchor point the gull stays around.
    #[must_use]
    pub fn home(&self) -> Vec2 {
        self.home
    }

    /// Wander radius around the home point.
    #[must_use]
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Heading in degrees, mathematical convention.
    #[must_use]
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    /// Constant per-instance speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current wing deflection in degrees.
    #[must_use]
    pub fn flap_angle(&self) -> f32 {
        FLAP_AMPLITUDE_DEG * self.flap_phase.sin()
    }

    /// Advances the flap and, every second call, moves and steers the gull.
    ///
    /// Outside its wander radius the gull turns straight back home;
    /// otherwise it picks a random heading once per interval.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: u64, bounds: &WorldBounds, rng: &mut R) {
        self.flap_phase = (self.flap_phase + self.speed * FLAP_RATE) % TAU;

        if !self.move_pending {
            self.move_pending = true;
            return;
        }
        self.move_pending = false;

        let step = heading_vector(self.orientation) * self.speed * SEAGULL_STEP_FACTOR;
        self.position = bounds.wrap(self.position + step);

        let to_home = self.home - self.position;
        if to_home.length_squared() > self.max_radius * self.max_radius {
            self.orientation = normalize_degrees(to_home.y.atan2(to_home.x).to_degrees());
        } else if now_ms.saturating_sub(self.last_change_ms) > self.interval_ms {
            self.last_change_ms = now_ms;
            let heading: u16 = rng.gen_range(0..=360);
            self.orientation = f32::from(heading);
        }
    }
}

impl WorldObject for Seagull {
    fn tag(&self) -> EntityTag {
        EntityTag::Seagull
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> f32 {
        SEAGULL_SIZE
    }

    fn offset_cache(&mut self) -> &mut OffsetCache {
        &mut self.offset_cache
    }

    fn draw_shape(&self, palette: &Palette) -> Shape<'_> {
        Shape::Gull {
            span: SEAGULL_SIZE,
            flap_angle: self.flap_angle(),
            color: palette.white,
        }
    }
}
