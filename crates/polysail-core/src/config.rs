//! Immutable simulation configuration.
//!
//! A [`SimConfig`] is constructed once at startup (from defaults or a JSON
//! file) and passed by reference to the world, the session and the renderer.
//! Nothing in the crate mutates it after construction.
//!
//! # Example
//!
//! ```
//! use polysail_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! assert!(config.validate().is_ok());
//! assert!((config.fixed_dt() - 1.0 / 60.0).abs() < 1e-6);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default target frame rate of the session loop.
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Highest tick rate that still leaves a whole millisecond per frame.
pub const MAX_TICK_RATE_HZ: u32 = 1_000;

/// Half-extent of the generated sailing world on each axis.
pub const DEFAULT_WORLD_HALF_EXTENT: f32 = 20_000.0;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid JSON for a `SimConfig`.
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Geometry
// =============================================================================

/// Size of the render target in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ScreenSize {
    /// Creates a screen size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the centre point of the screen.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// The wrapped world rectangle `[-half_width, half_width] x [-half_height, half_height]`.
///
/// Leaving the rectangle on one edge re-enters on the opposite edge. Each axis
/// wraps independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Half-extent on the x axis
    pub half_width: f32,
    /// Half-extent on the y axis
    pub half_height: f32,
}

impl WorldBounds {
    /// Creates world bounds from half-extents.
    #[must_use]
    pub const fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width,
            half_height,
        }
    }

    /// Bounds matching the screen, used by the menu backdrop.
    #[must_use]
    pub fn screen_sized(screen: ScreenSize) -> Self {
        Self::new(screen.width, screen.height)
    }

    /// Wraps a position that has left the rectangle onto the opposite edge.
    ///
    /// Positions inside the rectangle are returned unchanged.
    ///
    /// ```
    /// use polysail_core::config::WorldBounds;
    /// use glam::Vec2;
    ///
    /// let bounds = WorldBounds::new(100.0, 50.0);
    /// assert_eq!(bounds.wrap(Vec2::new(101.0, 0.0)), Vec2::new(-100.0, 0.0));
    /// assert_eq!(bounds.wrap(Vec2::new(0.0, -51.0)), Vec2::new(0.0, 50.0));
    /// ```
    #[must_use]
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(position.x, self.half_width),
            wrap_axis(position.y, self.half_height),
        )
    }

    /// Returns true if the position lies inside the rectangle (edges included).
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x.abs() <= self.half_width && position.y.abs() <= self.half_height
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_HALF_EXTENT, DEFAULT_WORLD_HALF_EXTENT)
    }
}

fn wrap_axis(value: f32, half_extent: f32) -> f32 {
    if value < -half_extent {
        half_extent
    } else if value > half_extent {
        -half_extent
    } else {
        value
    }
}

// =============================================================================
// Colours
// =============================================================================

/// RGBA colour handed to the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque colour from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns the same colour with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation between two colours, `t` clamped to `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) * (1.0 - t) + f32::from(b) * t) as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Named colours used across the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Background of text and outlines
    pub black: Color,
    /// Menu buttons and island label background
    pub blue: Color,
    /// Islands
    pub green: Color,
    /// Rocks
    pub grey: Color,
    /// Sea
    pub light_blue: Color,
    /// Control pads, dock buttons, wind arrow
    pub red: Color,
    /// Boat, clouds, seagulls, text
    pub white: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            black: Color::rgb(0, 0, 0),
            blue: Color::rgb(50, 150, 200),
            green: Color::rgb(40, 200, 100),
            grey: Color::rgb(91, 102, 125),
            light_blue: Color::rgb(100, 200, 255),
            red: Color::rgb(200, 50, 50),
            white: Color::rgb(250, 250, 250),
        }
    }
}

// =============================================================================
// World generation
// =============================================================================

/// Parameters for populating a new world.
///
/// Entity counts are derived from the world half-height divided by the
/// matching spacing, so a larger world is proportionally busier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// World half-height per cloud
    pub cloud_spacing: f32,
    /// World half-height per island
    pub island_spacing: f32,
    /// World half-height per rock
    pub rock_spacing: f32,
    /// Minimum distance between the boat spawn and a generated obstacle
    pub spawn_clearance: f32,
    /// Random island radius range (inclusive)
    pub island_radius: (u32, u32),
    /// Random rock radius range (inclusive)
    pub rock_radius: (u32, u32),
    /// Radius of the island placed next to the boat at spawn
    pub starting_island_radius: f32,
    /// Downward offset of the starting island from the boat spawn
    pub starting_island_offset: f32,
    /// Seagulls per island (inclusive range)
    pub gulls_per_island: (u32, u32),
    /// Seagulls per rock (inclusive range)
    pub gulls_per_rock: (u32, u32),
    /// Wander radius of island seagulls
    pub island_gull_radius: f32,
    /// Wander radius of rock seagulls
    pub rock_gull_radius: f32,
    /// Clouds drifting behind the main menu
    pub menu_clouds: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            cloud_spacing: 200.0,
            island_spacing: 750.0,
            rock_spacing: 150.0,
            spawn_clearance: 200.0,
            island_radius: (200, 600),
            rock_radius: (10, 150),
            starting_island_radius: 200.0,
            starting_island_offset: 210.0,
            gulls_per_island: (1, 5),
            gulls_per_rock: (0, 3),
            island_gull_radius: 2000.0,
            rock_gull_radius: 700.0,
            menu_clouds: 25,
        }
    }
}

// =============================================================================
// SimConfig
// =============================================================================

/// Top-level configuration shared by the world, session and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Render target size
    pub screen: ScreenSize,
    /// Wrapped world rectangle
    pub world: WorldBounds,
    /// Target frames per second of the session loop
    pub tick_rate_hz: u32,
    /// Colour table
    pub palette: Palette,
    /// World population parameters
    pub generation: GenerationConfig,
}

impl SimConfig {
    /// Parses a config from JSON and validates it.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`SimConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks every value is inside its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "screen must be positive, got {}x{}",
                self.screen.width, self.screen.height
            )));
        }
        if self.world.half_width <= 0.0 || self.world.half_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "world half-extents must be positive, got {}x{}",
                self.world.half_width, self.world.half_height
            )));
        }
        if self.tick_rate_hz == 0 || self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_hz must be in 1..={MAX_TICK_RATE_HZ}, got {}",
                self.tick_rate_hz
            )));
        }

        let gen = &self.generation;
        for (name, spacing) in [
            ("cloud_spacing", gen.cloud_spacing),
            ("island_spacing", gen.island_spacing),
            ("rock_spacing", gen.rock_spacing),
        ] {
            if spacing <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {spacing}"
                )));
            }
        }
        for (name, (lo, hi)) in [
            ("island_radius", gen.island_radius),
            ("rock_radius", gen.rock_radius),
        ] {
            if lo == 0 || lo > hi {
                return Err(ConfigError::Invalid(format!(
                    "{name} range must satisfy 0 < min <= max, got ({lo}, {hi})"
                )));
            }
        }
        for (name, (lo, hi)) in [
            ("gulls_per_island", gen.gulls_per_island),
            ("gulls_per_rock", gen.gulls_per_rock),
        ] {
            if lo > hi {
                return Err(ConfigError::Invalid(format!(
                    "{name} range must satisfy min <= max, got ({lo}, {hi})"
                )));
            }
        }
        if gen.spawn_clearance < 0.0 {
            return Err(ConfigError::Invalid(
                "spawn_clearance must not be negative".into(),
            ));
        }
        let smallest_extent = self.world.half_width.min(self.world.half_height);
        if gen.spawn_clearance >= smallest_extent {
            return Err(ConfigError::Invalid(format!(
                "spawn_clearance {} leaves no room in a world of half-extent {smallest_extent}",
                gen.spawn_clearance
            )));
        }
        Ok(())
    }

    /// Fixed timestep in seconds derived from the tick rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Whole milliseconds per frame, never less than one.
    #[must_use]
    pub fn frame_ms(&self) -> u64 {
        (1_000 / u64::from(self.tick_rate_hz.max(1))).max(1)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            screen: ScreenSize::default(),
            world: WorldBounds::default(),
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            palette: Palette::default(),
            generation: GenerationConfig::default(),
        }
    }
}
