//! World entities and the behaviour they share.
//!
//! This module provides:
//! - [`EntityId`]: stable identifier for obstacles (islands and rocks)
//! - [`EntityTag`]: kind of a world object, used by the renderer and events
//! - [`Camera`]: the top-left corner of the visible screen in world space
//! - [`OffsetCache`]: memoised camera-relative offset
//! - [`WorldObject`]: the trait every drawable entity implements
//!
//! Concrete entities live in the submodules:
//! - [`boat`]: the player boat and its docking state machine
//! - [`ambient`]: clouds, seagulls and wakes
//! - [`obstacle`]: islands and rocks
//!
//! # Example
//!
//! ```
//! use polysail_core::config::ScreenSize;
//! use polysail_core::entity::{Camera, WorldObject};
//! use polysail_core::entity::obstacle::Rock;
//! use polysail_core::entity::EntityId;
//! use glam::Vec2;
//!
//! let screen = ScreenSize::new(800.0, 600.0);
//! let camera = Camera::centered_on(Vec2::ZERO, screen);
//! let mut rock = Rock::new(EntityId::new(1), Vec2::new(50.0, 0.0), 20.0);
//!
//! assert_eq!(rock.camera_offset(&camera), Vec2::new(450.0, 300.0));
//! assert!(rock.is_visible(&camera, screen));
//! ```

pub mod ambient;
pub mod boat;
pub mod names;
pub mod obstacle;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{Palette, ScreenSize};
use crate::render::Shape;

/// How many screen sizes beyond the visible area an entity may sit and
/// still be handed to the renderer.
pub const DRAW_MARGIN_SCREENS: f32 = 2.0;

// =============================================================================
// Identity
// =============================================================================

/// Unique identifier of an obstacle within a world.
///
/// Ids are assigned monotonically at world generation and survive a
/// save/load round trip, so a docked boat can refer to its island by id.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Kind of world object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The player boat
    Boat,
    /// Wind-driven cloud
    Cloud,
    /// Wandering seagull
    Seagull,
    /// Dockable island
    Island,
    /// Static rock
    Rock,
    /// Trail decal behind the boat
    Wake,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boat => write!(f, "Boat"),
            Self::Cloud => write!(f, "Cloud"),
            Self::Seagull => write!(f, "Seagull"),
            Self::Island => write!(f, "Island"),
            Self::Rock => write!(f, "Rock"),
            Self::Wake => write!(f, "Wake"),
        }
    }
}

// =============================================================================
// Camera
// =============================================================================

/// World-space position of the top-left corner of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left corner in world space
    pub position: Vec2,
}

impl Camera {
    /// Camera at an explicit world position.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Camera that puts `target` in the middle of the screen.
    #[must_use]
    pub fn centered_on(target: Vec2, screen: ScreenSize) -> Self {
        Self::new(target - screen.center())
    }

    /// Offset of a world position relative to the camera.
    #[must_use]
    pub fn offset_of(&self, position: Vec2) -> Vec2 {
        position - self.position
    }
}

/// Memoised camera-relative offset.
///
/// The offset is recomputed only when either the camera or the entity moved
/// since the last call. This is presentation state and is never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffsetCache {
    key: Option<(Vec2, Vec2)>,
    offset: Vec2,
}

impl OffsetCache {
    /// Returns the offset of `position` relative to `camera`.
    pub fn offset(&mut self, position: Vec2, camera: &Camera) -> Vec2 {
        let key = (camera.position, position);
        if self.key != Some(key) {
            self.offset = camera.offset_of(position);
            self.key = Some(key);
        }
        self.offset
    }

    /// True if an offset has been computed since the last clear.
    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.key.is_some()
    }

    /// Forgets the cached offset.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// True if an entity of `size` at a camera `offset` falls inside the expanded
/// draw margin around the screen.
#[must_use]
pub fn within_draw_margin(offset: Vec2, size: f32, screen: ScreenSize) -> bool {
    let (w, h) = (screen.width, screen.height);
    offset.x + size >= -w * DRAW_MARGIN_SCREENS
        && offset.x <= w * (DRAW_MARGIN_SCREENS + 1.0)
        && offset.y + size >= -h * DRAW_MARGIN_SCREENS
        && offset.y <= h * (DRAW_MARGIN_SCREENS + 1.0)
}

// =============================================================================
// WorldObject
// =============================================================================

/// Shared surface of every drawable world entity.
///
/// Implementors provide their position, size and shape; the trait supplies
/// the cached camera offset and the culling predicate used by the world draw
/// pass. Entities that move also expose their own update methods, since the
/// inputs differ per kind (wind, clock, delta time).
pub trait WorldObject {
    /// Kind of this entity.
    fn tag(&self) -> EntityTag;

    /// Centre in world space.
    fn position(&self) -> Vec2;

    /// Radius used for culling and collisions.
    fn size(&self) -> f32;

    /// Cache backing [`WorldObject::camera_offset`].
    fn offset_cache(&mut self) -> &mut OffsetCache;

    /// Description of what the renderer should draw at the entity's offset.
    fn draw_shape(&self, palette: &Palette) -> Shape<'_>;

    /// Camera-relative offset, recomputed only when something moved.
    fn camera_offset(&mut self, camera: &Camera) -> Vec2 {
        let position = self.position();
        self.offset_cache().offset(position, camera)
    }

    /// Cheap bounding check: is the entity close enough to the screen to draw?
    fn is_visible(&mut self, camera: &Camera, screen: ScreenSize) -> bool {
        let size = self.size();
        let offset = self.camera_offset(camera);
        within_draw_margin(offset, size, screen)
    }
}
