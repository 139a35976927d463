//! Stationary obstacles: dockable islands and rocks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boat::{Boat, DOCKING_SPEED_THRESHOLD};
use super::names::display_name;
use super::{EntityId, EntityTag, OffsetCache, WorldObject};
use crate::config::Palette;
use crate::render::Shape;

/// Fraction of a rock's radius that still counts as a hit.
pub const ROCK_HIT_FACTOR: f32 = 1.05;

// =============================================================================
// Island
// =============================================================================

/// A round island the boat can dock at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Island {
    id: EntityId,
    position: Vec2,
    radius: f32,
    name: String,
    #[serde(skip)]
    offset_cache: OffsetCache,
}

impl Island {
    /// Creates an island.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2, radius: f32, name: String) -> Self {
        Self {
            id,
            position,
            radius,
            name,
            offset_cache: OffsetCache::default(),
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Island radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Generated name, lower case.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as displayed on the label.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    /// True if `point` lies inside the island (edge included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }

    /// True if the boat may dock here right now: it is over the island,
    /// slower than [`DOCKING_SPEED_THRESHOLD`] and not already docked.
    ///
    /// ```
    /// use polysail_core::entity::boat::Boat;
    /// use polysail_core::entity::obstacle::Island;
    /// use polysail_core::entity::EntityId;
    /// use glam::Vec2;
    ///
    /// let island = Island::new(EntityId::new(1), Vec2::ZERO, 200.0, "kalo".into());
    /// let mut boat = Boat::new(Vec2::new(0.0, 150.0));
    /// assert!(island.check_docking(&boat));
    ///
    /// boat.set_speed(5.0);
    /// assert!(!island.check_docking(&boat));
    /// ```
    #[must_use]
    pub fn check_docking(&self, boat: &Boat) -> bool {
        self.contains(boat.position())
            && boat.speed() < DOCKING_SPEED_THRESHOLD
            && !boat.is_docked()
    }
}

impl WorldObject for Island {
    fn tag(&self) -> EntityTag {
        EntityTag::Island
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> f32 {
        self.radius
    }

    fn offset_cache(&mut self) -> &mut OffsetCache {
        &mut self.offset_cache
    }

    fn draw_shape(&self, palette: &Palette) -> Shape<'_> {
        Shape::Circle {
            radius: self.radius,
            color: palette.green,
        }
    }
}

// =============================================================================
// Rock
// =============================================================================

/// A round rock the boat bounces off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    id: EntityId,
    position: Vec2,
    radius: f32,
    #[serde(skip)]
    offset_cache: OffsetCache,
}

impl Rock {
    /// Creates a rock.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2, radius: f32) -> Self {
        Self {
            id,
            position,
            radius,
            offset_cache: OffsetCache::default(),
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Rock radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// True if `point` is within [`ROCK_HIT_FACTOR`] radii of the centre.
    #[must_use]
    pub fn check_collision(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.radius * ROCK_HIT_FACTOR
    }
}

impl WorldObject for Rock {
    fn tag(&self) -> EntityTag {
        EntityTag::Rock
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> f32 {
        self.radius
    }

    fn offset_cache(&mut self) -> &mut OffsetCache {
        &mut self.offset_cache
    }

    fn draw_shape(&self, palette: &Palette) -> Shape<'_> {
        Shape::Circle {
            radius: self.radius,
            color: palette.grey,
        }
    }
}
