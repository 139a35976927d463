//! Builders for scripted worlds and helpers that drive them.

use glam::Vec2;

use crate::config::{SimConfig, WorldBounds};
use crate::entity::boat::Boat;
use crate::entity::obstacle::{Island, Rock};
use crate::entity::EntityId;
use crate::persistence::SaveData;
use crate::resolver::Contact;
use crate::wind::Wind;
use crate::world::{World, FIXED_DT};

/// Milliseconds per tick at 60 Hz, rounded down.
pub const TICK_MS: u64 = 16;

// =============================================================================
// Configs
// =============================================================================

/// Default config on a 3000 × 3000 half-extent world.
pub fn small_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.world = WorldBounds::new(3_000.0, 3_000.0);
    config
}

// =============================================================================
// Worlds
// =============================================================================

/// Builds a world with exactly these obstacles, boat and wind.
///
/// Clouds and seagulls are still generated around the obstacles.
pub fn scripted_world(boat: Boat, islands: Vec<Island>, rocks: Vec<Rock>, wind: Wind) -> World {
    let save = SaveData::new(boat, islands, rocks, wind);
    World::from_save(&small_config(), save, 0, 0).unwrap()
}

/// Open water with a steady wind; no obstacles.
pub fn open_water(boat: Boat, wind: Wind) -> World {
    scripted_world(boat, Vec::new(), Vec::new(), wind)
}

/// Wind that never shifts during a test.
pub fn steady_wind(direction: f32, speed: f32) -> Wind {
    Wind::new(direction, speed).with_interval(u64::MAX)
}

/// A boat at `position` heading `heading`, fully unreefed with the sail at
/// `sail`.
pub fn rigged_boat(position: Vec2, heading: f32, sail: f32) -> Boat {
    let mut boat = Boat::new(position);
    boat.set_orientation(heading);
    boat.adjust_reef(10.0);
    boat.adjust_sail(sail - boat.sail());
    boat
}

/// Island with a fixed name.
pub fn island(id: u64, position: Vec2, radius: f32) -> Island {
    Island::new(EntityId::new(id), position, radius, "talo".into())
}

/// Rock with the given id.
pub fn rock(id: u64, position: Vec2, radius: f32) -> Rock {
    Rock::new(EntityId::new(id), position, radius)
}

// =============================================================================
// Drivers
// =============================================================================

/// Runs `ticks` fixed steps starting after `start_ms`. Returns the clock
/// after the last step.
pub fn run_ticks(world: &mut World, ticks: u64, start_ms: u64) -> u64 {
    let mut now = start_ms;
    for _ in 0..ticks {
        now += TICK_MS;
        world.tick(now, FIXED_DT);
    }
    now
}

/// Ticks until a contact is resolved or `max_ticks` pass.
pub fn run_until_contact(world: &mut World, max_ticks: u64) -> Option<Contact> {
    let mut now = 0;
    for _ in 0..max_ticks {
        now += TICK_MS;
        if let Some(contact) = world.tick(now, FIXED_DT) {
            return Some(contact);
        }
    }
    None
}
