//! The sailing world and its per-tick loop.
//!
//! A [`World`] owns every entity, the wind, the camera and the seeded RNG.
//! One call to [`World::tick`] advances everything by one fixed step:
//!
//! 1. Wind update (interval-gated on the supplied clock)
//! 2. Clouds drift with the wind
//! 3. Seagulls near the camera wander
//! 4. Boat propulsion, then movement (wakes age even while docked)
//! 5. Collision and docking resolution
//! 6. Camera re-centred on the boat
//!
//! [`World::draw`] then hands every visible entity to a [`Canvas`].
//!
//! The same seed and the same sequence of inputs and clock values always
//! produce the same world.
//!
//! # Example
//!
//! ```
//! use polysail_core::config::SimConfig;
//! use polysail_core::render::DrawList;
//! use polysail_core::world::{World, FIXED_DT};
//!
//! let config = SimConfig::default();
//! let mut world = World::generate(&config, 42);
//!
//! let mut now_ms = 0;
//! for _ in 0..60 {
//!     now_ms += 16;
//!     world.tick(now_ms, FIXED_DT);
//! }
//!
//! let mut canvas = DrawList::new();
//! let stats = world.draw(&mut canvas, &config.palette);
//! assert!(stats.drawn > 0);
//! ```

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::{Palette, ScreenSize, SimConfig, WorldBounds};
use crate::entity::ambient::{Cloud, Seagull};
use crate::entity::boat::Boat;
use crate::entity::names::island_name;
use crate::entity::obstacle::{Island, Rock};
use crate::entity::{Camera, EntityId, WorldObject};
use crate::persistence::{PersistenceError, SaveData};
use crate::render::Canvas;
use crate::resolver::{CollisionResolver, Contact, EventLog, SimEvent};
use crate::wind::Wind;

/// Fixed timestep for a 60 Hz session (1/60 second).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Seagulls farther than this from the view centre are frozen.
pub const SEAGULL_ACTIVITY_RADIUS: f32 = 4_000.0;

/// Counts from one draw pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Entities handed to the canvas
    pub drawn: usize,
    /// Entities skipped by the visibility check
    pub culled: usize,
}

impl DrawStats {
    fn record(&mut self, visible: bool) {
        if visible {
            self.drawn += 1;
        } else {
            self.culled += 1;
        }
    }
}

/// Culls and draws one entity.
fn draw_object<T, C>(
    object: &mut T,
    camera: &Camera,
    screen: ScreenSize,
    palette: &Palette,
    canvas: &mut C,
    stats: &mut DrawStats,
) where
    T: WorldObject,
    C: Canvas + ?Sized,
{
    let visible = object.is_visible(camera, screen);
    stats.record(visible);
    if visible {
        let offset = object.camera_offset(camera);
        canvas.draw(object.tag(), offset, &object.draw_shape(palette));
    }
}

fn random_point<R: Rng + ?Sized>(bounds: &WorldBounds, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen_range(-bounds.half_width..=bounds.half_width),
        rng.gen_range(-bounds.half_height..=bounds.half_height),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_for(bounds: &WorldBounds, spacing: f32) -> usize {
    (bounds.half_height / spacing) as usize
}

// =============================================================================
// World
// =============================================================================

/// The open-water world the boat sails in.
#[derive(Debug, Clone)]
pub struct World {
    bounds: WorldBounds,
    screen: ScreenSize,
    boat: Boat,
    wind: Wind,
    islands: Vec<Island>,
    rocks: Vec<Rock>,
    clouds: Vec<Cloud>,
    seagulls: Vec<Seagull>,
    camera: Camera,
    resolver: CollisionResolver,
    events: EventLog,
    rng: ChaCha8Rng,
    next_id: u64,
    tick: u64,
}

impl World {
    fn empty(config: &SimConfig, boat: Boat, wind: Wind, seed: u64) -> Self {
        let camera = Camera::centered_on(boat.position(), config.screen);
        Self {
            bounds: config.world,
            screen: config.screen,
            boat,
            wind,
            islands: Vec::new(),
            rocks: Vec::new(),
            clouds: Vec::new(),
            seagulls: Vec::new(),
            camera,
            resolver: CollisionResolver::new(),
            events: EventLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 1,
            tick: 0,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Generates a fresh world.
    ///
    /// The boat spawns at the screen centre with a small island just south
    /// of it. Other islands and rocks are scattered uniformly, never closer
    /// than the configured clearance to the spawn point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn generate(config: &SimConfig, seed: u64) -> Self {
        let params = &config.generation;
        let spawn = config.screen.center();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let wind = Wind::random(&mut rng);
        let mut world = Self::empty(config, Boat::new(spawn), wind, seed);
        world.rng = rng;

        let id = world.allocate_id();
        let name = island_name(&mut world.rng);
        world.islands.push(Island::new(
            id,
            spawn + Vec2::new(0.0, params.starting_island_offset),
            params.starting_island_radius,
            name,
        ));

        let clearance_sq = params.spawn_clearance * params.spawn_clearance;
        for _ in 0..count_for(&config.world, params.island_spacing) {
            let position = world.clear_point(spawn, clearance_sq);
            let radius = world.rng.gen_range(params.island_radius.0..=params.island_radius.1);
            let id = world.allocate_id();
            let name = island_name(&mut world.rng);
            world.islands.push(Island::new(id, position, radius as f32, name));
        }

        for _ in 0..count_for(&config.world, params.rock_spacing) {
            let position = world.clear_point(spawn, clearance_sq);
            let radius = world.rng.gen_range(params.rock_radius.0..=params.rock_radius.1);
            let id = world.allocate_id();
            world.rocks.push(Rock::new(id, position, radius as f32));
        }

        world.populate_ambient(config);
        info!(
            seed,
            islands = world.islands.len(),
            rocks = world.rocks.len(),
            clouds = world.clouds.len(),
            seagulls = world.seagulls.len(),
            "world generated"
        );
        world
    }

    /// Rebuilds a world from a snapshot.
    ///
    /// Clouds and seagulls are regenerated from `seed`. The wind clock is
    /// restarted at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`SaveData::validate`].
    pub fn from_save(
        config: &SimConfig,
        save: SaveData,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, PersistenceError> {
        save.validate()?;
        let SaveData {
            mut boat,
            islands,
            rocks,
            mut wind,
            ..
        } = save;
        boat.clear_transient();
        wind.reset_clock(now_ms);

        let mut world = Self::empty(config, boat, wind, seed);
        world.next_id = islands
            .iter()
            .map(|i| i.id().as_u64())
            .chain(rocks.iter().map(|r| r.id().as_u64()))
            .max()
            .map_or(1, |max| max + 1);
        world.islands = islands;
        world.rocks = rocks;
        world.populate_ambient(config);
        info!(
            islands = world.islands.len(),
            rocks = world.rocks.len(),
            docked = world.boat.is_docked(),
            "world restored"
        );
        Ok(world)
    }

    fn clear_point(&mut self, spawn: Vec2, clearance_sq: f32) -> Vec2 {
        loop {
            let p = random_point(&self.bounds, &mut self.rng);
            if p.distance_squared(spawn) >= clearance_sq {
                return p;
            }
        }
    }

    fn populate_ambient(&mut self, config: &SimConfig) {
        let params = &config.generation;
        let mut seagulls = Vec::new();
        for island in &self.islands {
            let n = self.rng.gen_range(params.gulls_per_island.0..=params.gulls_per_island.1);
            for _ in 0..n {
                seagulls.push(Seagull::new(
                    island.position(),
                    params.island_gull_radius,
                    &mut self.rng,
                ));
            }
        }
        for rock in &self.rocks {
            let n = self.rng.gen_range(params.gulls_per_rock.0..=params.gulls_per_rock.1);
            for _ in 0..n {
                seagulls.push(Seagull::new(rock.position(), params.rock_gull_radius, &mut self.rng));
            }
        }
        self.seagulls = seagulls;

        self.clouds = (0..count_for(&self.bounds, params.cloud_spacing))
            .map(|_| Cloud::random(&self.bounds, &mut self.rng))
            .collect();
    }

    /// Snapshot of the persistent state, transient fields cleared.
    #[must_use]
    pub fn snapshot(&self) -> SaveData {
        let mut boat = self.boat.clone();
        boat.clear_transient();
        SaveData::new(boat, self.islands.clone(), self.rocks.clone(), self.wind.clone())
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advances the world by one step of `dt` seconds at clock `now_ms`.
    ///
    /// Returns the contact resolved this tick, if any.
    pub fn tick(&mut self, now_ms: u64, dt: f32) -> Option<Contact> {
        if self.wind.update(now_ms, &mut self.rng) {
            debug!(
                direction = self.wind.direction(),
                speed = self.wind.speed(),
                "wind shifted"
            );
            self.events.push(SimEvent::WindShifted {
                direction: self.wind.direction(),
                speed: self.wind.speed(),
            });
        }

        for cloud in &mut self.clouds {
            cloud.apply_wind(&self.wind, &self.bounds, &mut self.rng);
        }

        let view_centre = self.camera.position + self.screen.center();
        let active_sq = SEAGULL_ACTIVITY_RADIUS * SEAGULL_ACTIVITY_RADIUS;
        for gull in &mut self.seagulls {
            if gull.position().distance_squared(view_centre) <= active_sq {
                gull.update(now_ms, &self.bounds, &mut self.rng);
            }
        }

        self.boat.apply_wind(&self.wind, dt);
        self.boat.advance(dt, &self.bounds);

        let contact = self.resolver.resolve(&mut self.boat, &self.rocks, &self.islands);
        match contact {
            Some(Contact::Docked { island }) => {
                self.events.push(SimEvent::Docked { island });
            }
            Some(Contact::Bounced { obstacle, tag, .. }) => {
                self.events.push(SimEvent::Bounced { obstacle, tag });
            }
            None => {}
        }

        self.camera = Camera::centered_on(self.boat.position(), self.screen);
        self.tick += 1;
        contact
    }

    /// Leaves the island the boat is docked at.
    ///
    /// Returns the island left, or `None` if the boat was sailing.
    pub fn release_boat(&mut self) -> Option<EntityId> {
        let island = self.boat.release()?;
        info!(island = %island, "set sail");
        self.events.push(SimEvent::Released { island });
        Some(island)
    }

    /// Hands every visible entity to the canvas, back to front: rocks,
    /// islands, wakes, boat, seagulls, clouds.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C, palette: &Palette) -> DrawStats {
        let mut stats = DrawStats::default();
        let (camera, screen) = (self.camera, self.screen);

        for rock in &mut self.rocks {
            draw_object(rock, &camera, screen, palette, canvas, &mut stats);
        }
        for island in &mut self.islands {
            draw_object(island, &camera, screen, palette, canvas, &mut stats);
        }
        for wake in self.boat.wakes_mut().filter(|w| !w.is_expired()) {
            draw_object(wake, &camera, screen, palette, canvas, &mut stats);
        }
        draw_object(&mut self.boat, &camera, screen, palette, canvas, &mut stats);
        for gull in &mut self.seagulls {
            draw_object(gull, &camera, screen, palette, canvas, &mut stats);
        }
        for cloud in &mut self.clouds {
            draw_object(cloud, &camera, screen, palette, canvas, &mut stats);
        }

        stats
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The player boat.
    #[must_use]
    pub fn boat(&self) -> &Boat {
        &self.boat
    }

    /// Mutable access to the boat for control input.
    pub fn boat_mut(&mut self) -> &mut Boat {
        &mut self.boat
    }

    /// Current wind.
    #[must_use]
    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    /// All islands.
    #[must_use]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// All rocks.
    #[must_use]
    pub fn rocks(&self) -> &[Rock] {
        &self.rocks
    }

    /// All clouds.
    #[must_use]
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// All seagulls.
    #[must_use]
    pub fn seagulls(&self) -> &[Seagull] {
        &self.seagulls
    }

    /// Island with the given id.
    #[must_use]
    pub fn island(&self, id: EntityId) -> Option<&Island> {
        self.islands.iter().find(|i| i.id() == id)
    }

    /// Island the boat is docked at, if any.
    #[must_use]
    pub fn docked_island(&self) -> Option<&Island> {
        self.boat.docked_at().and_then(|id| self.island(id))
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// World rectangle.
    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Ticks run since creation.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        self.events.take_events()
    }
}

// =============================================================================
// Menu backdrop
// =============================================================================

/// Clouds drifting behind the main menu.
///
/// Uses its own screen-sized wrap rectangle and a fixed camera at the
/// origin; no boat or obstacles.
#[derive(Debug, Clone)]
pub struct MenuBackdrop {
    bounds: WorldBounds,
    screen: ScreenSize,
    wind: Wind,
    clouds: Vec<Cloud>,
    rng: ChaCha8Rng,
}

impl MenuBackdrop {
    /// Creates a backdrop with the configured number of clouds.
    #[must_use]
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        let bounds = WorldBounds::screen_sized(config.screen);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let wind = Wind::random(&mut rng);
        let clouds = (0..config.generation.menu_clouds)
            .map(|_| Cloud::random(&bounds, &mut rng))
            .collect();
        Self {
            bounds,
            screen: config.screen,
            wind,
            clouds,
            rng,
        }
    }

    /// Moves the clouds one step.
    pub fn tick(&mut self, now_ms: u64) {
        self.wind.update(now_ms, &mut self.rng);
        for cloud in &mut self.clouds {
            cloud.apply_wind(&self.wind, &self.bounds, &mut self.rng);
        }
    }

    /// Draws the visible clouds.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C, palette: &Palette) -> DrawStats {
        let mut stats = DrawStats::default();
        let camera = Camera::default();
        for cloud in &mut self.clouds {
            draw_object(cloud, &camera, self.screen, palette, canvas, &mut stats);
        }
        stats
    }

    /// The drifting clouds.
    #[must_use]
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }
}
