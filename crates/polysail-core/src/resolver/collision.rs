//! Boat-versus-obstacle contact resolution.
//!
//! Bounces never separate the boat from the obstacle. A boat that stays
//! inside keeps flipping every tick until it slows enough to dock (islands)
//! or the player steers out (rocks). The island a boat has just been
//! released from is ignored until the boat is clear of it.

use glam::Vec2;
use tracing::debug;

use crate::entity::boat::Boat;
use crate::entity::obstacle::{Island, Rock};
use crate::entity::{EntityId, EntityTag, WorldObject};

/// Outcome of a tick's resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// The boat hit an obstacle and turned around.
    Bounced {
        /// Obstacle that was hit
        obstacle: EntityId,
        /// Kind of obstacle
        tag: EntityTag,
        /// Unit vector from the obstacle centre toward the boat
        normal: Vec2,
    },
    /// The boat docked at an island.
    Docked {
        /// Island docked at
        island: EntityId,
    },
}

/// Resolves at most one boat contact per tick.
///
/// # Example
///
/// ```
/// use polysail_core::entity::boat::Boat;
/// use polysail_core::entity::obstacle::Island;
/// use polysail_core::entity::EntityId;
/// use polysail_core::resolver::{CollisionResolver, Contact};
/// use glam::Vec2;
///
/// let island = Island::new(EntityId::new(1), Vec2::ZERO, 200.0, "sor".into());
/// let mut boat = Boat::new(Vec2::new(0.0, 100.0));
///
/// let contact = CollisionResolver::new().resolve(&mut boat, &[], &[island]);
/// assert_eq!(contact, Some(Contact::Docked { island: EntityId::new(1) }));
/// assert!(boat.is_docked());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks the boat against every rock, then every island, and applies
    /// the first contact found.
    ///
    /// A hit whose bounce is a no-op (boat exactly on the obstacle centre)
    /// does not count and the scan continues.
    pub fn resolve(&self, boat: &mut Boat, rocks: &[Rock], islands: &[Island]) -> Option<Contact> {
        if boat.is_docked() {
            return None;
        }

        for rock in rocks {
            if !rock.check_collision(boat.position()) {
                continue;
            }
            if let Some(normal) = boat.bounce_back(rock.position()) {
                debug!(rock = %rock.id(), heading = boat.orientation(), "bounced off rock");
                return Some(Contact::Bounced {
                    obstacle: rock.id(),
                    tag: EntityTag::Rock,
                    normal,
                });
            }
        }

        for island in islands {
            if boat.leaving() == Some(island.id()) {
                if island.contains(boat.position()) {
                    continue;
                }
                boat.clear_leaving();
            }
            if island.check_docking(boat) {
                boat.dock_at(island.id());
                debug!(island = %island.id(), name = island.name(), "docked");
                return Some(Contact::Docked { island: island.id() });
            }
            if island.contains(boat.position()) {
                if let Some(normal) = boat.bounce_back(island.position()) {
                    debug!(
                        island = %island.id(),
                        speed = boat.speed(),
                        "too fast to dock, bounced"
                    );
                    return Some(Contact::Bounced {
                        obstacle: island.id(),
                        tag: EntityTag::Island,
                        normal,
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rock(id: u64, at: Vec2, radius: f32) -> Rock {
        Rock::new(EntityId::new(id), at, radius)
    }

    fn island(id: u64, at: Vec2, radius: f32) -> Island {
        Island::new(EntityId::new(id), at, radius, "tan".into())
    }

    mod rock_tests {
        use super::*;

        #[test]
        fn rock_hit_flips_heading() {
            let mut boat = Boat::new(Vec2::new(0.0, 50.0));
            boat.set_orientation(180.0);
            let rocks = [rock(1, Vec2::ZERO, 60.0)];

            let contact = CollisionResolver::new().resolve(&mut boat, &rocks, &[]);
            assert!(matches!(
                contact,
                Some(Contact::Bounced { tag: EntityTag::Rock, .. })
            ));
            assert!(boat.orientation().abs() < 1e-4);
        }

        #[test]
        fn miss_leaves_boat_alone() {
            let mut boat = Boat::new(Vec2::new(0.0, 500.0));
            let before = boat.clone();
            let rocks = [rock(1, Vec2::ZERO, 60.0)];
            assert_eq!(CollisionResolver::new().resolve(&mut boat, &rocks, &[]), None);
            assert_eq!(boat, before);
        }

        #[test]
        fn first_rock_wins() {
            let mut boat = Boat::new(Vec2::new(10.0, 0.0));
            let rocks = [rock(1, Vec2::ZERO, 50.0), rock(2, Vec2::new(20.0, 0.0), 50.0)];
            let contact = CollisionResolver::new().resolve(&mut boat, &rocks, &[]);
            match contact {
                Some(Contact::Bounced { obstacle, .. }) => assert_eq!(obstacle, EntityId::new(1)),
                other => panic!("unexpected {other:?}"),
            }
            // Only one flip.
            assert!((boat.orientation() - 270.0).abs() < 1e-4);
        }

        #[test]
        fn centre_hit_falls_through_to_next_obstacle() {
            let mut boat = Boat::new(Vec2::ZERO);
            let rocks = [rock(1, Vec2::ZERO, 50.0), rock(2, Vec2::new(30.0, 0.0), 50.0)];
            let contact = CollisionResolver::new().resolve(&mut boat, &rocks, &[]);
            match contact {
                Some(Contact::Bounced { obstacle, normal, .. }) => {
                    assert_eq!(obstacle, EntityId::new(2));
                    assert!((normal + Vec2::X).length() < 1e-6);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    mod island_tests {
        use super::*;

        #[test]
        fn slow_boat_docks() {
            let mut boat = Boat::new(Vec2::new(0.0, 100.0));
            boat.set_speed(1.0);
            let islands = [island(4, Vec2::ZERO, 200.0)];
            let contact = CollisionResolver::new().resolve(&mut boat, &[], &islands);
            assert_eq!(contact, Some(Contact::Docked { island: EntityId::new(4) }));
            assert_eq!(boat.speed(), 0.0);
        }

        #[test]
        fn fast_boat_bounces() {
            let mut boat = Boat::new(Vec2::new(0.0, 100.0));
            boat.set_speed(5.0);
            let islands = [island(4, Vec2::ZERO, 200.0)];
            let contact = CollisionResolver::new().resolve(&mut boat, &[], &islands);
            assert!(matches!(
                contact,
                Some(Contact::Bounced { tag: EntityTag::Island, .. })
            ));
            assert!(!boat.is_docked());
            assert!((boat.orientation() - 270.0).abs() < 1e-4);
        }

        #[test]
        fn rock_checked_before_island() {
            let mut boat = Boat::new(Vec2::new(0.0, 100.0));
            let rocks = [rock(1, Vec2::new(0.0, 120.0), 30.0)];
            let islands = [island(4, Vec2::ZERO, 200.0)];
            let contact = CollisionResolver::new().resolve(&mut boat, &rocks, &islands);
            assert!(matches!(
                contact,
                Some(Contact::Bounced { tag: EntityTag::Rock, .. })
            ));
            assert!(!boat.is_docked());
        }

        #[test]
        fn docked_boat_is_not_resolved() {
            let mut boat = Boat::new(Vec2::new(0.0, 100.0));
            boat.dock_at(EntityId::new(9));
            let rocks = [rock(1, Vec2::new(0.0, 100.0), 30.0)];
            let islands = [island(4, Vec2::ZERO, 200.0)];
            assert_eq!(CollisionResolver::new().resolve(&mut boat, &rocks, &islands), None);
            assert_eq!(boat.docked_at(), Some(EntityId::new(9)));
        }

        #[test]
        fn released_boat_does_not_redock_immediately() {
            let mut boat = Boat::new(Vec2::new(0.0, 100.0));
            let islands = [island(4, Vec2::ZERO, 200.0)];
            let resolver = CollisionResolver::new();

            resolver.resolve(&mut boat, &[], &islands);
            assert!(boat.is_docked());

            boat.release();
            assert!(!islands[0].check_docking(&boat));
            let contact = resolver.resolve(&mut boat, &[], &islands);
            assert!(!matches!(contact, Some(Contact::Docked { .. })));
            assert!(!boat.is_docked());
        }

        #[test]
        fn released_boat_sails_out_without_bouncing() {
            let mut boat = Boat::new(Vec2::new(0.0, 150.0));
            boat.set_orientation(180.0);
            let islands = [island(4, Vec2::ZERO, 200.0)];
            let resolver = CollisionResolver::new();
            resolver.resolve(&mut boat, &[], &islands);
            boat.release();
            assert_eq!(boat.leaving(), Some(EntityId::new(4)));

            assert_eq!(resolver.resolve(&mut boat, &[], &islands), None);
            assert!((boat.orientation() - 0.0).abs() < 1e-4);

            boat.set_position(Vec2::new(0.0, 250.0));
            resolver.resolve(&mut boat, &[], &islands);
            assert_eq!(boat.leaving(), None);
        }

        #[test]
        fn released_boat_docks_again_once_slow() {
            use crate::entity::boat::DOCKING_SPEED_THRESHOLD;

            let mut boat = Boat::new(Vec2::new(0.0, 100.0));
            let islands = [island(4, Vec2::ZERO, 200.0)];
            let resolver = CollisionResolver::new();
            resolver.resolve(&mut boat, &[], &islands);
            boat.release();

            let calm = crate::wind::Wind::new(0.0, 0.0);
            let mut steps = 0;
            while boat.speed() >= DOCKING_SPEED_THRESHOLD && steps < 10_000 {
                boat.apply_wind(&calm, 1.0 / 60.0);
                steps += 1;
            }
            assert!(boat.speed() < DOCKING_SPEED_THRESHOLD);
            assert!(islands[0].check_docking(&boat));
            assert_eq!(resolver.resolve(&mut boat, &[], &islands), None);

            boat.set_position(Vec2::new(0.0, 250.0));
            assert_eq!(resolver.resolve(&mut boat, &[], &islands), None);
            assert_eq!(boat.leaving(), None);

            boat.set_position(Vec2::new(0.0, 190.0));
            assert_eq!(
                resolver.resolve(&mut boat, &[], &islands),
                Some(Contact::Docked { island: EntityId::new(4) })
            );
            assert!(boat.is_docked());
        }

        #[test]
        fn leaving_one_island_does_not_shield_another() {
            let mut boat = Boat::new(Vec2::new(0.0, 100.0));
            boat.dock_at(EntityId::new(4));
            boat.release();
            boat.set_speed(5.0);
            let islands = [island(7, Vec2::ZERO, 200.0)];
            let contact = CollisionResolver::new().resolve(&mut boat, &[], &islands);
            assert!(matches!(contact, Some(Contact::Bounced { .. })));
        }
    }
}
