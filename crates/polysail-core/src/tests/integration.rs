//! End-to-end scenarios through [`World::tick`].

use glam::Vec2;

use crate::entity::boat::{Boat, DOCKING_SPEED_THRESHOLD, MAX_WAKES, RELEASE_SPEED};
use crate::entity::{EntityId, EntityTag, WorldObject};
use crate::persistence::SaveData;
use crate::resolver::{Contact, SimEvent};
use crate::world::{World, FIXED_DT};

use super::helpers::{
    island, open_water, rigged_boat, rock, run_ticks, run_until_contact, scripted_world,
    small_config, steady_wind, TICK_MS,
};

fn coasting_boat(position: Vec2, heading: f32, speed: f32) -> Boat {
    let mut boat = Boat::new(position);
    boat.set_orientation(heading);
    boat.set_speed(speed);
    boat
}

// =============================================================================
// Sailing
// =============================================================================

mod sailing_tests {
    use super::*;

    #[test]
    fn beam_reach_outruns_head_to_wind() {
        let mut beam = open_water(rigged_boat(Vec2::ZERO, 90.0, 45.0), steady_wind(180.0, 20.0));
        let mut head = open_water(rigged_boat(Vec2::ZERO, 90.0, 45.0), steady_wind(90.0, 20.0));

        run_ticks(&mut beam, 600, 0);
        run_ticks(&mut head, 600, 0);

        assert!(beam.boat().speed() > head.boat().speed());
        assert!(beam.boat().position().x > head.boat().position().x);
        assert!(head.boat().position().x > 0.0);
    }

    #[test]
    fn wakes_trail_behind_a_moving_boat() {
        let mut world = open_water(rigged_boat(Vec2::ZERO, 90.0, 90.0), steady_wind(180.0, 20.0));
        run_ticks(&mut world, 600, 0);

        let boat = world.boat();
        assert!(!boat.wakes().is_empty());
        assert!(boat.wakes().len() <= MAX_WAKES);
        assert!(boat.wakes().iter().all(|w| w.position().x < boat.position().x));
    }

    #[test]
    fn boat_wraps_across_the_east_edge() {
        let mut world = open_water(coasting_boat(Vec2::new(2_999.0, 0.0), 90.0, 5.0), steady_wind(0.0, 0.0));
        run_ticks(&mut world, 3, 0);
        assert!(world.boat().position().x < -2_990.0);
    }

    #[test]
    fn controls_stay_clamped_through_a_voyage() {
        let mut world = open_water(rigged_boat(Vec2::ZERO, 0.0, 45.0), steady_wind(270.0, 35.0));
        let mut now = 0;
        for i in 0..900 {
            let boat = world.boat_mut();
            boat.adjust_rudder(if i % 300 < 150 { 1.0 } else { -1.0 });
            boat.adjust_sail(if i % 2 == 0 { 3.0 } else { -2.0 });
            boat.adjust_reef(-0.5);
            now = run_ticks(&mut world, 1, now);

            let boat = world.boat();
            assert!(boat.speed() >= 0.0);
            assert!((0.0..=90.0).contains(&boat.sail()));
            assert!((-30.0..=30.0).contains(&boat.rudder()));
            assert!((0.0..=1.0).contains(&boat.reef()));
        }
    }
}

// =============================================================================
// Obstacles
// =============================================================================

mod obstacle_tests {
    use super::*;

    #[test]
    fn sailing_into_rock_turns_boat_around() {
        let mut world = scripted_world(
            coasting_boat(Vec2::ZERO, 90.0, 3.0),
            Vec::new(),
            vec![rock(1, Vec2::new(100.0, 0.0), 40.0)],
            steady_wind(0.0, 0.0),
        );

        let contact = run_until_contact(&mut world, 600);
        assert!(matches!(
            contact,
            Some(Contact::Bounced { obstacle, tag: EntityTag::Rock, .. }) if obstacle == EntityId::new(1)
        ));
        assert!((world.boat().orientation() - 270.0).abs() < 1.0);
        assert!(world.take_events().contains(&SimEvent::Bounced {
            obstacle: EntityId::new(1),
            tag: EntityTag::Rock,
        }));
    }

    #[test]
    fn stalled_boat_inside_rock_keeps_flipping() {
        let mut world = scripted_world(
            coasting_boat(Vec2::new(30.0, 0.0), 90.0, 0.0),
            Vec::new(),
            vec![rock(1, Vec2::ZERO, 40.0)],
            steady_wind(0.0, 0.0),
        );

        run_ticks(&mut world, 1, 0);
        assert!((world.boat().orientation() - 270.0).abs() < 0.01);
        run_ticks(&mut world, 1, 16);
        assert!((world.boat().orientation() - 90.0).abs() < 0.01);
        assert_eq!(world.boat().position(), Vec2::new(30.0, 0.0));
    }

    #[test]
    fn fast_approach_bounces_off_island() {
        let mut world = scripted_world(
            coasting_boat(Vec2::new(-260.0, 0.0), 90.0, 6.0),
            vec![island(1, Vec2::ZERO, 200.0)],
            Vec::new(),
            steady_wind(0.0, 0.0),
        );

        let contact = run_until_contact(&mut world, 600);
        assert!(matches!(
            contact,
            Some(Contact::Bounced { tag: EntityTag::Island, .. })
        ));
        assert!(!world.boat().is_docked());
    }
}

// =============================================================================
// Docking
// =============================================================================

mod docking_tests {
    use super::*;

    fn harbour() -> World {
        scripted_world(
            coasting_boat(Vec2::new(-220.0, 0.0), 90.0, 1.5),
            vec![island(1, Vec2::ZERO, 200.0)],
            Vec::new(),
            steady_wind(0.0, 0.0),
        )
    }

    #[test]
    fn slow_approach_docks() {
        let mut world = harbour();
        let contact = run_until_contact(&mut world, 600);
        assert_eq!(contact, Some(Contact::Docked { island: EntityId::new(1) }));

        let boat = world.boat();
        assert_eq!(boat.speed(), 0.0);
        assert_eq!(boat.rudder(), 0.0);
        assert_eq!(world.docked_island().map(|i| i.name()), Some("talo"));
    }

    #[test]
    fn docked_boat_stays_put() {
        let mut world = harbour();
        run_until_contact(&mut world, 600);
        let berth = world.boat().position();

        run_ticks(&mut world, 120, 10_000);
        assert_eq!(world.boat().position(), berth);
        assert!(world.boat().is_docked());
    }

    #[test]
    fn release_sails_clear_without_redocking() {
        let mut world = harbour();
        run_until_contact(&mut world, 600);
        let heading = world.boat().orientation();
        world.take_events();

        assert_eq!(world.release_boat(), Some(EntityId::new(1)));
        assert_eq!(world.boat().speed(), RELEASE_SPEED);
        assert!(((world.boat().orientation() - heading).abs() - 180.0).abs() < 1e-3);

        run_ticks(&mut world, 120, 10_000);
        assert!(!world.boat().is_docked());
        assert_eq!(world.boat().leaving(), None);
        assert!(world.boat().position().x < -200.0);

        let events = world.take_events();
        assert_eq!(events, vec![SimEvent::Released { island: EntityId::new(1) }]);
    }

    #[test]
    fn released_boat_can_return_to_port() {
        let mut world = harbour();
        run_until_contact(&mut world, 600);
        world.release_boat();

        let mut now = 10_000;
        for _ in 0..2_000 {
            if world.boat().speed() < DOCKING_SPEED_THRESHOLD {
                break;
            }
            now = run_ticks(&mut world, 1, now);
        }
        let mut berthed = world.boat().clone();
        assert!(berthed.speed() < DOCKING_SPEED_THRESHOLD);
        assert!(!berthed.is_docked());
        assert_eq!(berthed.leaving(), None);
        berthed.set_position(world.islands()[0].position());
        assert!(world.islands()[0].check_docking(&berthed));

        // Come about and drift back in from just outside the shore.
        let boat = world.boat_mut();
        boat.set_position(Vec2::new(-220.0, 0.0));
        boat.set_orientation(90.0);
        boat.set_speed(1.5);

        let mut contact = None;
        for _ in 0..600 {
            now += TICK_MS;
            contact = world.tick(now, FIXED_DT);
            if contact.is_some() {
                break;
            }
        }
        assert_eq!(contact, Some(Contact::Docked { island: EntityId::new(1) }));
        assert!(world.boat().is_docked());
    }
}

// =============================================================================
// Persistence
// =============================================================================

mod persistence_tests {
    use super::*;

    #[test]
    fn voyage_survives_save_and_load() {
        let config = small_config();
        let mut world = World::generate(&config, 21);
        world.boat_mut().adjust_reef(10.0);
        run_ticks(&mut world, 300, 0);

        let json = world.snapshot().to_json().unwrap();
        let restored = World::from_save(&config, SaveData::from_json(&json).unwrap(), 5, 0).unwrap();

        assert_eq!(restored.boat().position(), world.boat().position());
        assert_eq!(restored.boat().orientation(), world.boat().orientation());
        assert_eq!(restored.islands(), world.islands());
        assert_eq!(restored.rocks(), world.rocks());
        assert_eq!(restored.wind().direction(), world.wind().direction());
        assert!(restored.boat().wakes().is_empty());
    }
}
