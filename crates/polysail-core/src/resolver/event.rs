//! Simulation event log.
//!
//! The world records notable state changes here as they happen. Nothing in
//! the simulation reads the log back; the session drains it with
//! [`EventLog::take_events`] once per frame for logging and sound cues.

use crate::entity::{EntityId, EntityTag};

/// Something notable that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// The wind changed.
    WindShifted {
        /// New compass direction
        direction: f32,
        /// New speed
        speed: f32,
    },
    /// The boat docked.
    Docked {
        /// Island docked at
        island: EntityId,
    },
    /// The boat left an island.
    Released {
        /// Island left
        island: EntityId,
    },
    /// The boat bounced off an obstacle.
    Bounced {
        /// Obstacle hit
        obstacle: EntityId,
        /// Kind of obstacle
        tag: EntityTag,
    },
}

/// Ordered buffer of [`SimEvent`]s.
///
/// # Example
///
/// ```
/// use polysail_core::entity::EntityId;
/// use polysail_core::resolver::{EventLog, SimEvent};
///
/// let mut log = EventLog::new();
/// log.push(SimEvent::Docked { island: EntityId::new(2) });
///
/// let events = log.take_events();
/// assert_eq!(events.len(), 1);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in order.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of events waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if no events are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops all events without returning them.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod take_events_tests {
        use super::*;

        #[test]
        fn preserves_order() {
            let mut log = EventLog::new();
            log.push(SimEvent::Released {
                island: EntityId::new(1),
            });
            log.push(SimEvent::WindShifted {
                direction: 10.0,
                speed: 5.0,
            });

            let events = log.take_events();
            assert!(matches!(events[0], SimEvent::Released { .. }));
            assert!(matches!(events[1], SimEvent::WindShifted { .. }));
        }

        #[test]
        fn drains_the_log() {
            let mut log = EventLog::new();
            log.push(SimEvent::Docked {
                island: EntityId::new(1),
            });
            assert_eq!(log.len(), 1);
            assert_eq!(log.take_events().len(), 1);
            assert!(log.take_events().is_empty());
        }

        #[test]
        fn clear_discards() {
            let mut log = EventLog::new();
            log.push(SimEvent::Bounced {
                obstacle: EntityId::new(3),
                tag: EntityTag::Rock,
            });
            log.clear();
            assert!(log.is_empty());
        }
    }
}
