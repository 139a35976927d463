//! Per-tick resolution of boat contacts with obstacles.
//!
//! Resolution runs after the boat has moved. It mutates only the boat: a
//! rock or a too-fast island approach flips the heading, a slow island
//! approach docks. Obstacles never move.
//!
//! # Invariants
//!
//! - At most one contact is resolved per tick; the first match wins
//! - Rocks are checked before islands, each in collection order
//! - For each island the docking check runs before the bounce check
//! - Nothing is resolved while the boat is docked
//! - The island just left is skipped until the boat is outside it
//!
//! # Available Types
//!
//! - [`CollisionResolver`]: decides and applies the contact
//! - [`EventLog`]: records what happened for the session and telemetry

mod collision;
mod event;

pub use collision::{CollisionResolver, Contact};
pub use event::{EventLog, SimEvent};
