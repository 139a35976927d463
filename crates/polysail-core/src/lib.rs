//! # Polysail Core
//!
//! Deterministic simulation core for Polysail, a 2D sailing game.
//!
//! The player trims the sail, works the rudder and reefs in a wind that
//! drifts every few seconds, steering around rocks and docking at islands
//! in a world that wraps at its edges.
//!
//! ## Architecture
//!
//! - **Wind**: slowly drifting global direction and speed ([`wind`])
//! - **Entities**: boat, islands, rocks, clouds, seagulls and wakes behind a
//!   shared [`WorldObject`](entity::WorldObject) trait ([`entity`])
//! - **Resolver**: boat-versus-obstacle bounce and docking ([`resolver`])
//! - **World**: generation, the fixed-step tick and culled drawing ([`world`])
//! - **Session**: screens, menus, input and save/load ([`session`])
//!
//! Rendering, audio and windowing belong to the platform layer, which
//! implements [`Canvas`](render::Canvas) and feeds
//! [`InputSnapshot`](input::InputSnapshot)s to a [`Session`].
//!
//! ## Usage
//!
//! ```
//! use polysail_core::{DrawList, InputSnapshot, MenuAction, Session, SimConfig, FIXED_DT};
//!
//! let mut session = Session::new(SimConfig::default(), 7, "save_main.json");
//! session.dispatch(MenuAction::NewGame);
//!
//! let mut canvas = DrawList::new();
//! let report = session.frame(&InputSnapshot::default(), 16, FIXED_DT, &mut canvas);
//! assert!(report.draw.drawn > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod entity;
pub mod input;
pub mod math;
pub mod menu;
pub mod persistence;
pub mod playlist;
pub mod render;
pub mod resolver;
pub mod session;
pub mod wind;
pub mod world;

pub use config::{ConfigError, SimConfig};
pub use input::{InputSnapshot, KeySet};
pub use menu::MenuAction;
pub use persistence::{PersistenceError, SaveData};
pub use render::{Canvas, DrawList};
pub use session::{FrameReport, GameState, Session};
pub use world::{World, FIXED_DT};

#[cfg(test)]
mod tests;
