//! Scenario and determinism tests across the whole crate.
//!
//! - `determinism.rs`: same seed and inputs give identical worlds
//! - `integration.rs`: sailing, bouncing, docking and save/load end to end
//! - `helpers.rs`: world builders and tick drivers

mod determinism;
mod helpers;
mod integration;

pub use helpers::*;
