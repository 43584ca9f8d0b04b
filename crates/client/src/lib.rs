//! Command-line simulator for the action engine.
//!
//! The binary wires the builtin (or a user-supplied) catalog to in-memory
//! collaborators, invokes a scripted list of actions and advances the clock
//! hour by hour while logging engine events.

pub mod config;
pub mod report;

pub use config::{PlannedAction, SimConfig};
