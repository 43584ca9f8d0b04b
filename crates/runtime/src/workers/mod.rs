//! Worker tasks that back the runtime orchestration.
//!
//! The engine worker owns every live instance. Its behavior is split by
//! phase: `invocation` covers resolve/verify/dispatch, `progression` covers
//! ticks, re-verification and cancellation of tracked instances.

mod effects;
mod engine;
mod invocation;
mod progression;
mod tracker;

pub use engine::{Command, EngineWorker};
