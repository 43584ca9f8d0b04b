//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod errors;
pub mod handle;
pub mod ports;

pub use errors::{InvocationError, Result, RuntimeError, TrackingError};
pub use handle::{ActionReceipt, EngineHandle, TrackedSnapshot};
pub use ports::{ActorDirectory, ResourceStore, Selection, SelectionRequest, TimeSource};
