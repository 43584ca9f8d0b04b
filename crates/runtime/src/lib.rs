//! Asynchronous execution engine for data-driven actions.
//!
//! This crate runs the invocation protocol (actor resolution, condition
//! verification, cost payment) and the tick-driven progression tracker on a
//! single worker task. Consumers embed [`Runtime`] and talk to it through
//! [`EngineHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle, the errors, and the collaborator traits
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`verifier`] checks conditions against the resource store
//! - [`clock`] and [`memory`] provide stand-in collaborators
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod clock;
pub mod events;
pub mod memory;
pub mod runtime;
pub mod verifier;

mod workers;

pub use api::{
    ActionReceipt, ActorDirectory, EngineHandle, InvocationError, ResourceStore, Result,
    RuntimeError, Selection, SelectionRequest, TimeSource, TrackedSnapshot, TrackingError,
};
pub use clock::GameClock;
pub use events::{ActionEvent, CancelReason, Event, EventBus, Topic, TrackerEvent};
pub use memory::{InMemoryResources, StaticActorDirectory};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use verifier::{Verification, Verifier, VerifyOutcome};
