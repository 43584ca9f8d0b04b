//! In-memory collaborators for the simulator and tests.

mod actors;
mod resources;

pub use actors::StaticActorDirectory;
pub use resources::InMemoryResources;
