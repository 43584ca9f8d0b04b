//! Collaborators the engine talks to.
//!
//! Runtime users plug in implementations of these traits so the engine can
//! run against the live game, scripted fixtures, or the in-memory stand-ins in
//! [`crate::memory`]. Reads that may have to wait on another subsystem are
//! async; writes are fire-and-forget.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use actions_core::{CharacterId, CharacterStat, Hour, InstanceId, ResourceKind, Target};

/// Emits one tick per in-game hour.
pub trait TimeSource: Send + Sync {
    /// Starts receiving ticks. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<Hour>;
}

/// Player-wide money and influence.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn money(&self) -> i64;

    async fn influence(&self) -> i64;

    /// Applies a signed delta. Never awaited, never rolled back.
    fn adjust(&self, kind: ResourceKind, delta: i64);
}

/// What the organization selector is asked to choose for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub instance: InstanceId,
    pub action: String,
    pub target: Target,
}

/// Answer from the organization selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Chosen(CharacterId),
    Cancelled,
}

/// Characters the engine may act through.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// The player character, used by `Personal` actions.
    async fn protagonist(&self) -> Option<CharacterId>;

    /// Asks the player to pick an organization member, used by
    /// `Organization` actions. May wait arbitrarily long.
    async fn select_member(&self, request: &SelectionRequest) -> Selection;

    /// The actor's progression-rate attribute, added to the fixed per-tick
    /// progression. `None` if the actor no longer exists or has no such
    /// attribute.
    fn progression_rate(&self, actor: CharacterId) -> Option<f32>;

    fn adjust_stat(&self, actor: CharacterId, stat: CharacterStat, delta: i32);
}
