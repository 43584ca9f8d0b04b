//! Cloneable façade for issuing commands to the engine.
//!
//! [`EngineHandle`] hides channel plumbing and offers async helpers for
//! invoking and stopping actions, querying live instances, or streaming
//! events from specific topics.
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use actions_core::{ActionInstance, CharacterId, ExecutionMode, InstanceId, InstanceState, Target};

use super::errors::{InvocationError, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// What a successful invocation returns.
///
/// Immediate actions report `Cleared` (their effects are already applied);
/// tracked actions report `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReceipt {
    pub instance: InstanceId,
    pub action: String,
    pub actor: CharacterId,
    pub mode: ExecutionMode,
    pub state: InstanceState,
}

/// Tracked instance ids in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSnapshot {
    pub indicator: Vec<InstanceId>,
    pub repeatable: Vec<InstanceId>,
    /// Whether the tracker currently holds a tick subscription.
    pub subscribed: bool,
}

/// Client-facing handle to interact with the engine
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl EngineHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Invoke an action against a target.
    ///
    /// Resolves once the action is running (or, for immediate actions,
    /// finished) or once the invocation has been rejected.
    pub async fn invoke(
        &self,
        name: impl Into<String>,
        target: Target,
    ) -> std::result::Result<ActionReceipt, InvocationError> {
        self.invoke_with_cancel(name, target, CancellationToken::new())
            .await
    }

    /// Invoke an action, aborting actor resolution or verification when
    /// `cancel` fires first.
    pub async fn invoke_with_cancel(
        &self,
        name: impl Into<String>,
        target: Target,
        cancel: CancellationToken,
    ) -> std::result::Result<ActionReceipt, InvocationError> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Invoke {
                name: name.into(),
                target,
                cancel,
                reply: reply_tx,
            })
            .await
            .map_err(|_| InvocationError::EngineStopped)?;

        reply_rx.await.map_err(|_| InvocationError::EngineStopped)?
    }

    /// Stop a live instance.
    ///
    /// Instances still being invoked unwind without side effects; running
    /// instances are dropped from tracking without reverting anything
    /// already applied.
    pub async fn stop(&self, instance: InstanceId) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Stop {
                instance,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Snapshot of a live instance, if any.
    pub async fn instance(&self, instance: InstanceId) -> Result<Option<ActionInstance>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryInstance {
                instance,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// The instance currently occupying an actor, if any.
    pub async fn current_action(&self, actor: CharacterId) -> Result<Option<InstanceId>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryCurrentAction {
                actor,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn tracked(&self) -> Result<TrackedSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryTracked { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Action` - Instance lifecycle and failed invocations
    /// - `Topic::Tracker` - Tick subscription changes and processed ticks
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
