//! Engine worker that owns every live action instance.
//!
//! Receives commands from [`EngineHandle`](crate::api::EngineHandle), runs the
//! invocation flow and the progression tracker, and publishes events to the
//! EventBus. External waits (actor selection, condition verification) run as
//! spawned tasks whose results come back through a [`JoinSet`] as [`Resume`]
//! messages, so the worker itself never blocks on a collaborator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use actions_core::{
    ActionCatalog, ActionInstance, CharacterId, EngineConfig, InstanceId, Target,
};

use super::effects::EffectApplier;
use super::tracker::Tracker;
use crate::api::{
    ActionReceipt, ActorDirectory, InvocationError, ResourceStore, Result, RuntimeError,
    TimeSource, TrackedSnapshot,
};
use crate::events::{CancelReason, Event, EventBus, TrackerEvent};
use crate::verifier::{Verifier, VerifyOutcome};

pub(crate) type InvocationReply =
    oneshot::Sender<std::result::Result<ActionReceipt, InvocationError>>;

/// Commands that can be sent to the engine worker
pub enum Command {
    /// Start an action against a target.
    Invoke {
        name: String,
        target: Target,
        cancel: CancellationToken,
        reply: InvocationReply,
    },
    /// Stop a live instance.
    Stop {
        instance: InstanceId,
        reply: oneshot::Sender<Result<()>>,
    },
    QueryInstance {
        instance: InstanceId,
        reply: oneshot::Sender<Option<ActionInstance>>,
    },
    QueryCurrentAction {
        actor: CharacterId,
        reply: oneshot::Sender<Option<InstanceId>>,
    },
    QueryTracked {
        reply: oneshot::Sender<TrackedSnapshot>,
    },
}

/// Result of a suspension task, applied by the worker.
pub(crate) enum Resume {
    ActorResolved {
        instance: InstanceId,
        actor: Option<CharacterId>,
    },
    Verified {
        instance: InstanceId,
        outcome: VerifyOutcome,
    },
    Reverified {
        instance: InstanceId,
        outcome: VerifyOutcome,
    },
}

/// An instance between `invoke` and its reply.
pub(crate) struct PendingInvocation {
    pub(crate) instance: ActionInstance,
    pub(crate) cancel: CancellationToken,
    pub(crate) reply: InvocationReply,
}

/// Background task that processes engine commands and ticks.
pub struct EngineWorker {
    pub(crate) catalog: Arc<ActionCatalog>,
    pub(crate) command_rx: mpsc::Receiver<Command>,
    pub(crate) event_bus: EventBus,
    pub(crate) clock: Arc<dyn TimeSource>,
    pub(crate) actors: Arc<dyn ActorDirectory>,
    pub(crate) verifier: Verifier,
    pub(crate) effects: EffectApplier,
    pub(crate) verification_timeout: Option<Duration>,

    pub(crate) pending: HashMap<InstanceId, PendingInvocation>,
    pub(crate) tracker: Tracker,
    /// Actor → the single instance it is currently performing.
    pub(crate) current_actions: HashMap<CharacterId, InstanceId>,
    pub(crate) tasks: JoinSet<Resume>,
    pub(crate) next_id: InstanceId,
}

impl EngineWorker {
    /// Creates a new engine worker.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        catalog: Arc<ActionCatalog>,
        config: &EngineConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        clock: Arc<dyn TimeSource>,
        resources: Arc<dyn ResourceStore>,
        actors: Arc<dyn ActorDirectory>,
    ) -> Self {
        info!(
            target: "actions::engine",
            actions = catalog.len(),
            chance_seed = ?config.chance_seed,
            verification_timeout_ms = ?config.verification_timeout_ms,
            "EngineWorker initialized"
        );

        Self {
            catalog,
            command_rx,
            event_bus,
            clock,
            verifier: Verifier::new(resources.clone()),
            effects: EffectApplier::new(resources, actors.clone(), config.chance_seed),
            actors,
            verification_timeout: config.verification_timeout_ms.map(Duration::from_millis),
            pending: HashMap::new(),
            tracker: Tracker::new(),
            current_actions: HashMap::new(),
            tasks: JoinSet::new(),
            next_id: InstanceId(1),
        }
    }

    /// Main worker loop.
    ///
    /// Exits when every handle has been dropped. Outstanding suspension tasks
    /// are aborted and pending invokers observe `EngineStopped`.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(joined) = self.tasks.join_next() => match joined {
                    Ok(resume) => self.handle_resume(resume),
                    Err(error) => error!(
                        target: "actions::engine",
                        error = %error,
                        "suspension task failed"
                    ),
                },
                tick = self.tracker.next_tick(), if self.tracker.is_subscribed() => match tick {
                    Ok(hour) => self.handle_tick(hour),
                    Err(RecvError::Lagged(missed)) => warn!(
                        target: "actions::tracker",
                        missed,
                        "tick receiver lagged; missed ticks are skipped"
                    ),
                    Err(RecvError::Closed) => {
                        warn!(target: "actions::tracker", "time source closed");
                        self.unsubscribe();
                    }
                },
            }
        }

        debug!(target: "actions::engine", "EngineWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Invoke {
                name,
                target,
                cancel,
                reply,
            } => self.begin_invocation(name, target, cancel, reply),
            Command::Stop { instance, reply } => {
                let result = self.stop(instance);
                if reply.send(result).is_err() {
                    debug!("Stop reply channel closed (caller dropped)");
                }
            }
            Command::QueryInstance { instance, reply } => {
                let snapshot = self
                    .pending
                    .get(&instance)
                    .map(|pending| &pending.instance)
                    .or_else(|| self.tracker.get(instance))
                    .cloned();
                if reply.send(snapshot).is_err() {
                    debug!("QueryInstance reply channel closed (caller dropped)");
                }
            }
            Command::QueryCurrentAction { actor, reply } => {
                let current = self.current_actions.get(&actor).copied();
                if reply.send(current).is_err() {
                    debug!("QueryCurrentAction reply channel closed (caller dropped)");
                }
            }
            Command::QueryTracked { reply } => {
                if reply.send(self.tracker.snapshot()).is_err() {
                    debug!("QueryTracked reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_resume(&mut self, resume: Resume) {
        match resume {
            Resume::ActorResolved { instance, actor } => self.on_actor_resolved(instance, actor),
            Resume::Verified { instance, outcome } => self.on_verified(instance, outcome),
            Resume::Reverified { instance, outcome } => self.on_reverified(instance, outcome),
        }
    }

    /// Cancels a pending invocation or drops a tracked instance.
    fn stop(&mut self, id: InstanceId) -> Result<()> {
        if let Some(pending) = self.pending.get(&id) {
            debug!(target: "actions::engine", instance = %id, "stopping pending invocation");
            pending.cancel.cancel();
            return Ok(());
        }
        if self.tracker.get(id).is_some() {
            self.cancel_tracked(id, CancelReason::Stopped);
            return Ok(());
        }
        Err(RuntimeError::UnknownInstance(id))
    }

    /// Clears the actor's slot if it still points at `instance`.
    pub(crate) fn release_actor(&mut self, instance: &ActionInstance) {
        if let Some(actor) = instance.actor()
            && self.current_actions.get(&actor) == Some(&instance.id())
        {
            self.current_actions.remove(&actor);
        }
    }

    pub(crate) fn subscribe(&mut self) {
        if self.tracker.is_subscribed() {
            return;
        }
        self.tracker.subscribe(self.clock.subscribe());
        debug!(target: "actions::tracker", "subscribed to time source");
        self.publish(TrackerEvent::Subscribed);
    }

    pub(crate) fn unsubscribe(&mut self) {
        if self.tracker.unsubscribe() {
            debug!(target: "actions::tracker", "unsubscribed from time source");
            self.publish(TrackerEvent::Unsubscribed);
        }
    }

    pub(crate) fn publish(&self, event: impl Into<Event>) {
        self.event_bus.publish(event);
    }
}
