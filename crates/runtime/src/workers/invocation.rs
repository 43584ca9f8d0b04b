//! Invocation flow: resolve actor → verify → pay costs → dispatch.
//!
//! Until costs are paid an invocation has no side effects, so every rejection
//! only has to release the actor slot it may have claimed.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use actions_core::{
    ActionInstance, ActorMode, CharacterId, ExecutionMode, InstanceId, Target,
};

use super::engine::{EngineWorker, InvocationReply, PendingInvocation, Resume};
use crate::api::{ActionReceipt, ActorDirectory, InvocationError, Selection, SelectionRequest};
use crate::events::ActionEvent;
use crate::verifier::VerifyOutcome;

impl EngineWorker {
    pub(super) fn begin_invocation(
        &mut self,
        name: String,
        target: Target,
        cancel: CancellationToken,
        reply: InvocationReply,
    ) {
        let id = self.next_id;
        let Some(instance) = self.catalog.instantiate(id, &name, target.clone()) else {
            debug!(target: "actions::engine", action = %name, "unknown action");
            self.publish(ActionEvent::InvocationFailed {
                action: name.clone(),
                target,
                error: InvocationError::UnknownAction(name.clone()).to_string(),
            });
            if reply.send(Err(InvocationError::UnknownAction(name))).is_err() {
                debug!("Invoke reply channel closed (caller dropped)");
            }
            return;
        };
        self.next_id = id.next();

        let mode = instance.template().actor_mode();
        let request = SelectionRequest {
            instance: id,
            action: name,
            target,
        };
        let actors = Arc::clone(&self.actors);
        let token = cancel.clone();

        debug!(target: "actions::engine", instance = %id, action = %request.action, %mode, "resolving actor");
        self.tasks.spawn(async move {
            let actor = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                actor = resolve_actor(actors.as_ref(), mode, &request) => actor,
            };
            Resume::ActorResolved { instance: id, actor }
        });

        self.pending.insert(
            id,
            PendingInvocation {
                instance,
                cancel,
                reply,
            },
        );
    }

    pub(super) fn on_actor_resolved(&mut self, id: InstanceId, actor: Option<CharacterId>) {
        if !self.pending.contains_key(&id) {
            debug!(target: "actions::engine", instance = %id, "stale actor resolution ignored");
            return;
        }

        let Some(actor) = actor else {
            return self.reject(id, |instance| InvocationError::ResolutionCancelled {
                action: instance.name().to_owned(),
            });
        };
        if let Some(&current) = self.current_actions.get(&actor) {
            return self.reject(id, |_| InvocationError::ActorBusy { actor, current });
        }

        let Some(pending) = self.pending.get_mut(&id) else {
            return;
        };
        self.current_actions.insert(actor, id);
        pending.instance.assign_actor(actor);

        let conditions = pending.instance.conditions_for_check();
        let target = pending.instance.target().clone();
        let token = pending.cancel.clone();
        let verifier = self.verifier.clone();
        let timeout = self.verification_timeout;

        debug!(target: "actions::engine", instance = %id, %actor, "verifying conditions");
        self.tasks.spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => VerifyOutcome::Cancelled,
                outcome = verifier.verify_within(conditions, &target, timeout) => outcome,
            };
            Resume::Verified {
                instance: id,
                outcome,
            }
        });
    }

    pub(super) fn on_verified(&mut self, id: InstanceId, outcome: VerifyOutcome) {
        let Some(pending) = self.pending.get_mut(&id) else {
            debug!(target: "actions::engine", instance = %id, "stale verification ignored");
            return;
        };

        match outcome {
            VerifyOutcome::Cancelled => self.reject(id, |instance| InvocationError::Stopped {
                action: instance.name().to_owned(),
            }),
            VerifyOutcome::TimedOut => {
                self.reject(id, |instance| InvocationError::VerificationTimedOut {
                    action: instance.name().to_owned(),
                })
            }
            VerifyOutcome::Checked(verification) => {
                pending
                    .instance
                    .record_verification(verification.conditions, verification.met);
                if !verification.met {
                    return self.reject(id, |instance| InvocationError::ConditionsNotMet {
                        action: instance.name().to_owned(),
                    });
                }
                if let Some(pending) = self.pending.remove(&id) {
                    self.start(pending);
                }
            }
        }
    }

    /// Pays costs and dispatches on execution mode.
    fn start(&mut self, pending: PendingInvocation) {
        let PendingInvocation {
            mut instance,
            reply,
            ..
        } = pending;
        let id = instance.id();
        let Some(actor) = instance.actor() else {
            let error = InvocationError::ResolutionCancelled {
                action: instance.name().to_owned(),
            };
            if reply.send(Err(error)).is_err() {
                debug!("Invoke reply channel closed (caller dropped)");
            }
            return;
        };

        self.effects.apply(id, actor, instance.template().costs());

        let mode = instance.execution_mode();
        info!(
            target: "actions::engine",
            instance = %id,
            action = instance.name(),
            %actor,
            %mode,
            "action started"
        );
        self.publish(ActionEvent::Started {
            instance: id,
            action: instance.name().to_owned(),
            actor,
            target: instance.target().clone(),
            mode,
        });

        let receipt = match mode {
            ExecutionMode::Immediate => {
                self.effects.apply(id, actor, instance.template().effects());
                instance.complete_immediately();
                self.publish(ActionEvent::Completed {
                    instance: id,
                    action: instance.name().to_owned(),
                    target: instance.target().clone(),
                    hour: None,
                });
                instance.clear();
                self.release_actor(&instance);
                receipt(&instance, actor)
            }
            ExecutionMode::Indicator | ExecutionMode::Repeatable => {
                instance.start();
                let receipt = receipt(&instance, actor);
                if self.tracker.register(instance) {
                    self.subscribe();
                }
                receipt
            }
        };

        if reply.send(Ok(receipt)).is_err() {
            debug!("Invoke reply channel closed (caller dropped)");
        }
    }

    /// Drops a pending invocation with no side effects.
    fn reject(
        &mut self,
        id: InstanceId,
        error: impl FnOnce(&ActionInstance) -> InvocationError,
    ) {
        let Some(pending) = self.pending.remove(&id) else {
            return;
        };
        self.release_actor(&pending.instance);

        let error = error(&pending.instance);
        info!(
            target: "actions::engine",
            instance = %id,
            action = pending.instance.name(),
            error = %error,
            "invocation rejected"
        );
        self.publish(ActionEvent::InvocationFailed {
            action: pending.instance.name().to_owned(),
            target: pending.instance.target().clone(),
            error: error.to_string(),
        });
        if pending.reply.send(Err(error)).is_err() {
            debug!("Invoke reply channel closed (caller dropped)");
        }
    }
}

fn receipt(instance: &ActionInstance, actor: CharacterId) -> ActionReceipt {
    ActionReceipt {
        instance: instance.id(),
        action: instance.name().to_owned(),
        actor,
        mode: instance.execution_mode(),
        state: instance.state(),
    }
}

async fn resolve_actor(
    actors: &dyn ActorDirectory,
    mode: ActorMode,
    request: &SelectionRequest,
) -> Option<CharacterId> {
    match mode {
        ActorMode::Personal => actors.protagonist().await,
        ActorMode::Organization => match actors.select_member(request).await {
            Selection::Chosen(actor) => Some(actor),
            Selection::Cancelled => None,
        },
    }
}
