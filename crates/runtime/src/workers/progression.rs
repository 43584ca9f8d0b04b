//! Tick handling for tracked instances.
//!
//! On every tick, indicator instances are advanced before repeatable ones,
//! each set in registration order. A completing indicator instance finishes
//! and is dropped; a completing repeatable instance applies its effects and
//! re-verifies, staying registered (but idle) until the answer arrives.

use tracing::{debug, info, warn};

use actions_core::{ActionInstance, Advance, ExecutionMode, Hour, InstanceId, InstanceState};

use super::engine::{EngineWorker, Resume};
use crate::api::{ActorDirectory, TrackingError};
use crate::events::{ActionEvent, CancelReason, TrackerEvent};
use crate::verifier::VerifyOutcome;

impl EngineWorker {
    pub(super) fn handle_tick(&mut self, hour: Hour) {
        for id in self.tracker.tick_order() {
            self.advance_instance(id, hour);
        }

        let (indicator, repeatable) = self.tracker.counts();
        debug!(target: "actions::tracker", %hour, indicator, repeatable, "tick processed");
        self.publish(TrackerEvent::TickProcessed {
            hour,
            indicator,
            repeatable,
        });
    }

    fn advance_instance(&mut self, id: InstanceId, hour: Hour) {
        let step = match self.tracker.get_mut(id) {
            Some(instance) => progression_rate(self.actors.as_ref(), instance)
                .map(|rate| (instance.advance(rate), instance.template().progress_indicator())),
            None => return,
        };

        match step {
            Err(error) => {
                warn!(target: "actions::tracker", instance = %id, error = %error, "instance dropped from tracking");
                self.cancel_tracked(
                    id,
                    CancelReason::TrackingFailed {
                        error: error.to_string(),
                    },
                );
            }
            Ok((Advance::Skipped, _)) => {}
            Ok((Advance::Progressed { current }, indicator)) => {
                self.publish(ActionEvent::Progressed {
                    instance: id,
                    hour,
                    current,
                    indicator,
                });
            }
            Ok((Advance::Completed { current }, indicator)) => {
                self.publish(ActionEvent::Progressed {
                    instance: id,
                    hour,
                    current,
                    indicator,
                });
                self.complete(id, hour);
            }
        }
    }

    fn complete(&mut self, id: InstanceId, hour: Hour) {
        let Some(instance) = self.tracker.get_mut(id) else {
            return;
        };
        let Some(actor) = instance.actor() else {
            return;
        };

        self.effects.apply(id, actor, instance.template().effects());
        info!(
            target: "actions::tracker",
            instance = %id,
            action = instance.name(),
            %hour,
            completions = instance.completions(),
            "action completed"
        );
        let completed = ActionEvent::Completed {
            instance: id,
            action: instance.name().to_owned(),
            target: instance.target().clone(),
            hour: Some(hour),
        };

        match instance.execution_mode() {
            ExecutionMode::Repeatable => {
                instance.begin_reverification();
                let conditions = instance.conditions_for_check();
                let target = instance.target().clone();
                let verifier = self.verifier.clone();
                let timeout = self.verification_timeout;
                self.tasks.spawn(async move {
                    let outcome = verifier.verify_within(conditions, &target, timeout).await;
                    Resume::Reverified {
                        instance: id,
                        outcome,
                    }
                });
                self.publish(completed);
            }
            ExecutionMode::Indicator | ExecutionMode::Immediate => {
                self.publish(completed);
                if let Some(mut instance) = self.tracker.deregister(id) {
                    instance.clear();
                    self.release_actor(&instance);
                }
                self.unsubscribe_if_idle();
            }
        }
    }

    pub(super) fn on_reverified(&mut self, id: InstanceId, outcome: VerifyOutcome) {
        let Some(instance) = self
            .tracker
            .get_mut(id)
            .filter(|instance| instance.state() == InstanceState::Reverifying)
        else {
            debug!(target: "actions::tracker", instance = %id, "stale re-verification ignored");
            return;
        };

        let met = match outcome {
            VerifyOutcome::Checked(verification) => {
                instance.record_verification(verification.conditions, verification.met);
                verification.met
            }
            VerifyOutcome::TimedOut => {
                return self.cancel_tracked(id, CancelReason::Timeout);
            }
            VerifyOutcome::Cancelled => {
                return self.cancel_tracked(id, CancelReason::Stopped);
            }
        };
        if !met {
            return self.cancel_tracked(id, CancelReason::ConditionsNotMet);
        }

        let Some(actor) = instance.actor() else {
            return self.cancel_tracked(
                id,
                CancelReason::TrackingFailed {
                    error: TrackingError::MissingActor { instance: id }.to_string(),
                },
            );
        };
        instance.restart_cycle();
        self.effects.apply(id, actor, instance.template().costs());
        let cycle = instance.completions();
        debug!(target: "actions::tracker", instance = %id, cycle, "repeat cycle started");
        self.publish(ActionEvent::Repeated {
            instance: id,
            cycle,
        });
    }

    /// Drops a tracked instance without reverting anything it applied.
    pub(super) fn cancel_tracked(&mut self, id: InstanceId, reason: CancelReason) {
        let Some(mut instance) = self.tracker.deregister(id) else {
            return;
        };
        instance.cancel();
        self.release_actor(&instance);

        info!(
            target: "actions::tracker",
            instance = %id,
            action = instance.name(),
            reason = ?reason,
            "action cancelled"
        );
        self.publish(ActionEvent::Cancelled {
            instance: id,
            action: instance.name().to_owned(),
            target: instance.target().clone(),
            reason,
        });
        self.unsubscribe_if_idle();
    }

    fn unsubscribe_if_idle(&mut self) {
        if self.tracker.is_empty() {
            self.unsubscribe();
        }
    }
}

/// The actor's per-tick rate, validated.
fn progression_rate(
    actors: &dyn ActorDirectory,
    instance: &ActionInstance,
) -> Result<f32, TrackingError> {
    let actor = instance.actor().ok_or(TrackingError::MissingActor {
        instance: instance.id(),
    })?;
    let rate = actors
        .progression_rate(actor)
        .ok_or(TrackingError::MissingAttribute { actor })?;
    if !rate.is_finite() {
        return Err(TrackingError::InvalidAttribute { actor, rate });
    }
    Ok(rate)
}
