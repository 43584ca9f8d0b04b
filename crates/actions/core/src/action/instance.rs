//! Live action instances and their state machine.
//!
//! ```text
//! Resolving → Verifying → Pending ⇄ Completed → Cleared
//!                            ↑          ↓ (repeatable)
//!                            └── Reverifying → Cancelled
//! ```
//!
//! Any non-terminal state may also move to `Cancelled` on an explicit stop or
//! a tracking failure.

use super::condition::Condition;
use super::kind::ExecutionMode;
use super::template::ActionTemplate;
use crate::state::{CharacterId, InstanceId, Target};

/// Where an instance is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InstanceState {
    /// Waiting for an actor.
    Resolving,
    /// Actor bound, conditions being checked.
    Verifying,
    /// Registered with the tracker, progressing on ticks.
    Pending,
    /// Progression reached the indicator.
    Completed,
    /// Repeatable instance re-checking its conditions after a completion.
    Reverifying,
    /// Finished normally.
    Cleared,
    Cancelled,
}

impl InstanceState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cleared | Self::Cancelled)
    }
}

/// Result of offering one tick of progression to an instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// The instance is not pending; nothing changed.
    Skipped,
    Progressed { current: f32 },
    /// The indicator was reached on this tick.
    Completed { current: f32 },
}

/// One live invocation of a template.
///
/// The instance owns a full value copy of its template. Conditions in
/// particular are copied per instance so verification results never leak
/// between instances or back into the catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActionInstance {
    id: InstanceId,
    template: ActionTemplate,
    conditions: Vec<Condition>,
    actor: Option<CharacterId>,
    target: Target,
    current_progression: f32,
    calculated_progression: f32,
    is_possible: bool,
    state: InstanceState,
    completions: u32,
}

impl ActionInstance {
    pub fn new(id: InstanceId, template: &ActionTemplate, target: Target) -> Self {
        let mut conditions = template.conditions().to_vec();
        conditions.iter_mut().for_each(Condition::reset);
        Self {
            id,
            template: template.clone(),
            conditions,
            actor: None,
            target,
            current_progression: 0.0,
            calculated_progression: 0.0,
            is_possible: false,
            state: InstanceState::Resolving,
            completions: 0,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn template(&self) -> &ActionTemplate {
        &self.template
    }

    pub fn name(&self) -> &str {
        self.template.name()
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.template.execution_mode()
    }

    pub fn actor(&self) -> Option<CharacterId> {
        self.actor
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn current_progression(&self) -> f32 {
        self.current_progression
    }

    pub fn calculated_progression(&self) -> f32 {
        self.calculated_progression
    }

    pub fn is_possible(&self) -> bool {
        self.is_possible
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// Number of times the indicator has been reached.
    pub fn completions(&self) -> u32 {
        self.completions
    }

    pub fn is_during_execution(&self) -> bool {
        matches!(
            self.state,
            InstanceState::Pending | InstanceState::Completed | InstanceState::Reverifying
        )
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_terminal()
    }

    /// Binds the acting character and moves on to verification.
    ///
    /// Returns false (and changes nothing) if an actor is already bound.
    pub fn assign_actor(&mut self, actor: CharacterId) -> bool {
        if self.actor.is_some() {
            return false;
        }
        self.actor = Some(actor);
        self.state = InstanceState::Verifying;
        true
    }

    /// Fresh condition copies for a verification pass.
    pub fn conditions_for_check(&self) -> Vec<Condition> {
        let mut conditions = self.conditions.clone();
        conditions.iter_mut().for_each(Condition::reset);
        conditions
    }

    /// Stores the result of a verification pass.
    ///
    /// `met` is the verifier's verdict; conditions skipped after the first
    /// failure keep `is_met == false`.
    pub fn record_verification(&mut self, conditions: Vec<Condition>, met: bool) {
        self.is_possible = met;
        self.conditions = conditions;
    }

    /// Registered with the tracker after costs were applied.
    pub fn start(&mut self) {
        self.state = InstanceState::Pending;
    }

    /// Adds one tick of progression.
    ///
    /// `rate` is the actor's progression-rate attribute; the per-tick gain is
    /// `fixed_progression + rate`, clamped at zero so progression never
    /// decreases within a cycle.
    pub fn advance(&mut self, rate: f32) -> Advance {
        if self.state != InstanceState::Pending {
            return Advance::Skipped;
        }
        self.calculated_progression = (self.template.fixed_progression() + rate).max(0.0);
        self.current_progression += self.calculated_progression;

        let indicator = self.template.progress_indicator();
        if reaches_indicator(self.current_progression, indicator) {
            self.current_progression = self.current_progression.max(indicator);
            self.state = InstanceState::Completed;
            self.completions += 1;
            Advance::Completed {
                current: self.current_progression,
            }
        } else {
            Advance::Progressed {
                current: self.current_progression,
            }
        }
    }

    /// Marks an immediate instance as completed once its effects are applied.
    pub fn complete_immediately(&mut self) {
        self.state = InstanceState::Completed;
        self.completions += 1;
    }

    pub fn begin_reverification(&mut self) {
        self.state = InstanceState::Reverifying;
    }

    /// Starts the next repeat cycle from zero progression.
    pub fn restart_cycle(&mut self) {
        self.current_progression = 0.0;
        self.state = InstanceState::Pending;
    }

    pub fn clear(&mut self) {
        self.state = InstanceState::Cleared;
    }

    pub fn cancel(&mut self) {
        self.state = InstanceState::Cancelled;
    }
}

/// Relative slack for the completion check. Gains derived as
/// `indicator / duration` do not sum back to the indicator exactly in `f32`.
const COMPLETION_TOLERANCE: f32 = 1e-4;

fn reaches_indicator(current: f32, indicator: f32) -> bool {
    current >= indicator - indicator.abs() * COMPLETION_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDefinition, Observed};
    use crate::state::LocationId;

    fn study(indicator: f32, fixed: f32) -> ActionTemplate {
        ActionTemplate::from_definition(
            &ActionDefinition::new("Study")
                .types(["Indicator", "Personal"])
                .progress_indicator(indicator)
                .fixed_progression(fixed)
                .conditions(["PlayerHasInfluenceValue >= 1"]),
        )
        .unwrap()
    }

    fn pending(template: &ActionTemplate) -> ActionInstance {
        let mut instance =
            ActionInstance::new(InstanceId(1), template, Target::location(LocationId(7), "Library"));
        assert!(instance.assign_actor(CharacterId(1)));
        instance.start();
        instance
    }

    #[test]
    fn completes_once_indicator_is_reached() {
        let template = study(10.0, 3.0);
        let mut instance = pending(&template);

        for expected in [3.0, 6.0, 9.0] {
            assert_eq!(
                instance.advance(0.0),
                Advance::Progressed { current: expected }
            );
        }
        assert_eq!(instance.advance(0.0), Advance::Completed { current: 12.0 });
        assert_eq!(instance.state(), InstanceState::Completed);
        assert_eq!(instance.advance(0.0), Advance::Skipped);
    }

    #[test]
    fn derived_rate_completes_on_the_last_hour() {
        for indicator in 1..=200u16 {
            for duration in 1..=48u32 {
                let template = ActionTemplate::from_definition(
                    &ActionDefinition::new("Drill")
                        .types(["Indicator", "Personal"])
                        .progress_indicator(f32::from(indicator))
                        .duration(duration),
                )
                .unwrap();
                let mut instance = pending(&template);

                for hour in 1..duration {
                    assert!(
                        matches!(instance.advance(0.0), Advance::Progressed { .. }),
                        "indicator {indicator} duration {duration} completed at hour {hour}"
                    );
                }
                assert!(
                    matches!(
                        instance.advance(0.0),
                        Advance::Completed { current } if current >= f32::from(indicator)
                    ),
                    "indicator {indicator} duration {duration} did not complete on time"
                );
            }
        }
    }

    #[test]
    fn negative_rate_never_reduces_progression() {
        let template = study(10.0, 1.0);
        let mut instance = pending(&template);
        instance.advance(0.0);
        assert_eq!(instance.advance(-5.0), Advance::Progressed { current: 1.0 });
        assert_eq!(instance.calculated_progression(), 0.0);
    }

    #[test]
    fn restart_resets_progression_to_zero() {
        let template = study(5.0, 5.0);
        let mut instance = pending(&template);
        assert!(matches!(instance.advance(0.0), Advance::Completed { .. }));
        instance.begin_reverification();
        assert!(instance.is_during_execution());
        instance.restart_cycle();
        assert_eq!(instance.current_progression(), 0.0);
        assert_eq!(instance.state(), InstanceState::Pending);
        assert_eq!(instance.completions(), 1);
    }

    #[test]
    fn actor_is_bound_once() {
        let template = study(5.0, 1.0);
        let mut instance =
            ActionInstance::new(InstanceId(2), &template, Target::location(LocationId(1), "Hall"));
        assert!(instance.assign_actor(CharacterId(3)));
        assert!(!instance.assign_actor(CharacterId(4)));
        assert_eq!(instance.actor(), Some(CharacterId(3)));
    }

    #[test]
    fn verification_results_stay_with_the_instance() {
        let template = study(5.0, 1.0);
        let mut first = pending(&template);
        let second = pending(&template);

        let mut checked = first.conditions_for_check();
        let met = checked[0].record(Observed::Amount(4));
        first.record_verification(checked, met);
        assert!(first.is_possible());

        assert!(first.conditions()[0].is_met);
        assert!(!second.conditions()[0].is_met);
        assert!(!template.conditions()[0].is_met);
    }

    #[test]
    fn failed_verification_marks_instance_impossible() {
        let template = study(5.0, 1.0);
        let mut instance = pending(&template);

        let mut checked = instance.conditions_for_check();
        let met = checked[0].record(Observed::Amount(0));
        instance.record_verification(checked, met);

        assert!(!instance.is_possible());
        assert!(!instance.conditions()[0].is_met);
    }

    #[test]
    fn stopped_states_are_terminal() {
        let template = study(5.0, 1.0);
        let mut instance = pending(&template);
        assert!(!instance.is_stopped());
        instance.cancel();
        assert!(instance.is_stopped());
        assert!(!instance.is_during_execution());
    }
}
