//! Condition verification against live game state.
//!
//! Conditions are checked in order and the first failure short-circuits:
//! later conditions are not queried and keep `is_met == false`. Money and
//! influence are awaited from the [`ResourceStore`]; the target type is read
//! from the target itself.

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use actions_core::{Condition, ConditionKind, Observed, Target};

use crate::api::ResourceStore;

/// Result of one verification pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// The checked conditions with their `is_met` results.
    pub conditions: Vec<Condition>,
    pub met: bool,
}

/// How a verification suspension ended.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    Checked(Verification),
    TimedOut,
    Cancelled,
}

#[derive(Clone)]
pub struct Verifier {
    resources: Arc<dyn ResourceStore>,
}

impl Verifier {
    pub fn new(resources: Arc<dyn ResourceStore>) -> Self {
        Self { resources }
    }

    /// Checks `conditions` against the current state.
    pub async fn verify(&self, mut conditions: Vec<Condition>, target: &Target) -> Verification {
        let mut met = true;

        for condition in conditions.iter_mut() {
            let passed = match condition.kind() {
                ConditionKind::PlayerHasMoneyValue => {
                    condition.record(Observed::Amount(self.resources.money().await))
                }
                ConditionKind::PlayerHasInfluenceValue => {
                    condition.record(Observed::Amount(self.resources.influence().await))
                }
                ConditionKind::TargetLocationType => {
                    condition.record(Observed::TypeName(&target.type_name))
                }
            };
            trace!(
                target: "actions::verifier",
                condition = %condition.kind(),
                passed,
                "condition checked"
            );
            if !passed {
                met = false;
                break;
            }
        }

        Verification { conditions, met }
    }

    /// Like [`Verifier::verify`], bounded by an optional timeout.
    pub async fn verify_within(
        &self,
        conditions: Vec<Condition>,
        target: &Target,
        timeout: Option<Duration>,
    ) -> VerifyOutcome {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.verify(conditions, target))
                .await
                .map_or(VerifyOutcome::TimedOut, VerifyOutcome::Checked),
            None => VerifyOutcome::Checked(self.verify(conditions, target).await),
        }
    }
}
