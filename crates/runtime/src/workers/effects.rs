//! Effect application.
//!
//! Each effect is one fire-and-forget call on a collaborator. Chance-gated
//! stat changes roll `0..100` and apply when the roll is below the chance.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use actions_core::{CharacterId, Effect, InstanceId};

use crate::api::{ActorDirectory, ResourceStore};

pub(crate) struct EffectApplier {
    resources: Arc<dyn ResourceStore>,
    actors: Arc<dyn ActorDirectory>,
    rng: StdRng,
}

impl EffectApplier {
    pub(crate) fn new(
        resources: Arc<dyn ResourceStore>,
        actors: Arc<dyn ActorDirectory>,
        seed: Option<u64>,
    ) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            resources,
            actors,
            rng,
        }
    }

    /// Applies `effects` in order on behalf of `actor`.
    ///
    /// Returns how many effects actually changed something.
    pub(crate) fn apply(
        &mut self,
        instance: InstanceId,
        actor: CharacterId,
        effects: &[Effect],
    ) -> usize {
        let mut applied = 0;

        for effect in effects {
            if let Some((kind, delta)) = effect.resource_delta() {
                self.resources.adjust(kind, delta);
                applied += 1;
                trace!(target: "actions::engine", %instance, %kind, delta, "resource adjusted");
            } else if let Some(change) = effect.stat_change() {
                let passes = match change.chance {
                    Some(_) => change.passes(self.rng.random_range(0..100)),
                    None => true,
                };
                if passes {
                    self.actors.adjust_stat(actor, change.stat, change.delta);
                    applied += 1;
                }
                trace!(
                    target: "actions::engine",
                    %instance,
                    %actor,
                    stat = %change.stat,
                    delta = change.delta,
                    passes,
                    "stat change"
                );
            }
        }

        applied
    }
}
