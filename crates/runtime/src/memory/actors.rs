use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use actions_core::{CharacterId, CharacterStat};

use crate::api::{ActorDirectory, Selection, SelectionRequest};

/// A fixed cast of characters with scripted organization selections.
///
/// `select_member` answers with the next queued [`Selection`], falling back to
/// the first registered member (or `Cancelled` when there are none).
#[derive(Debug, Default)]
pub struct StaticActorDirectory {
    protagonist: Option<CharacterId>,
    members: Vec<CharacterId>,
    rates: HashMap<CharacterId, f32>,
    selections: Mutex<VecDeque<Selection>>,
    stats: Mutex<HashMap<(CharacterId, CharacterStat), i32>>,
}

impl StaticActorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the player character and its progression rate.
    pub fn with_protagonist(mut self, actor: CharacterId, rate: f32) -> Self {
        self.protagonist = Some(actor);
        self.rates.insert(actor, rate);
        self
    }

    /// Adds an organization member and its progression rate.
    pub fn with_member(mut self, actor: CharacterId, rate: f32) -> Self {
        self.members.push(actor);
        self.rates.insert(actor, rate);
        self
    }

    /// Removes an actor's progression-rate attribute.
    pub fn without_rate(mut self, actor: CharacterId) -> Self {
        self.rates.remove(&actor);
        self
    }

    /// Queues the answer for the next organization selection.
    pub fn queue_selection(&self, selection: Selection) {
        self.selections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(selection);
    }

    /// Accumulated stat delta applied to an actor.
    pub fn stat(&self, actor: CharacterId, stat: CharacterStat) -> i32 {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(actor, stat))
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ActorDirectory for StaticActorDirectory {
    async fn protagonist(&self) -> Option<CharacterId> {
        self.protagonist
    }

    async fn select_member(&self, _request: &SelectionRequest) -> Selection {
        let queued = self
            .selections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        queued.unwrap_or_else(|| {
            self.members
                .first()
                .copied()
                .map_or(Selection::Cancelled, Selection::Chosen)
        })
    }

    fn progression_rate(&self, actor: CharacterId) -> Option<f32> {
        self.rates.get(&actor).copied()
    }

    fn adjust_stat(&self, actor: CharacterId, stat: CharacterStat, delta: i32) {
        *self
            .stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((actor, stat))
            .or_default() += delta;
    }
}
