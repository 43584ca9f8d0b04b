//! Progression tracker.
//!
//! Holds every instance that has passed invocation and progresses on ticks,
//! in two registration-ordered sets (indicator, then repeatable). The tick
//! subscription is held only while at least one instance is tracked.

use std::collections::HashMap;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use actions_core::{ActionInstance, ExecutionMode, Hour, InstanceId};

use crate::api::TrackedSnapshot;

#[derive(Default)]
pub(crate) struct Tracker {
    instances: HashMap<InstanceId, ActionInstance>,
    indicator: Vec<InstanceId>,
    repeatable: Vec<InstanceId>,
    ticks: Option<broadcast::Receiver<Hour>>,
}

impl Tracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds an instance to the set matching its execution mode.
    ///
    /// Returns true if this was the first tracked instance, in which case the
    /// caller must subscribe to the time source.
    pub(crate) fn register(&mut self, instance: ActionInstance) -> bool {
        let was_empty = self.is_empty();
        let id = instance.id();
        match instance.execution_mode() {
            ExecutionMode::Indicator => self.indicator.push(id),
            ExecutionMode::Repeatable => self.repeatable.push(id),
            ExecutionMode::Immediate => return false,
        }
        self.instances.insert(id, instance);
        was_empty
    }

    /// Removes an instance from tracking.
    pub(crate) fn deregister(&mut self, id: InstanceId) -> Option<ActionInstance> {
        let instance = self.instances.remove(&id)?;
        self.indicator.retain(|&tracked| tracked != id);
        self.repeatable.retain(|&tracked| tracked != id);
        Some(instance)
    }

    pub(crate) fn get(&self, id: InstanceId) -> Option<&ActionInstance> {
        self.instances.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: InstanceId) -> Option<&mut ActionInstance> {
        self.instances.get_mut(&id)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Ids to visit on a tick: indicator set first, then repeatable set.
    pub(crate) fn tick_order(&self) -> Vec<InstanceId> {
        self.indicator
            .iter()
            .chain(self.repeatable.iter())
            .copied()
            .collect()
    }

    pub(crate) fn counts(&self) -> (usize, usize) {
        (self.indicator.len(), self.repeatable.len())
    }

    pub(crate) fn is_subscribed(&self) -> bool {
        self.ticks.is_some()
    }

    pub(crate) fn subscribe(&mut self, ticks: broadcast::Receiver<Hour>) {
        self.ticks = Some(ticks);
    }

    /// Drops the tick subscription. Returns true if one was held.
    pub(crate) fn unsubscribe(&mut self) -> bool {
        self.ticks.take().is_some()
    }

    /// Waits for the next tick; never resolves while unsubscribed.
    pub(crate) async fn next_tick(&mut self) -> Result<Hour, RecvError> {
        match self.ticks.as_mut() {
            Some(ticks) => ticks.recv().await,
            None => std::future::pending().await,
        }
    }

    pub(crate) fn snapshot(&self) -> TrackedSnapshot {
        TrackedSnapshot {
            indicator: self.indicator.clone(),
            repeatable: self.repeatable.clone(),
            subscribed: self.is_subscribed(),
        }
    }
}
