use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;

use actions_core::ResourceKind;

use crate::api::ResourceStore;

/// Resource store backed by atomics. Reads answer immediately.
#[derive(Debug, Default)]
pub struct InMemoryResources {
    money: AtomicI64,
    influence: AtomicI64,
    adjustments: AtomicUsize,
}

impl InMemoryResources {
    pub fn new(money: i64, influence: i64) -> Self {
        Self {
            money: AtomicI64::new(money),
            influence: AtomicI64::new(influence),
            adjustments: AtomicUsize::new(0),
        }
    }

    pub fn balance(&self, kind: ResourceKind) -> i64 {
        self.slot(kind).load(Ordering::SeqCst)
    }

    /// How many deltas have been applied so far.
    pub fn adjustments(&self) -> usize {
        self.adjustments.load(Ordering::SeqCst)
    }

    fn slot(&self, kind: ResourceKind) -> &AtomicI64 {
        match kind {
            ResourceKind::Money => &self.money,
            ResourceKind::Influence => &self.influence,
        }
    }
}

#[async_trait]
impl ResourceStore for InMemoryResources {
    async fn money(&self) -> i64 {
        self.balance(ResourceKind::Money)
    }

    async fn influence(&self) -> i64 {
        self.balance(ResourceKind::Influence)
    }

    fn adjust(&self, kind: ResourceKind, delta: i64) {
        self.slot(kind).fetch_add(delta, Ordering::SeqCst);
        self.adjustments.fetch_add(1, Ordering::SeqCst);
    }
}
