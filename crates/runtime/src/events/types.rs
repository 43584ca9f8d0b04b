//! Event types for different topics.

use serde::{Deserialize, Serialize};

use actions_core::{CharacterId, ExecutionMode, Hour, InstanceId, Target};

/// Why a running or starting instance was cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CancelReason {
    /// Explicit stop request.
    Stopped,
    /// Re-verification after a repeat failed.
    ConditionsNotMet,
    /// Re-verification did not answer in time.
    Timeout,
    /// The instance could no longer progress.
    TrackingFailed { error: String },
}

/// Instance lifecycle notifications, consumed by UI and marker collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionEvent {
    /// Costs were applied and the instance began executing.
    Started {
        instance: InstanceId,
        action: String,
        actor: CharacterId,
        target: Target,
        mode: ExecutionMode,
    },

    Progressed {
        instance: InstanceId,
        hour: Hour,
        current: f32,
        indicator: f32,
    },

    /// Completion effects were applied. `hour` is `None` for immediate actions.
    Completed {
        instance: InstanceId,
        action: String,
        target: Target,
        hour: Option<Hour>,
    },

    /// A repeatable instance passed re-verification and paid its costs again.
    Repeated { instance: InstanceId, cycle: u32 },

    Cancelled {
        instance: InstanceId,
        action: String,
        target: Target,
        reason: CancelReason,
    },

    /// An invocation was rejected before the action started.
    InvocationFailed {
        action: String,
        target: Target,
        error: String,
    },
}

impl ActionEvent {
    /// The instance this event concerns, if it got far enough to have one.
    pub fn instance(&self) -> Option<InstanceId> {
        match self {
            Self::Started { instance, .. }
            | Self::Progressed { instance, .. }
            | Self::Completed { instance, .. }
            | Self::Repeated { instance, .. }
            | Self::Cancelled { instance, .. } => Some(*instance),
            Self::InvocationFailed { .. } => None,
        }
    }
}

/// Progression tracker notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackerEvent {
    /// The first tracked instance was registered; ticks are now consumed.
    Subscribed,
    /// The last tracked instance was dropped; ticks are ignored.
    Unsubscribed,
    /// Every tracked instance has seen this tick.
    TickProcessed {
        hour: Hour,
        indicator: usize,
        repeatable: usize,
    },
}
