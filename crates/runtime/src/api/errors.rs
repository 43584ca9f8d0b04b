//! Error types surfaced by the runtime API.
//!
//! [`InvocationError`] is what an invoker sees when an action does not start,
//! [`TrackingError`] is raised (and only logged/published) when a tracked
//! instance can no longer progress, and [`RuntimeError`] covers worker
//! coordination.
use thiserror::Error;
use tokio::sync::oneshot;

use actions_core::{CharacterId, ErrorSeverity, GameError, InstanceId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("engine worker command channel closed")]
    CommandChannelClosed,

    #[error("engine worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("engine worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires an action catalog before building")]
    MissingCatalog,

    #[error("runtime requires a time source before building")]
    MissingTimeSource,

    #[error("runtime requires a resource store before building")]
    MissingResources,

    #[error("runtime requires an actor directory before building")]
    MissingActors,

    #[error("no live action instance {0}")]
    UnknownInstance(InstanceId),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownInstance(_) => ErrorSeverity::Validation,
            Self::MissingCatalog
            | Self::MissingTimeSource
            | Self::MissingResources
            | Self::MissingActors => ErrorSeverity::Validation,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::MissingCatalog => "RUNTIME_MISSING_CATALOG",
            Self::MissingTimeSource => "RUNTIME_MISSING_TIME_SOURCE",
            Self::MissingResources => "RUNTIME_MISSING_RESOURCES",
            Self::MissingActors => "RUNTIME_MISSING_ACTORS",
            Self::UnknownInstance(_) => "RUNTIME_UNKNOWN_INSTANCE",
        }
    }
}

/// Why an invocation did not produce a running action.
///
/// None of these leave side effects behind: costs are only applied after
/// verification succeeds, and the actor's slot is released on every path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    /// The actor selection was cancelled or produced no actor.
    #[error("actor resolution for `{action}` was cancelled")]
    ResolutionCancelled { action: String },

    #[error("{actor} is already performing {current}")]
    ActorBusy {
        actor: CharacterId,
        current: InstanceId,
    },

    #[error("conditions for `{action}` are not met")]
    ConditionsNotMet { action: String },

    #[error("verification for `{action}` timed out")]
    VerificationTimedOut { action: String },

    /// Cancelled while conditions were being verified.
    #[error("`{action}` was stopped before it started")]
    Stopped { action: String },

    #[error("action engine is not running")]
    EngineStopped,
}

impl GameError for InvocationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownAction(_) => ErrorSeverity::Validation,
            Self::EngineStopped => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "INVOCATION_UNKNOWN_ACTION",
            Self::ResolutionCancelled { .. } => "INVOCATION_RESOLUTION_CANCELLED",
            Self::ActorBusy { .. } => "INVOCATION_ACTOR_BUSY",
            Self::ConditionsNotMet { .. } => "INVOCATION_CONDITIONS_NOT_MET",
            Self::VerificationTimedOut { .. } => "INVOCATION_VERIFICATION_TIMED_OUT",
            Self::Stopped { .. } => "INVOCATION_STOPPED",
            Self::EngineStopped => "INVOCATION_ENGINE_STOPPED",
        }
    }
}

/// A tracked instance that can no longer progress.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TrackingError {
    #[error("{instance} has no actor")]
    MissingActor { instance: InstanceId },

    #[error("{actor} has no progression rate attribute")]
    MissingAttribute { actor: CharacterId },

    #[error("{actor} has a non-finite progression rate ({rate})")]
    InvalidAttribute { actor: CharacterId, rate: f32 },
}

impl GameError for TrackingError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingActor { .. } => "TRACKING_MISSING_ACTOR",
            Self::MissingAttribute { .. } => "TRACKING_MISSING_ATTRIBUTE",
            Self::InvalidAttribute { .. } => "TRACKING_INVALID_ATTRIBUTE",
        }
    }
}
