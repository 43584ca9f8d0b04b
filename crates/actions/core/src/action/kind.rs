//! Action type tags.

/// Tag attached to an action template.
///
/// `Personal`/`Organization` select how the actor is resolved,
/// `Immediate`/`Indicator`/`Repeatable` select how the action executes, and
/// `Illegal` is an orthogonal modifier.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ActionType {
    Personal,
    Organization,
    Immediate,
    Indicator,
    Repeatable,
    Illegal,
}

impl ActionType {
    /// Execution mode selected by this tag, if it is a mode tag.
    pub const fn execution_mode(self) -> Option<ExecutionMode> {
        match self {
            Self::Immediate => Some(ExecutionMode::Immediate),
            Self::Indicator => Some(ExecutionMode::Indicator),
            Self::Repeatable => Some(ExecutionMode::Repeatable),
            Self::Personal | Self::Organization | Self::Illegal => None,
        }
    }

    /// Actor-resolution mode selected by this tag, if any.
    pub const fn actor_mode(self) -> Option<ActorMode> {
        match self {
            Self::Personal => Some(ActorMode::Personal),
            Self::Organization => Some(ActorMode::Organization),
            _ => None,
        }
    }
}

/// How an instance progresses once it has been invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionMode {
    /// Completion effects are applied during invocation.
    Immediate,
    /// Progresses each tick and completes once.
    Indicator,
    /// Progresses each tick, re-verifies and restarts after every completion.
    Repeatable,
}

impl ExecutionMode {
    /// Returns true if instances in this mode are tracked across ticks.
    pub const fn is_tracked(self) -> bool {
        matches!(self, Self::Indicator | Self::Repeatable)
    }
}

/// How the acting character is chosen at invocation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorMode {
    /// The designated player character acts.
    #[default]
    Personal,
    /// A member of the player's organization is selected externally.
    Organization,
}
