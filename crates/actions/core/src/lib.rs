//! Action templates, the definition DSL, and the instance state machine.
//!
//! `actions-core` defines the canonical data model of the action engine and
//! exposes pure APIs that both the runtime and offline tools reuse:
//! - [`action::parse`] turns authoring strings into typed records
//! - [`action::rules`] enforces which type tags may coexist on a template
//! - [`action::ActionCatalog`] holds validated, immutable templates
//! - [`action::ActionInstance`] carries the per-invocation progression state
//!
//! Nothing here performs I/O or awaits; the asynchronous protocol lives in
//! `actions-runtime`.
pub mod action;
pub mod config;
pub mod error;
pub mod state;

pub use action::{
    ActionCatalog, ActionDefinition, ActionInstance, ActionTemplate, ActionType, ActorMode,
    Advance, Condition, ConditionKind, DefinitionError, DefinitionField, Effect, EffectKind,
    ExecutionMode, InstanceState, LoadError, LoadErrorKind, LoadErrors, Observed, Requirement,
    StatChange, TagError, TypeTags,
};
pub use config::EngineConfig;
pub use error::{ErrorSeverity, GameError};
pub use state::{
    CharacterId, CharacterStat, Hour, InstanceId, LocationId, ResourceKind, Target, TargetRef,
};
