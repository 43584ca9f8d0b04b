//! Action domain - data-driven templates and live instances.
//!
//! Actions are authored as flat strings, parsed once into typed templates, and
//! instantiated per invocation:
//! - `ActionDefinition`: raw authoring record (what the data files contain)
//! - `ActionTemplate`: validated, immutable template built from a definition
//! - `ActionCatalog`: name-keyed set of templates, read-only after load
//! - `ActionInstance`: one live invocation bound to an actor and a target
//!
//! # Module Structure
//!
//! - `kind`: `ActionType` tags and the execution/actor modes they select
//! - `rules`: type-compatibility predicate and the ordered `TypeTags` set
//! - `condition`: verification requirements and their per-instance results
//! - `effect`: resource and stat changes applied as costs or on completion
//! - `parse`: the authoring-string DSL
//! - `definition` / `template` / `catalog`: loading pipeline
//! - `instance`: progression math and the instance state machine
//! - `error`: definition and load errors

pub mod catalog;
pub mod condition;
pub mod definition;
pub mod effect;
pub mod error;
pub mod instance;
pub mod kind;
pub mod parse;
pub mod rules;
pub mod template;

pub use catalog::ActionCatalog;
pub use condition::{Condition, ConditionKind, Observed, Requirement};
pub use definition::{ActionDefinition, DefinitionField};
pub use effect::{Effect, EffectKind, StatChange};
pub use error::{DefinitionError, LoadError, LoadErrorKind, LoadErrors, TagError};
pub use instance::{ActionInstance, Advance, InstanceState};
pub use kind::{ActionType, ActorMode, ExecutionMode};
pub use rules::{TypeTags, compatible};
pub use template::ActionTemplate;
