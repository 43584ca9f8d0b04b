//! Definition and load errors.
//!
//! Parsing a single authoring line yields a [`DefinitionError`]. Building a
//! template wraps those (and tag/mode violations) into [`LoadError`]s tagged
//! with the action name; catalog construction aggregates every one of them
//! into [`LoadErrors`] instead of stopping at the first.

use std::fmt;

use super::definition::DefinitionField;
use super::kind::ActionType;
use crate::error::{ErrorSeverity, GameError};

// ============================================================================
// Definition (parse) errors
// ============================================================================

/// A malformed authoring string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// The line contains no tokens.
    #[error("empty definition")]
    Empty,

    /// Token 0 is not a member of the expected enum.
    #[error("unknown {category} `{token}`")]
    UnknownName {
        category: &'static str,
        token: String,
    },

    /// A required operand is absent.
    #[error("`{name}` is missing its {operand}")]
    MissingOperand {
        name: String,
        operand: &'static str,
    },

    /// A numeric operand failed to parse.
    #[error("`{name}` expects a number for its {operand}, found `{token}`")]
    InvalidNumber {
        name: String,
        operand: &'static str,
        token: String,
    },

    /// A comparison operator the definition kind does not support.
    #[error("`{name}` does not support operator `{operator}`")]
    UnsupportedOperator { name: String, operator: String },

    /// Tokens left over after the last operand.
    #[error("`{name}` has unexpected trailing token `{token}`")]
    UnexpectedToken { name: String, token: String },

    /// A numeric operand outside its permitted range.
    #[error("`{name}` {operand} {value} is out of range ({expected})")]
    OutOfRange {
        name: String,
        operand: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A stat operand that names no character stat.
    #[error("unknown character stat `{0}`")]
    UnknownStat(String),
}

impl GameError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use DefinitionError::*;
        match self {
            Empty => "DEFINITION_EMPTY",
            UnknownName { .. } => "DEFINITION_UNKNOWN_NAME",
            MissingOperand { .. } => "DEFINITION_MISSING_OPERAND",
            InvalidNumber { .. } => "DEFINITION_INVALID_NUMBER",
            UnsupportedOperator { .. } => "DEFINITION_UNSUPPORTED_OPERATOR",
            UnexpectedToken { .. } => "DEFINITION_UNEXPECTED_TOKEN",
            OutOfRange { .. } => "DEFINITION_OUT_OF_RANGE",
            UnknownStat(_) => "DEFINITION_UNKNOWN_STAT",
        }
    }
}

// ============================================================================
// Tag errors
// ============================================================================

/// A tag that violates the type-compatibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("type `{candidate}` is incompatible with `{existing}`")]
    Incompatible {
        existing: ActionType,
        candidate: ActionType,
    },
}

impl GameError for TagError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "TAG_INCOMPATIBLE"
    }
}

// ============================================================================
// Load errors
// ============================================================================

/// Why a template was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadErrorKind {
    /// One authoring line failed to parse.
    #[error("{field}[{index}] `{line}`: {source}")]
    Malformed {
        field: DefinitionField,
        index: usize,
        line: String,
        #[source]
        source: DefinitionError,
    },

    #[error(transparent)]
    IncompatibleTags(#[from] TagError),

    /// None of `Immediate`, `Indicator`, `Repeatable` was given.
    #[error("no execution mode (Immediate, Indicator or Repeatable) defined")]
    UndefinedExecutionMode,

    /// Tracked modes need a positive completion threshold.
    #[error("{mode} actions need a positive progress indicator, found {value}")]
    InvalidProgression {
        mode: super::kind::ExecutionMode,
        value: String,
    },

    #[error("duplicate action name")]
    DuplicateName,

    #[error("action name is empty")]
    EmptyName,
}

/// A template-level load failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("action `{action}`: {kind}")]
pub struct LoadError {
    pub action: String,
    #[source]
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn new(action: impl Into<String>, kind: LoadErrorKind) -> Self {
        Self {
            action: action.into(),
            kind,
        }
    }
}

impl GameError for LoadError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use LoadErrorKind::*;
        match &self.kind {
            Malformed { .. } => "LOAD_MALFORMED_DEFINITION",
            IncompatibleTags(_) => "LOAD_INCOMPATIBLE_TAGS",
            UndefinedExecutionMode => "LOAD_UNDEFINED_EXECUTION_MODE",
            InvalidProgression { .. } => "LOAD_INVALID_PROGRESSION",
            DuplicateName => "LOAD_DUPLICATE_NAME",
            EmptyName => "LOAD_EMPTY_NAME",
        }
    }
}

/// Every load error found while building a catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadErrors(pub Vec<LoadError>);

impl LoadErrors {
    pub fn iter(&self) -> impl Iterator<Item = &LoadError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors reported for one action name.
    pub fn for_action<'a>(&'a self, action: &'a str) -> impl Iterator<Item = &'a LoadError> {
        self.0.iter().filter(move |error| error.action == action)
    }
}

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} action definition error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadErrors {}

impl IntoIterator for LoadErrors {
    type Item = LoadError;
    type IntoIter = std::vec::IntoIter<LoadError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
