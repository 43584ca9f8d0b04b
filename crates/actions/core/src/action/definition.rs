//! Raw authoring records, as they appear in content files.

use std::fmt;

/// One action as authored: flat strings, not yet validated.
///
/// Each line in `types`, `conditions`, `effects`, and `costs` is parsed with
/// the DSL in [`super::parse`] when the template is built.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDefinition {
    pub name: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,

    /// Ticks to reach the full indicator; `0` for immediate actions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: u32,

    /// How many targets the action takes.
    #[cfg_attr(feature = "serde", serde(default = "default_target_number"))]
    pub target_number: u32,

    /// Progression at which a tracked instance completes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub progress_indicator: f32,

    /// Progression gained per tick before the actor's rate is added.
    ///
    /// Derived from `progress_indicator / duration` when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fixed_progression: Option<f32>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub types: Vec<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<String>,

    /// Applied on completion.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<String>,

    /// Applied at invocation and on every repeat.
    #[cfg_attr(feature = "serde", serde(default))]
    pub costs: Vec<String>,
}

#[cfg(feature = "serde")]
fn default_target_number() -> u32 {
    1
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_number: 1,
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn target_number(mut self, target_number: u32) -> Self {
        self.target_number = target_number;
        self
    }

    pub fn progress_indicator(mut self, progress_indicator: f32) -> Self {
        self.progress_indicator = progress_indicator;
        self
    }

    pub fn fixed_progression(mut self, fixed_progression: f32) -> Self {
        self.fixed_progression = Some(fixed_progression);
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn effects<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.effects = effects.into_iter().map(Into::into).collect();
        self
    }

    pub fn costs<I, S>(mut self, costs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.costs = costs.into_iter().map(Into::into).collect();
        self
    }
}

/// Which list of a definition a line came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefinitionField {
    Types,
    Conditions,
    Effects,
    Costs,
}

impl fmt::Display for DefinitionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Types => "types",
            Self::Conditions => "conditions",
            Self::Effects => "effects",
            Self::Costs => "costs",
        };
        f.write_str(label)
    }
}
