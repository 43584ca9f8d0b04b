//! Validated, immutable action templates.

use super::condition::Condition;
use super::definition::{ActionDefinition, DefinitionField};
use super::effect::Effect;
use super::error::{DefinitionError, LoadError, LoadErrorKind};
use super::kind::{ActorMode, ExecutionMode};
use super::parse::{parse_action_type, parse_condition, parse_effect};
use super::rules::TypeTags;

/// Validated, immutable description of an invocable action.
///
/// Templates are only built through [`ActionTemplate::from_definition`], so
/// every template carries a compatible tag set and a defined execution mode.
/// Fields are read-only after construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActionTemplate {
    name: String,
    description: String,
    duration: u32,
    target_number: u32,
    progress_indicator: f32,
    fixed_progression: f32,
    tags: TypeTags,
    execution: ExecutionMode,
    conditions: Vec<Condition>,
    effects: Vec<Effect>,
    costs: Vec<Effect>,
}

impl ActionTemplate {
    /// Parses and validates a definition.
    ///
    /// Every line is parsed even after a failure so that all problems with
    /// the definition are reported together. Any error rejects the whole
    /// template; no partial template is ever produced.
    pub fn from_definition(definition: &ActionDefinition) -> Result<Self, Vec<LoadError>> {
        let name = definition.name.trim();
        let mut errors = Vec::new();
        let mut fail = |kind: LoadErrorKind| errors.push(LoadError::new(name, kind));

        if name.is_empty() {
            fail(LoadErrorKind::EmptyName);
        }

        let mut tags = TypeTags::new();
        for (index, line) in definition.types.iter().enumerate() {
            match parse_action_type(line) {
                Ok(tag) => {
                    if let Err(error) = tags.push(tag) {
                        fail(error.into());
                    }
                }
                Err(source) => fail(malformed(DefinitionField::Types, index, line, source)),
            }
        }

        let conditions = parse_lines(
            DefinitionField::Conditions,
            &definition.conditions,
            parse_condition,
            &mut fail,
        );
        let effects = parse_lines(
            DefinitionField::Effects,
            &definition.effects,
            parse_effect,
            &mut fail,
        );
        let costs = parse_lines(
            DefinitionField::Costs,
            &definition.costs,
            parse_effect,
            &mut fail,
        );

        let execution = tags.execution_mode();
        match execution {
            None => fail(LoadErrorKind::UndefinedExecutionMode),
            Some(mode) if mode.is_tracked() && !(definition.progress_indicator > 0.0) => {
                fail(LoadErrorKind::InvalidProgression {
                    mode,
                    value: definition.progress_indicator.to_string(),
                });
            }
            Some(_) => {}
        }

        let fixed_progression = definition.fixed_progression.unwrap_or_else(|| {
            if definition.duration == 0 {
                0.0
            } else {
                definition.progress_indicator / definition.duration as f32
            }
        });

        match execution {
            Some(execution) if errors.is_empty() => Ok(Self {
                name: name.to_owned(),
                description: definition.description.clone(),
                duration: definition.duration,
                target_number: definition.target_number,
                progress_indicator: definition.progress_indicator,
                fixed_progression,
                tags,
                execution,
                conditions,
                effects,
                costs,
            }),
            _ => Err(errors),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn target_number(&self) -> u32 {
        self.target_number
    }

    pub fn progress_indicator(&self) -> f32 {
        self.progress_indicator
    }

    pub fn fixed_progression(&self) -> f32 {
        self.fixed_progression
    }

    pub fn tags(&self) -> &TypeTags {
        &self.tags
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution
    }

    pub fn actor_mode(&self) -> ActorMode {
        self.tags.actor_mode()
    }

    pub fn is_illegal(&self) -> bool {
        self.tags.is_illegal()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn costs(&self) -> &[Effect] {
        &self.costs
    }
}

fn malformed(
    field: DefinitionField,
    index: usize,
    line: &str,
    source: DefinitionError,
) -> LoadErrorKind {
    LoadErrorKind::Malformed {
        field,
        index,
        line: line.to_owned(),
        source,
    }
}

fn parse_lines<T>(
    field: DefinitionField,
    lines: &[String],
    parse: fn(&str) -> Result<T, DefinitionError>,
    fail: &mut impl FnMut(LoadErrorKind),
) -> Vec<T> {
    let mut parsed = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        match parse(line) {
            Ok(record) => parsed.push(record),
            Err(source) => fail(malformed(field, index, line, source)),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kind::ActionType;
    use crate::action::{Requirement, TagError};

    fn bribe() -> ActionDefinition {
        ActionDefinition::new("Bribe")
            .types(["Immediate", "Personal"])
            .conditions(["PlayerHasMoneyValue >= 50"])
            .effects(["RemoveMoney 50", "AddInfluence 5"])
    }

    #[test]
    fn builds_immediate_template() {
        let template = ActionTemplate::from_definition(&bribe()).unwrap();
        assert_eq!(template.name(), "Bribe");
        assert_eq!(template.execution_mode(), ExecutionMode::Immediate);
        assert_eq!(template.actor_mode(), ActorMode::Personal);
        assert_eq!(
            template.conditions()[0].requirement,
            Requirement::PlayerHasMoney(50)
        );
        assert_eq!(
            template.effects(),
            &[Effect::RemoveMoney(50), Effect::AddInfluence(5)]
        );
        assert!(template.costs().is_empty());
    }

    #[test]
    fn rejects_personal_with_organization() {
        let definition = bribe().types(["Immediate", "Personal", "Organization"]);
        let errors = ActionTemplate::from_definition(&definition).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            LoadErrorKind::IncompatibleTags(TagError::Incompatible {
                existing: ActionType::Personal,
                candidate: ActionType::Organization,
            })
        );
    }

    #[test]
    fn rejects_immediate_with_repeatable() {
        let definition = bribe()
            .types(["Immediate", "Repeatable"])
            .progress_indicator(5.0);
        let errors = ActionTemplate::from_definition(&definition).unwrap_err();
        assert!(matches!(
            errors[0].kind,
            LoadErrorKind::IncompatibleTags(TagError::Incompatible {
                existing: ActionType::Immediate,
                candidate: ActionType::Repeatable,
            })
        ));
    }

    #[test]
    fn rejects_missing_execution_mode() {
        let definition = bribe().types(["Personal", "Illegal"]);
        let errors = ActionTemplate::from_definition(&definition).unwrap_err();
        assert_eq!(errors[0].kind, LoadErrorKind::UndefinedExecutionMode);
    }

    #[test]
    fn collects_every_error_in_a_definition() {
        let definition = ActionDefinition::new("Smuggle")
            .types(["Indicator", "Sneaky"])
            .progress_indicator(10.0)
            .conditions(["PlayerHasMoneyValue >= lots", "TargetLocationType = Docks"])
            .effects(["AddMoney 100"])
            .costs(["RemoveGold 5"]);

        let errors = ActionTemplate::from_definition(&definition).unwrap_err();
        let fields: Vec<_> = errors
            .iter()
            .map(|error| match &error.kind {
                LoadErrorKind::Malformed { field, index, .. } => (*field, *index),
                other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(
            fields,
            vec![
                (DefinitionField::Types, 1),
                (DefinitionField::Conditions, 0),
                (DefinitionField::Costs, 0),
            ]
        );
        assert!(errors.iter().all(|error| error.action == "Smuggle"));
    }

    #[test]
    fn tracked_modes_need_positive_indicator() {
        let definition = ActionDefinition::new("Study").types(["Indicator"]);
        let errors = ActionTemplate::from_definition(&definition).unwrap_err();
        assert!(matches!(
            errors[0].kind,
            LoadErrorKind::InvalidProgression {
                mode: ExecutionMode::Indicator,
                ..
            }
        ));
    }

    #[test]
    fn derives_fixed_progression_from_duration() {
        let definition = ActionDefinition::new("Study")
            .types(["Indicator", "Personal"])
            .duration(4)
            .progress_indicator(10.0);
        let template = ActionTemplate::from_definition(&definition).unwrap();
        assert_eq!(template.fixed_progression(), 2.5);

        let explicit = definition.fixed_progression(3.0);
        let template = ActionTemplate::from_definition(&explicit).unwrap();
        assert_eq!(template.fixed_progression(), 3.0);
    }
}
