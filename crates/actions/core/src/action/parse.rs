//! Authoring-string DSL.
//!
//! Every definition line has the shape `<Name> <operator?> <operands...>`.
//! Tokens are separated by whitespace; a run of the characters `< > = !`
//! always forms its own operator token, so `PlayerHasMoneyValue>=50` and
//! `PlayerHasMoneyValue >= 50` tokenize identically.
//!
//! ```text
//! PlayerHasMoneyValue >= 50
//! PlayerHasInfluenceValue 10
//! TargetLocationType = Tavern
//! RemoveMoney 50
//! IncreaseCharacterStat charisma 2
//! ChanceToDecreaseCharacterStat loyalty 1 25
//! Repeatable
//! ```
//!
//! Parsing is pure and deterministic: the same line always produces the same
//! record, and unknown names are rejected rather than defaulted.

use std::str::FromStr;

use super::condition::{Condition, ConditionKind, Requirement};
use super::effect::{Effect, EffectKind};
use super::error::DefinitionError;
use super::kind::ActionType;
use crate::state::CharacterStat;

/// Operators a numeric condition accepts. All mean "actual >= required".
const NUMERIC_OPERATORS: &[&str] = &[">=", "=", "=="];
/// Operators a string condition accepts. All mean "equal".
const EQUALITY_OPERATORS: &[&str] = &["=", "=="];

/// Parses one condition line.
pub fn parse_condition(line: &str) -> Result<Condition, DefinitionError> {
    let mut cursor = Cursor::new(line)?;
    let kind: ConditionKind = cursor.name("condition")?;

    let requirement = match kind {
        ConditionKind::PlayerHasMoneyValue => {
            cursor.operator(NUMERIC_OPERATORS)?;
            Requirement::PlayerHasMoney(cursor.number("amount")?)
        }
        ConditionKind::PlayerHasInfluenceValue => {
            cursor.operator(NUMERIC_OPERATORS)?;
            Requirement::PlayerHasInfluence(cursor.number("amount")?)
        }
        ConditionKind::TargetLocationType => {
            cursor.operator(EQUALITY_OPERATORS)?;
            Requirement::TargetLocationType(cursor.word("type name")?.to_owned())
        }
    };

    cursor.finish()?;
    Ok(Condition::new(requirement))
}

/// Parses one effect (or cost) line.
pub fn parse_effect(line: &str) -> Result<Effect, DefinitionError> {
    let mut cursor = Cursor::new(line)?;
    let kind: EffectKind = cursor.name("effect")?;
    cursor.operator(EQUALITY_OPERATORS)?;

    let effect = match kind {
        EffectKind::AddInfluence => Effect::AddInfluence(cursor.amount()?),
        EffectKind::RemoveInfluence => Effect::RemoveInfluence(cursor.amount()?),
        EffectKind::AddMoney => Effect::AddMoney(cursor.amount()?),
        EffectKind::RemoveMoney => Effect::RemoveMoney(cursor.amount()?),
        EffectKind::IncreaseCharacterStat => Effect::IncreaseCharacterStat {
            stat: cursor.stat()?,
            amount: cursor.amount()?,
        },
        EffectKind::DecreaseCharacterStat => Effect::DecreaseCharacterStat {
            stat: cursor.stat()?,
            amount: cursor.amount()?,
        },
        EffectKind::ChanceToIncreaseCharacterStat => Effect::ChanceToIncreaseCharacterStat {
            stat: cursor.stat()?,
            amount: cursor.amount()?,
            chance: cursor.chance()?,
        },
        EffectKind::ChanceToDecreaseCharacterStat => Effect::ChanceToDecreaseCharacterStat {
            stat: cursor.stat()?,
            amount: cursor.amount()?,
            chance: cursor.chance()?,
        },
    };

    cursor.finish()?;
    Ok(effect)
}

/// Parses one type-tag line.
pub fn parse_action_type(line: &str) -> Result<ActionType, DefinitionError> {
    let mut cursor = Cursor::new(line)?;
    let tag = cursor.name("action type")?;
    cursor.finish()?;
    Ok(tag)
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Operator(&'a str),
}

impl<'a> Token<'a> {
    fn text(self) -> &'a str {
        match self {
            Token::Word(text) | Token::Operator(text) => text,
        }
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '!')
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (index, c) in line.char_indices() {
        let class = if c.is_whitespace() {
            None
        } else {
            Some(is_operator_char(c))
        };

        match (start, class) {
            (Some((_, op)), Some(is_op)) if op == is_op => {}
            (Some((from, op)), _) => {
                tokens.push(make_token(&line[from..index], op));
                start = class.map(|is_op| (index, is_op));
            }
            (None, Some(is_op)) => start = Some((index, is_op)),
            (None, None) => {}
        }
    }
    if let Some((from, op)) = start {
        tokens.push(make_token(&line[from..], op));
    }
    tokens
}

fn make_token(text: &str, operator: bool) -> Token<'_> {
    if operator {
        Token::Operator(text)
    } else {
        Token::Word(text)
    }
}

// ============================================================================
// Cursor
// ============================================================================

struct Cursor<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    name: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Result<Self, DefinitionError> {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Err(DefinitionError::Empty);
        }
        Ok(Self {
            tokens,
            position: 0,
            name: "",
        })
    }

    /// Resolves token 0 against an enum.
    fn name<T: FromStr>(&mut self, category: &'static str) -> Result<T, DefinitionError> {
        let token = self.tokens[0];
        self.position = 1;
        self.name = token.text();
        match token {
            Token::Word(text) => text.parse().map_err(|_| DefinitionError::UnknownName {
                category,
                token: text.to_owned(),
            }),
            Token::Operator(text) => Err(DefinitionError::UnknownName {
                category,
                token: text.to_owned(),
            }),
        }
    }

    /// Consumes an optional operator, rejecting ones outside `allowed`.
    fn operator(&mut self, allowed: &[&str]) -> Result<(), DefinitionError> {
        if let Some(Token::Operator(operator)) = self.tokens.get(self.position).copied() {
            if !allowed.contains(&operator) {
                return Err(DefinitionError::UnsupportedOperator {
                    name: self.name.to_owned(),
                    operator: operator.to_owned(),
                });
            }
            self.position += 1;
        }
        Ok(())
    }

    fn word(&mut self, operand: &'static str) -> Result<&'a str, DefinitionError> {
        match self.tokens.get(self.position).copied() {
            Some(Token::Word(text)) => {
                self.position += 1;
                Ok(text)
            }
            Some(Token::Operator(text)) => Err(DefinitionError::UnexpectedToken {
                name: self.name.to_owned(),
                token: text.to_owned(),
            }),
            None => Err(DefinitionError::MissingOperand {
                name: self.name.to_owned(),
                operand,
            }),
        }
    }

    fn number<T: FromStr>(&mut self, operand: &'static str) -> Result<T, DefinitionError> {
        let token = self.word(operand)?;
        token.parse().map_err(|_| DefinitionError::InvalidNumber {
            name: self.name.to_owned(),
            operand,
            token: token.to_owned(),
        })
    }

    /// A non-negative amount; direction comes from the effect name.
    fn amount<T>(&mut self) -> Result<T, DefinitionError>
    where
        T: FromStr + PartialOrd + Default + ToString,
    {
        let value: T = self.number("amount")?;
        if value < T::default() {
            return Err(DefinitionError::OutOfRange {
                name: self.name.to_owned(),
                operand: "amount",
                value: value.to_string(),
                expected: "must not be negative",
            });
        }
        Ok(value)
    }

    fn chance(&mut self) -> Result<u8, DefinitionError> {
        let value: u8 = self.number("chance")?;
        if value > 100 {
            return Err(DefinitionError::OutOfRange {
                name: self.name.to_owned(),
                operand: "chance",
                value: value.to_string(),
                expected: "0..=100",
            });
        }
        Ok(value)
    }

    fn stat(&mut self) -> Result<CharacterStat, DefinitionError> {
        let token = self.word("stat name")?;
        token
            .parse()
            .map_err(|_| DefinitionError::UnknownStat(token.to_owned()))
    }

    fn finish(self) -> Result<(), DefinitionError> {
        match self.tokens.get(self.position) {
            Some(token) => Err(DefinitionError::UnexpectedToken {
                name: self.name.to_owned(),
                token: token.text().to_owned(),
            }),
            None => Ok(()),
        }
    }
}
