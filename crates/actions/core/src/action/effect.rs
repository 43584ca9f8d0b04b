//! Effects applied as costs (at invocation and on every repeat) or on completion.
//!
//! Effects are fire-and-forget: each one is a single delta handed to the
//! resource store or the actor's character record. There is no transactional
//! grouping and nothing is reverted when an action is cancelled later.

use crate::state::{CharacterStat, ResourceKind};

/// Names accepted as token 0 of an effect line.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum EffectKind {
    AddInfluence,
    RemoveInfluence,
    AddMoney,
    RemoveMoney,
    IncreaseCharacterStat,
    DecreaseCharacterStat,
    ChanceToIncreaseCharacterStat,
    ChanceToDecreaseCharacterStat,
}

/// A typed effect record.
///
/// Amounts are stored unsigned-in-spirit (parsing rejects negatives); the
/// direction is carried by the variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    AddInfluence(i64),
    RemoveInfluence(i64),
    AddMoney(i64),
    RemoveMoney(i64),
    IncreaseCharacterStat {
        stat: CharacterStat,
        amount: i32,
    },
    DecreaseCharacterStat {
        stat: CharacterStat,
        amount: i32,
    },
    ChanceToIncreaseCharacterStat {
        stat: CharacterStat,
        amount: i32,
        /// Whole percentage, `0..=100`.
        chance: u8,
    },
    ChanceToDecreaseCharacterStat {
        stat: CharacterStat,
        amount: i32,
        chance: u8,
    },
}

/// A stat modification, optionally gated by a percentage roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatChange {
    pub stat: CharacterStat,
    pub delta: i32,
    pub chance: Option<u8>,
}

impl StatChange {
    /// Whether a roll in `0..100` lets this change through.
    pub fn passes(&self, roll: u8) -> bool {
        self.chance.is_none_or(|chance| roll < chance)
    }
}

impl Effect {
    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::AddInfluence(_) => EffectKind::AddInfluence,
            Self::RemoveInfluence(_) => EffectKind::RemoveInfluence,
            Self::AddMoney(_) => EffectKind::AddMoney,
            Self::RemoveMoney(_) => EffectKind::RemoveMoney,
            Self::IncreaseCharacterStat { .. } => EffectKind::IncreaseCharacterStat,
            Self::DecreaseCharacterStat { .. } => EffectKind::DecreaseCharacterStat,
            Self::ChanceToIncreaseCharacterStat { .. } => EffectKind::ChanceToIncreaseCharacterStat,
            Self::ChanceToDecreaseCharacterStat { .. } => EffectKind::ChanceToDecreaseCharacterStat,
        }
    }

    /// Signed delta for the resource store, if this is a resource effect.
    pub const fn resource_delta(&self) -> Option<(ResourceKind, i64)> {
        match *self {
            Self::AddInfluence(amount) => Some((ResourceKind::Influence, amount)),
            Self::RemoveInfluence(amount) => Some((ResourceKind::Influence, -amount)),
            Self::AddMoney(amount) => Some((ResourceKind::Money, amount)),
            Self::RemoveMoney(amount) => Some((ResourceKind::Money, -amount)),
            _ => None,
        }
    }

    /// Signed stat change for the actor, if this is a stat effect.
    pub const fn stat_change(&self) -> Option<StatChange> {
        match *self {
            Self::IncreaseCharacterStat { stat, amount } => Some(StatChange {
                stat,
                delta: amount,
                chance: None,
            }),
            Self::DecreaseCharacterStat { stat, amount } => Some(StatChange {
                stat,
                delta: -amount,
                chance: None,
            }),
            Self::ChanceToIncreaseCharacterStat {
                stat,
                amount,
                chance,
            } => Some(StatChange {
                stat,
                delta: amount,
                chance: Some(chance),
            }),
            Self::ChanceToDecreaseCharacterStat {
                stat,
                amount,
                chance,
            } => Some(StatChange {
                stat,
                delta: -amount,
                chance: Some(chance),
            }),
            _ => None,
        }
    }
}
