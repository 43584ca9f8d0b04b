//! Identifiers and value types shared between the engine and its collaborators.
//!
//! Characters, locations, and resources are owned by external subsystems. The
//! engine only ever holds their identities and the handful of values it needs
//! to verify conditions and apply effects.
use std::fmt;

/// Identity of a character (an actor or a character target).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "character#{}", self.0)
    }
}

/// Identity of a location target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "location#{}", self.0)
    }
}

/// Identity of a live action instance. Allocated by the runtime, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Returns the identifier following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// One in-game hour; the unit carried by every tick of the time source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hour(pub u64);

impl Hour {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hour {}", self.0)
    }
}

/// What an action instance is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRef {
    Location(LocationId),
    Character(CharacterId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(id) => id.fmt(f),
            Self::Character(id) => id.fmt(f),
        }
    }
}

/// Opaque target reference supplied by the target provider.
///
/// `type_name` is the only queryable field the engine uses; it is compared by
/// `TargetLocationType` conditions (e.g. `"Tavern"`, `"Palace"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub reference: TargetRef,
    pub type_name: String,
}

impl Target {
    pub fn location(id: LocationId, type_name: impl Into<String>) -> Self {
        Self {
            reference: TargetRef::Location(id),
            type_name: type_name.into(),
        }
    }

    pub fn character(id: CharacterId, type_name: impl Into<String>) -> Self {
        Self {
            reference: TargetRef::Character(id),
            type_name: type_name.into(),
        }
    }
}

/// Player-wide resources held by the resource store.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    Money,
    Influence,
}

/// Character attributes that stat effects may modify.
///
/// Authoring strings name stats in any case (`charisma`, `Charisma`); the
/// mapping is resolved once at parse time through [`std::str::FromStr`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CharacterStat {
    Charisma,
    Intelligence,
    Strength,
    Stealth,
    Loyalty,
    Ambition,
}
