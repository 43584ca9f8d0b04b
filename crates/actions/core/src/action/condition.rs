//! Conditions checked before an action runs (and before every repeat).

/// Names accepted as token 0 of a condition line.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ConditionKind {
    PlayerHasMoneyValue,
    PlayerHasInfluenceValue,
    TargetLocationType,
}

/// What a condition requires of the world.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Requirement {
    /// Player money must be at least this amount.
    PlayerHasMoney(i64),
    /// Player influence must be at least this amount.
    PlayerHasInfluence(i64),
    /// The target's type name must match exactly.
    TargetLocationType(String),
}

/// A value observed from an external collaborator during verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observed<'a> {
    Amount(i64),
    TypeName(&'a str),
}

impl Requirement {
    pub const fn kind(&self) -> ConditionKind {
        match self {
            Self::PlayerHasMoney(_) => ConditionKind::PlayerHasMoneyValue,
            Self::PlayerHasInfluence(_) => ConditionKind::PlayerHasInfluenceValue,
            Self::TargetLocationType(_) => ConditionKind::TargetLocationType,
        }
    }

    /// Compares an observed value against the requirement.
    ///
    /// Numeric requirements hold when `actual >= required`; type names must
    /// match exactly. A mismatched observation kind never satisfies.
    pub fn is_satisfied_by(&self, observed: Observed<'_>) -> bool {
        match (self, observed) {
            (Self::PlayerHasMoney(required), Observed::Amount(actual))
            | (Self::PlayerHasInfluence(required), Observed::Amount(actual)) => actual >= *required,
            (Self::TargetLocationType(expected), Observed::TypeName(actual)) => expected == actual,
            _ => false,
        }
    }
}

/// A requirement plus the result of its most recent verification.
///
/// Results belong to one instance: template conditions are never marked, and
/// every instance starts from a fresh copy with `is_met == false`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub requirement: Requirement,
    pub is_met: bool,
}

impl Condition {
    pub const fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            is_met: false,
        }
    }

    pub const fn kind(&self) -> ConditionKind {
        self.requirement.kind()
    }

    /// Evaluates the requirement and records the result.
    pub fn record(&mut self, observed: Observed<'_>) -> bool {
        self.is_met = self.requirement.is_satisfied_by(observed);
        self.is_met
    }

    pub fn reset(&mut self) {
        self.is_met = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_requirements_accept_equal_or_greater() {
        let money = Requirement::PlayerHasMoney(50);
        assert!(money.is_satisfied_by(Observed::Amount(50)));
        assert!(money.is_satisfied_by(Observed::Amount(100)));
        assert!(!money.is_satisfied_by(Observed::Amount(49)));
    }

    #[test]
    fn type_requirement_matches_exactly() {
        let tavern = Requirement::TargetLocationType("Tavern".into());
        assert!(tavern.is_satisfied_by(Observed::TypeName("Tavern")));
        assert!(!tavern.is_satisfied_by(Observed::TypeName("tavern")));
        assert!(!tavern.is_satisfied_by(Observed::Amount(1)));
    }

    #[test]
    fn record_overwrites_previous_result() {
        let mut condition = Condition::new(Requirement::PlayerHasInfluence(3));
        assert!(!condition.is_met);
        assert!(condition.record(Observed::Amount(5)));
        assert!(!condition.record(Observed::Amount(1)));
        assert!(!condition.is_met);
    }
}
