//! Type-compatibility rules for action tags.
//!
//! Tags are added to a template one at a time in authoring order. The first
//! tag establishing a mode is never rejected; each later tag is checked
//! against every tag added so far.

use super::error::TagError;
use super::kind::{ActionType, ActorMode, ExecutionMode};

/// Returns true if `candidate` may be added next to every tag in `existing`.
pub fn compatible(existing: &[ActionType], candidate: ActionType) -> bool {
    existing.iter().all(|&tag| !conflicts(tag, candidate))
}

const fn conflicts(existing: ActionType, candidate: ActionType) -> bool {
    use ActionType::*;
    matches!(
        (existing, candidate),
        (Organization, Personal)
            | (Personal, Organization)
            | (Indicator | Repeatable, Immediate)
            | (Immediate | Repeatable, Indicator)
            | (Immediate | Indicator, Repeatable)
    )
}

/// Ordered set of tags that always satisfies [`compatible`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<ActionType>", into = "Vec<ActionType>")
)]
pub struct TypeTags(Vec<ActionType>);

impl TypeTags {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a tag after checking it against every tag already present.
    ///
    /// Returns `Ok(false)` when the tag was already present (sets ignore
    /// repeats).
    pub fn push(&mut self, tag: ActionType) -> Result<bool, TagError> {
        if self.0.contains(&tag) {
            return Ok(false);
        }
        if let Some(&existing) = self.0.iter().find(|&&existing| conflicts(existing, tag)) {
            return Err(TagError::Incompatible {
                existing,
                candidate: tag,
            });
        }
        self.0.push(tag);
        Ok(true)
    }

    /// Builds a tag set, failing on the first incompatible tag.
    pub fn from_tags(tags: impl IntoIterator<Item = ActionType>) -> Result<Self, TagError> {
        let mut set = Self::new();
        for tag in tags {
            set.push(tag)?;
        }
        Ok(set)
    }

    /// The execution mode, if any mode tag has been added.
    pub fn execution_mode(&self) -> Option<ExecutionMode> {
        self.0.iter().find_map(|tag| tag.execution_mode())
    }

    /// The actor-resolution mode. Templates without an actor tag act personally.
    pub fn actor_mode(&self) -> ActorMode {
        self.0
            .iter()
            .find_map(|tag| tag.actor_mode())
            .unwrap_or_default()
    }

    pub fn is_illegal(&self) -> bool {
        self.contains(ActionType::Illegal)
    }

    pub fn contains(&self, tag: ActionType) -> bool {
        self.0.contains(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionType> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<ActionType>> for TypeTags {
    type Error = TagError;

    fn try_from(tags: Vec<ActionType>) -> Result<Self, Self::Error> {
        Self::from_tags(tags)
    }
}

impl From<TypeTags> for Vec<ActionType> {
    fn from(tags: TypeTags) -> Self {
        tags.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ActionType::*;
    use strum::IntoEnumIterator;

    #[test]
    fn actor_modes_exclude_each_other() {
        assert!(!compatible(&[Personal], Organization));
        assert!(!compatible(&[Organization], Personal));
        assert!(compatible(&[Personal], Immediate));
    }

    #[test]
    fn execution_modes_exclude_each_other() {
        assert!(!compatible(&[Indicator], Immediate));
        assert!(!compatible(&[Repeatable], Immediate));
        assert!(!compatible(&[Immediate], Indicator));
        assert!(!compatible(&[Repeatable], Indicator));
        assert!(!compatible(&[Immediate], Repeatable));
        assert!(!compatible(&[Indicator], Repeatable));
    }

    #[test]
    fn illegal_is_always_compatible() {
        for tag in ActionType::iter() {
            assert!(compatible(&[tag], Illegal), "Illegal rejected next to {tag}");
            assert!(compatible(&[Illegal], tag), "{tag} rejected next to Illegal");
        }
    }

    #[test]
    fn first_mode_tag_is_never_rejected() {
        for tag in ActionType::iter() {
            assert!(compatible(&[], tag));
        }
    }

    #[test]
    fn later_tags_are_checked_against_all_previous_tags() {
        let err = TypeTags::from_tags([Illegal, Personal, Indicator, Organization]).unwrap_err();
        assert_eq!(
            err,
            TagError::Incompatible {
                existing: Personal,
                candidate: Organization
            }
        );

        let err = TypeTags::from_tags([Immediate, Personal, Repeatable]).unwrap_err();
        assert_eq!(
            err,
            TagError::Incompatible {
                existing: Immediate,
                candidate: Repeatable
            }
        );
    }

    #[test]
    fn tag_set_reports_modes_and_ignores_repeats() {
        let mut tags = TypeTags::new();
        assert_eq!(tags.push(Repeatable), Ok(true));
        assert_eq!(tags.push(Organization), Ok(true));
        assert_eq!(tags.push(Repeatable), Ok(false));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.execution_mode(), Some(ExecutionMode::Repeatable));
        assert_eq!(tags.actor_mode(), ActorMode::Organization);
        assert!(!tags.is_illegal());
    }

    #[test]
    fn missing_actor_tag_defaults_to_personal() {
        let tags = TypeTags::from_tags([Indicator, Illegal]).unwrap();
        assert_eq!(tags.actor_mode(), ActorMode::Personal);
        assert!(tags.is_illegal());
        assert_eq!(TypeTags::from_tags([Illegal]).unwrap().execution_mode(), None);
    }
}
