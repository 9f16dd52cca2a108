use std::time::Duration;

use serde::Serialize;

use crate::actions::ActionList;
use crate::asset::AssetKind;
use crate::reference::AssetRef;
use crate::rules::{CommandType, CompareType, PrerequisiteGroup, SavingThrowType};

const ABILITY_ONLY: &[AssetKind] = &[AssetKind::Ability];
const ITEM_ONLY: &[AssetKind] = &[AssetKind::Item];

/// A behavior fragment attached to an asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Component {
    AbilityEffectRunAction(AbilityEffectRunAction),
    AbilityRequirementActionAvailable(AbilityRequirementActionAvailable),
    AbilityRequirementHasBuffs(AbilityRequirementHasBuffs),
    AbilityRequirementHasBuffTimed(AbilityRequirementHasBuffTimed),
    AddFacts(AddFacts),
    PrerequisiteClassLevel(PrerequisiteClassLevel),
    ClassLevelsForPrerequisites(ClassLevelsForPrerequisites),
    /// Marks an item whose charges refill when combat ends.
    RestoreEndOfCombat,
}

impl Component {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AbilityEffectRunAction(_) => "AbilityEffectRunAction",
            Self::AbilityRequirementActionAvailable(_) => "AbilityRequirementActionAvailable",
            Self::AbilityRequirementHasBuffs(_) => "AbilityRequirementHasBuffs",
            Self::AbilityRequirementHasBuffTimed(_) => "AbilityRequirementHasBuffTimed",
            Self::AddFacts(_) => "AddFacts",
            Self::PrerequisiteClassLevel(_) => "PrerequisiteClassLevel",
            Self::ClassLevelsForPrerequisites(_) => "ClassLevelsForPrerequisites",
            Self::RestoreEndOfCombat => "RestoreEndOfCombat",
        }
    }

    /// Asset kinds the host engine accepts this fragment on; `None` means any.
    pub fn allowed_on(&self) -> Option<&'static [AssetKind]> {
        match self {
            Self::AbilityEffectRunAction(_)
            | Self::AbilityRequirementActionAvailable(_)
            | Self::AbilityRequirementHasBuffs(_)
            | Self::AbilityRequirementHasBuffTimed(_) => Some(ABILITY_ONLY),
            Self::RestoreEndOfCombat => Some(ITEM_ONLY),
            Self::AddFacts(_)
            | Self::PrerequisiteClassLevel(_)
            | Self::ClassLevelsForPrerequisites(_) => None,
        }
    }
}

/// Ordered fragments of one asset. Appends never reorder earlier entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComponentList {
    components: Vec<Component>,
}

impl ComponentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends after the existing entries; returns how many were added.
    pub fn append(&mut self, components: impl IntoIterator<Item = Component>) -> usize {
        let before = self.components.len();
        self.components.extend(components);
        self.components.len() - before
    }

    pub fn replace_all(&mut self, components: impl IntoIterator<Item = Component>) {
        self.components = components.into_iter().collect();
    }

    pub fn contains(&self, predicate: impl Fn(&Component) -> bool) -> bool {
        self.components.iter().any(predicate)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn as_slice(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<Component> for ComponentList {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ComponentList {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityEffectRunAction {
    pub saving_throw_type: SavingThrowType,
    pub actions: ActionList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityRequirementActionAvailable {
    pub not: bool,
    pub action: CommandType,
    pub amount: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityRequirementHasBuffs {
    pub not: bool,
    pub buffs: Vec<AssetRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityRequirementHasBuffTimed {
    pub compare: CompareType,
    pub time_left: Duration,
    pub buffs: Vec<AssetRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddFacts {
    pub facts: Vec<AssetRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteClassLevel {
    pub character_class: AssetRef,
    pub level: u32,
    pub group: PrerequisiteGroup,
}

/// Counts levels of `actual_class` (scaled and offset) as levels of
/// `fake_class` when checking prerequisites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassLevelsForPrerequisites {
    pub fake_class: AssetRef,
    pub actual_class: Option<AssetRef>,
    pub summand: i32,
    pub modifier: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Guid;

    fn facts(n: u128) -> Component {
        Component::AddFacts(AddFacts {
            facts: vec![AssetRef::Feature(Guid::from_u128(n))],
        })
    }

    #[test]
    fn append_preserves_prior_order() {
        let mut list: ComponentList = [facts(1)].into_iter().collect();
        let added = list.append([facts(2), Component::RestoreEndOfCombat]);
        assert_eq!(added, 2);
        assert_eq!(
            list.as_slice(),
            &[facts(1), facts(2), Component::RestoreEndOfCombat]
        );
    }

    #[test]
    fn appending_nothing_is_a_no_op() {
        let mut list: ComponentList = [facts(1), facts(2)].into_iter().collect();
        let before = list.clone();
        assert_eq!(list.append(std::iter::empty::<Component>()), 0);
        assert_eq!(list, before);
    }

    #[test]
    fn replace_all_discards_previous_entries() {
        let mut list: ComponentList = [facts(1), facts(2)].into_iter().collect();
        list.replace_all([Component::RestoreEndOfCombat]);
        assert_eq!(list.as_slice(), &[Component::RestoreEndOfCombat]);
    }

    #[test]
    fn restore_marker_is_item_only() {
        assert_eq!(
            Component::RestoreEndOfCombat.allowed_on(),
            Some(&[AssetKind::Item][..])
        );
        assert_eq!(facts(1).allowed_on(), None);
    }
}
