use serde::Serialize;
use tracing::warn;

use crate::components::{Component, ComponentList};
use crate::icons::Icon;
use crate::identity::Guid;
use crate::localization::LocalizedText;
use crate::progression::LevelTable;
use crate::reference::{AssetRef, RefKind};
use crate::rules::{AbilityRange, AbilityType, CommandType, FeatureGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetKind {
    Feature,
    FeatureSelection,
    Buff,
    Ability,
    CharacterClass,
    Archetype,
    Item,
}

/// Handle to a visual effect prefab owned by the host game. Empty means none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefabLink {
    pub asset_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureData {
    pub groups: Vec<FeatureGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSelectionData {
    pub groups: Vec<FeatureGroup>,
    pub all_features: Vec<AssetRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuffData {
    pub fx_on_start: PrefabLink,
    pub fx_on_remove: PrefabLink,
    pub is_class_feature: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityData {
    pub ability_type: AbilityType,
    pub action_type: CommandType,
    pub range: AbilityRange,
    pub localized_duration: LocalizedText,
    pub localized_saving_throw: LocalizedText,
    pub resource_asset_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchetypeData {
    pub add_features: LevelTable,
    pub remove_features: LevelTable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ItemData {
    pub charges: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum AssetData {
    Feature(FeatureData),
    FeatureSelection(FeatureSelectionData),
    Buff(BuffData),
    Ability(AbilityData),
    CharacterClass,
    Archetype(ArchetypeData),
    Item(ItemData),
}

impl AssetData {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Feature(_) => AssetKind::Feature,
            Self::FeatureSelection(_) => AssetKind::FeatureSelection,
            Self::Buff(_) => AssetKind::Buff,
            Self::Ability(_) => AssetKind::Ability,
            Self::CharacterClass => AssetKind::CharacterClass,
            Self::Archetype(_) => AssetKind::Archetype,
            Self::Item(_) => AssetKind::Item,
        }
    }
}

/// A registered content record.
///
/// Name and guid are fixed at construction; the component list may grow.
#[derive(Debug, Clone)]
pub struct Asset {
    guid: Guid,
    name: String,
    display_name: LocalizedText,
    description: LocalizedText,
    icon: Option<Icon>,
    components: ComponentList,
    data: AssetData,
}

impl Asset {
    pub(crate) fn new(
        guid: Guid,
        name: String,
        display_name: LocalizedText,
        description: LocalizedText,
        icon: Option<Icon>,
        data: AssetData,
    ) -> Self {
        Self {
            guid,
            name,
            display_name,
            description,
            icon,
            components: ComponentList::new(),
            data,
        }
    }

    /// A copy with a new identity; display text, icon and components carry over.
    pub(crate) fn copy_as(&self, guid: Guid, name: String) -> Self {
        Self {
            guid,
            name,
            ..self.clone()
        }
    }

    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AssetKind {
        self.data.kind()
    }

    pub fn display_name(&self) -> &LocalizedText {
        &self.display_name
    }

    pub fn description(&self) -> &LocalizedText {
        &self.description
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    pub fn components(&self) -> &ComponentList {
        &self.components
    }

    pub fn data(&self) -> &AssetData {
        &self.data
    }

    /// Reference tagged with this asset's own kind.
    pub fn to_ref(&self) -> AssetRef {
        AssetRef::new(RefKind::from(self.kind()), self.guid)
    }

    /// Reference tagged as `kind`, if `kind` admits this asset.
    pub fn to_ref_as(&self, kind: RefKind) -> Option<AssetRef> {
        kind.admits(self.kind())
            .then(|| AssetRef::new(kind, self.guid))
    }

    /// Appends after the current components; returns how many were added.
    pub fn add_components(&mut self, components: impl IntoIterator<Item = Component>) -> usize {
        let kind = self.kind();
        let (name, guid) = (&self.name, self.guid);
        let components = components.into_iter().inspect(|component| {
            if let Some(allowed) = component.allowed_on() {
                if !allowed.contains(&kind) {
                    warn!(
                        asset = %name,
                        guid = %guid,
                        component = component.type_name(),
                        kind = ?kind,
                        "component_not_allowed_on_asset_kind"
                    );
                }
            }
        });
        self.components.append(components)
    }

    pub fn set_components(&mut self, components: impl IntoIterator<Item = Component>) {
        self.components.replace_all(components);
    }

    pub fn has_restore_end_of_combat(&self) -> bool {
        self.components
            .contains(|component| matches!(component, Component::RestoreEndOfCombat))
    }

    pub fn archetype_mut(&mut self) -> Option<&mut ArchetypeData> {
        match &mut self.data {
            AssetData::Archetype(data) => Some(data),
            _ => None,
        }
    }

    pub fn selection_mut(&mut self) -> Option<&mut FeatureSelectionData> {
        match &mut self.data {
            AssetData::FeatureSelection(data) => Some(data),
            _ => None,
        }
    }

    pub fn item(&self) -> Option<&ItemData> {
        match &self.data {
            AssetData::Item(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn asset(name: &str, guid: u128, data: AssetData) -> Asset {
        Asset::new(
            Guid::from_u128(guid),
            name.to_string(),
            LocalizedText::new(format!("{name}.name")),
            LocalizedText::new(format!("{name}.description")),
            None,
            data,
        )
    }

    pub(crate) fn feature(name: &str, guid: u128) -> Asset {
        asset(name, guid, AssetData::Feature(FeatureData::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{asset, feature};
    use super::*;
    use crate::components::AddFacts;

    fn facts(n: u128) -> Component {
        Component::AddFacts(AddFacts {
            facts: vec![AssetRef::UnitFact(Guid::from_u128(n))],
        })
    }

    #[test]
    fn to_ref_is_tagged_with_own_kind() {
        let item = asset("Wand", 5, AssetData::Item(ItemData { charges: 3 }));
        assert_eq!(item.to_ref(), AssetRef::Item(Guid::from_u128(5)));
        assert_eq!(
            feature("Toughness", 6).to_ref(),
            AssetRef::Feature(Guid::from_u128(6))
        );
    }

    #[test]
    fn to_ref_as_respects_admitted_kinds() {
        let toughness = feature("Toughness", 6);
        assert_eq!(
            toughness.to_ref_as(RefKind::UnitFact),
            Some(AssetRef::UnitFact(Guid::from_u128(6)))
        );
        assert_eq!(toughness.to_ref_as(RefKind::Buff), None);
    }

    #[test]
    fn add_components_appends_in_order() {
        let mut toughness = feature("Toughness", 6);
        toughness.add_components([facts(1)]);
        toughness.add_components([facts(2)]);
        assert_eq!(toughness.components().as_slice(), &[facts(1), facts(2)]);

        assert_eq!(toughness.add_components(Vec::new()), 0);
        assert_eq!(toughness.components().len(), 2);
    }

    #[test]
    fn copy_keeps_components_under_new_identity() {
        let mut toughness = feature("Toughness", 6);
        toughness.add_components([facts(1)]);
        let copy = toughness.copy_as(Guid::from_u128(7), "GreaterToughness".to_string());
        assert_eq!(copy.guid(), Guid::from_u128(7));
        assert_eq!(copy.name(), "GreaterToughness");
        assert_eq!(copy.components(), toughness.components());
        assert_eq!(copy.display_name(), toughness.display_name());
    }

    #[test]
    fn restore_marker_is_detected() {
        let mut wand = asset("Wand", 5, AssetData::Item(ItemData { charges: 3 }));
        assert!(!wand.has_restore_end_of_combat());
        wand.add_components([Component::RestoreEndOfCombat]);
        assert!(wand.has_restore_end_of_combat());
    }
}
