use serde::{Deserialize, Serialize};

use crate::asset::{Asset, AssetKind};
use crate::identity::Guid;

/// Which asset kinds a reference may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    Feature,
    FeatureSelection,
    /// Any feature, including selections.
    FeatureBase,
    Buff,
    Ability,
    /// Anything that can be granted to a unit as a fact.
    UnitFact,
    CharacterClass,
    Archetype,
    Item,
}

impl RefKind {
    pub fn admits(self, kind: AssetKind) -> bool {
        self.admitted_kinds().contains(&kind)
    }

    pub fn admitted_kinds(self) -> &'static [AssetKind] {
        match self {
            Self::Feature => &[AssetKind::Feature],
            Self::FeatureSelection => &[AssetKind::FeatureSelection],
            Self::FeatureBase => &[AssetKind::Feature, AssetKind::FeatureSelection],
            Self::Buff => &[AssetKind::Buff],
            Self::Ability => &[AssetKind::Ability],
            Self::UnitFact => &[
                AssetKind::Feature,
                AssetKind::FeatureSelection,
                AssetKind::Buff,
                AssetKind::Ability,
            ],
            Self::CharacterClass => &[AssetKind::CharacterClass],
            Self::Archetype => &[AssetKind::Archetype],
            Self::Item => &[AssetKind::Item],
        }
    }

    /// True when every kind `self` admits is also admitted by `wider`.
    pub fn widens_to(self, wider: RefKind) -> bool {
        self.admitted_kinds()
            .iter()
            .all(|kind| wider.admits(*kind))
    }
}

impl From<AssetKind> for RefKind {
    fn from(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Feature => Self::Feature,
            AssetKind::FeatureSelection => Self::FeatureSelection,
            AssetKind::Buff => Self::Buff,
            AssetKind::Ability => Self::Ability,
            AssetKind::CharacterClass => Self::CharacterClass,
            AssetKind::Archetype => Self::Archetype,
            AssetKind::Item => Self::Item,
        }
    }
}

/// Identifier-only handle to an asset, tagged with the kinds it may resolve to.
///
/// Building a reference never consults the registry; a dangling reference is
/// only detected by [`crate::AssetRegistry::resolve_ref`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "guid")]
pub enum AssetRef {
    Feature(Guid),
    FeatureSelection(Guid),
    FeatureBase(Guid),
    Buff(Guid),
    Ability(Guid),
    UnitFact(Guid),
    CharacterClass(Guid),
    Archetype(Guid),
    Item(Guid),
}

impl AssetRef {
    pub fn new(kind: RefKind, guid: Guid) -> Self {
        match kind {
            RefKind::Feature => Self::Feature(guid),
            RefKind::FeatureSelection => Self::FeatureSelection(guid),
            RefKind::FeatureBase => Self::FeatureBase(guid),
            RefKind::Buff => Self::Buff(guid),
            RefKind::Ability => Self::Ability(guid),
            RefKind::UnitFact => Self::UnitFact(guid),
            RefKind::CharacterClass => Self::CharacterClass(guid),
            RefKind::Archetype => Self::Archetype(guid),
            RefKind::Item => Self::Item(guid),
        }
    }

    pub fn guid(&self) -> Guid {
        match *self {
            Self::Feature(guid)
            | Self::FeatureSelection(guid)
            | Self::FeatureBase(guid)
            | Self::Buff(guid)
            | Self::Ability(guid)
            | Self::UnitFact(guid)
            | Self::CharacterClass(guid)
            | Self::Archetype(guid)
            | Self::Item(guid) => guid,
        }
    }

    pub fn kind(&self) -> RefKind {
        match self {
            Self::Feature(_) => RefKind::Feature,
            Self::FeatureSelection(_) => RefKind::FeatureSelection,
            Self::FeatureBase(_) => RefKind::FeatureBase,
            Self::Buff(_) => RefKind::Buff,
            Self::Ability(_) => RefKind::Ability,
            Self::UnitFact(_) => RefKind::UnitFact,
            Self::CharacterClass(_) => RefKind::CharacterClass,
            Self::Archetype(_) => RefKind::Archetype,
            Self::Item(_) => RefKind::Item,
        }
    }

    pub fn admits(&self, kind: AssetKind) -> bool {
        self.kind().admits(kind)
    }

    /// Re-tags the reference as `wider`, if that cannot admit anything new.
    pub fn widen(self, wider: RefKind) -> Option<Self> {
        self.kind()
            .widens_to(wider)
            .then(|| Self::new(wider, self.guid()))
    }
}

/// Elementwise [`Asset::to_ref`], preserving order and length.
pub fn to_refs<'a>(assets: impl IntoIterator<Item = &'a Asset>) -> Vec<AssetRef> {
    assets.into_iter().map(Asset::to_ref).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::test_support::{asset, feature};
    use crate::asset::{AssetData, ItemData};

    #[test]
    fn feature_ref_widens_to_feature_base_and_unit_fact() {
        let guid = Guid::from_u128(7);
        let feature = AssetRef::Feature(guid);
        assert_eq!(
            feature.widen(RefKind::FeatureBase),
            Some(AssetRef::FeatureBase(guid))
        );
        assert_eq!(
            feature.widen(RefKind::UnitFact),
            Some(AssetRef::UnitFact(guid))
        );
        assert_eq!(feature.widen(RefKind::Buff), None);
    }

    #[test]
    fn wide_refs_do_not_narrow() {
        let guid = Guid::from_u128(7);
        assert_eq!(AssetRef::UnitFact(guid).widen(RefKind::Buff), None);
        assert_eq!(AssetRef::FeatureBase(guid).widen(RefKind::Feature), None);
        assert_eq!(
            AssetRef::FeatureBase(guid).widen(RefKind::UnitFact),
            Some(AssetRef::UnitFact(guid))
        );
    }

    #[test]
    fn unit_fact_admits_facts_only() {
        assert!(RefKind::UnitFact.admits(AssetKind::Buff));
        assert!(RefKind::UnitFact.admits(AssetKind::FeatureSelection));
        assert!(!RefKind::UnitFact.admits(AssetKind::Item));
        assert!(!RefKind::UnitFact.admits(AssetKind::CharacterClass));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let reference = AssetRef::Buff(Guid::from_u128(0x2a));
        let json = serde_json::to_string(&reference).expect("encode");
        assert_eq!(
            json,
            r#"{"kind":"Buff","guid":"0000000000000000000000000000002a"}"#
        );
        let decoded: AssetRef = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, reference);
    }

    #[test]
    fn to_refs_keeps_order_length_and_kinds() {
        let assets = [
            asset("Wand", 3, AssetData::Item(ItemData { charges: 2 })),
            feature("Toughness", 1),
            asset("Warrior", 2, AssetData::CharacterClass),
            feature("Dodge", 4),
        ];

        let refs = to_refs(&assets);
        assert_eq!(
            refs,
            vec![
                AssetRef::Item(Guid::from_u128(3)),
                AssetRef::Feature(Guid::from_u128(1)),
                AssetRef::CharacterClass(Guid::from_u128(2)),
                AssetRef::Feature(Guid::from_u128(4)),
            ]
        );
        assert!(to_refs(&assets[..0]).is_empty());
    }
}
