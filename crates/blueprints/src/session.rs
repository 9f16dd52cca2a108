//! Asset builders.
//!
//! An [`AuthoringSession`] owns the registry, the guid allocator and the two
//! host collaborators (strings and icons) for one authoring run. Every
//! `create_*` call assembles one asset, registers it and returns the stored
//! record so callers can keep attaching components.

use thiserror::Error;
use tracing::{info, warn};

use crate::asset::{
    AbilityData, Asset, AssetData, BuffData, FeatureData, FeatureSelectionData, ItemData,
    PrefabLink,
};
use crate::components::Component;
use crate::config::AuthoringConfig;
use crate::fragments::{expect_ref, FragmentError};
use crate::icons::{Icon, IconLoader};
use crate::identity::{Guid, GuidAllocator, GuidError};
use crate::localization::{self, LocalizationBackend, LocalizedText};
use crate::progression::{self, ProgressionError};
use crate::reference::{AssetRef, RefKind};
use crate::registry::{AssetRegistry, RegistryError};
use crate::rules::{AbilityRange, AbilityType, CommandType, FeatureGroup};

/// The host game's selection offered for every general feat slot.
pub const BASIC_FEATS_SELECTION: Guid = Guid::from_u128(0x247a4068296e8be42890143f451b4b45);

#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error(transparent)]
    Guid(#[from] GuidError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

/// Fields shared by every builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSpec {
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Explicit guid text; derived from `name` when absent.
    pub guid: Option<String>,
    /// Filename inside the icons directory.
    pub icon: Option<String>,
    pub components: Vec<Component>,
}

impl AssetSpec {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_icon(mut self, filename: impl Into<String>) -> Self {
        self.icon = Some(filename.into());
        self
    }

    pub fn with_components(mut self, components: impl IntoIterator<Item = Component>) -> Self {
        self.components.extend(components);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilityTraits {
    pub ability_type: AbilityType,
    pub action_type: CommandType,
    pub range: AbilityRange,
    pub duration: String,
    pub saving_throw: String,
    pub resource_asset_ids: Vec<String>,
}

/// What survives an authoring run: the sealed registry and its strings.
pub struct AuthoringOutput {
    pub registry: AssetRegistry,
    pub strings: Box<dyn LocalizationBackend>,
}

pub struct AuthoringSession {
    registry: AssetRegistry,
    guids: GuidAllocator,
    strings: Box<dyn LocalizationBackend>,
    icons: Box<dyn IconLoader>,
}

impl AuthoringSession {
    pub fn new(
        config: &AuthoringConfig,
        strings: Box<dyn LocalizationBackend>,
        icons: Box<dyn IconLoader>,
    ) -> Result<Self, AuthoringError> {
        let mut guids = GuidAllocator::new(config.guid_namespace.clone());
        for (name, text) in &config.pinned_guids {
            guids.pin(name, Guid::parse(text)?)?;
        }
        info!(
            namespace = %config.guid_namespace,
            policy = ?config.duplicate_policy,
            pinned = config.pinned_guids.len(),
            "authoring_session_opened"
        );
        Ok(Self {
            registry: AssetRegistry::open(config.duplicate_policy),
            guids,
            strings,
            icons,
        })
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn guids(&self) -> &GuidAllocator {
        &self.guids
    }

    pub fn strings(&self) -> &dyn LocalizationBackend {
        self.strings.as_ref()
    }

    /// Guid for `name`: the pinned one if any, otherwise derived.
    pub fn guid_for(&mut self, name: &str) -> Result<Guid, AuthoringError> {
        Ok(self.guids.get(name)?)
    }

    pub fn create_string(&mut self, value: &str, key: Option<&str>) -> LocalizedText {
        localization::create_string(self.strings.as_mut(), value, key)
    }

    /// Loads an icon, or logs and returns `None` when that fails.
    pub fn create_sprite(&self, filename: &str) -> Option<Icon> {
        match self.icons.load_icon(filename) {
            Ok(icon) => Some(icon),
            Err(error) => {
                warn!(filename, error = %error, "icon_load_failed_using_none");
                None
            }
        }
    }

    pub fn create_buff(
        &mut self,
        spec: AssetSpec,
        fx_on_start: Option<PrefabLink>,
    ) -> Result<&mut Asset, AuthoringError> {
        let data = AssetData::Buff(BuffData {
            fx_on_start: fx_on_start.unwrap_or_default(),
            fx_on_remove: PrefabLink::default(),
            is_class_feature: true,
        });
        self.build(spec, data)
    }

    pub fn create_feature(
        &mut self,
        spec: AssetSpec,
        group: Option<FeatureGroup>,
    ) -> Result<&mut Asset, AuthoringError> {
        let data = AssetData::Feature(FeatureData {
            groups: group.into_iter().collect(),
        });
        self.build(spec, data)
    }

    pub fn create_feature_selection(
        &mut self,
        spec: AssetSpec,
        group: Option<FeatureGroup>,
        features: &[AssetRef],
    ) -> Result<&mut Asset, AuthoringError> {
        let all_features = features
            .iter()
            .map(|feature| expect_ref(*feature, RefKind::FeatureBase, "features"))
            .collect::<Result<Vec<_>, _>>()?;
        let data = AssetData::FeatureSelection(FeatureSelectionData {
            groups: group.into_iter().collect(),
            all_features,
        });
        self.build(spec, data)
    }

    pub fn create_ability(
        &mut self,
        spec: AssetSpec,
        traits: AbilityTraits,
    ) -> Result<&mut Asset, AuthoringError> {
        self.build_with(spec, |session, name| {
            let localized_duration =
                session.create_string(&traits.duration, Some(&format!("{name}.duration")));
            let localized_saving_throw = session
                .create_string(&traits.saving_throw, Some(&format!("{name}.saving_throw")));
            AssetData::Ability(AbilityData {
                ability_type: traits.ability_type,
                action_type: traits.action_type,
                range: traits.range,
                localized_duration,
                localized_saving_throw,
                resource_asset_ids: traits.resource_asset_ids,
            })
        })
    }

    pub fn create_character_class(&mut self, spec: AssetSpec) -> Result<&mut Asset, AuthoringError> {
        self.build(spec, AssetData::CharacterClass)
    }

    pub fn create_archetype(&mut self, spec: AssetSpec) -> Result<&mut Asset, AuthoringError> {
        self.build(spec, AssetData::Archetype(Default::default()))
    }

    pub fn create_item(&mut self, spec: AssetSpec, charges: u32) -> Result<&mut Asset, AuthoringError> {
        self.build(spec, AssetData::Item(ItemData { charges }))
    }

    /// Registers a copy of `source` under a new name and guid.
    pub fn copy_asset(
        &mut self,
        source: AssetRef,
        name: &str,
        guid: Option<&str>,
    ) -> Result<&mut Asset, AuthoringError> {
        let source = self.registry.resolve_ref(source)?;
        let guid = self.identity_for(name, guid)?;
        let copy = source.copy_as(guid, name.to_string());

        let copy = self.registry.register(copy)?;
        self.guids.bind(copy.name(), guid);
        Ok(copy)
    }

    /// Appends `components` to an already registered asset.
    pub fn attach(
        &mut self,
        target: AssetRef,
        components: impl IntoIterator<Item = Component>,
    ) -> Result<usize, AuthoringError> {
        Ok(self.registry.resolve_ref_mut(target)?.add_components(components))
    }

    pub fn replace_components(
        &mut self,
        target: AssetRef,
        components: impl IntoIterator<Item = Component>,
    ) -> Result<(), AuthoringError> {
        self.registry
            .resolve_ref_mut(target)?
            .set_components(components);
        Ok(())
    }

    pub fn add_feature_at_level(
        &mut self,
        archetype: AssetRef,
        level: u32,
        feature: AssetRef,
    ) -> Result<(), AuthoringError> {
        let archetype = self.registry.resolve_ref_mut(archetype)?;
        progression::add_feature(archetype, level, feature)?;
        Ok(())
    }

    pub fn remove_feature_at_level(
        &mut self,
        archetype: AssetRef,
        level: u32,
        feature: AssetRef,
    ) -> Result<(), AuthoringError> {
        let archetype = self.registry.resolve_ref_mut(archetype)?;
        progression::remove_feature(archetype, level, feature)?;
        Ok(())
    }

    /// Offers `feats` in every basic feat slot; returns how many were added.
    ///
    /// The selection itself belongs to the host game and must already be
    /// registered under [`BASIC_FEATS_SELECTION`].
    pub fn add_feats(&mut self, feats: &[AssetRef]) -> Result<usize, AuthoringError> {
        let feats = feats
            .iter()
            .map(|feat| expect_ref(*feat, RefKind::FeatureBase, "feats"))
            .collect::<Result<Vec<_>, _>>()?;
        let selection_ref = AssetRef::FeatureSelection(BASIC_FEATS_SELECTION);
        let selection = self.registry.resolve_ref_mut(selection_ref)?;
        let actual = selection.kind();
        let data = selection
            .selection_mut()
            .ok_or(RegistryError::KindMismatch {
                guid: BASIC_FEATS_SELECTION,
                expected: RefKind::FeatureSelection,
                actual,
            })?;
        data.all_features.extend(feats.iter().copied());
        info!(added = feats.len(), total = data.all_features.len(), "basic_feats_extended");
        Ok(feats.len())
    }

    /// Seals the registry and hands back everything that was built.
    pub fn finish(mut self) -> AuthoringOutput {
        self.registry.close();
        AuthoringOutput {
            registry: self.registry,
            strings: self.strings,
        }
    }

    /// Guid a new asset called `name` would get. Records nothing.
    ///
    /// An explicit guid is taken as given; whether it may replace an existing
    /// asset is the registry's duplicate policy to decide.
    fn identity_for(&self, name: &str, guid: Option<&str>) -> Result<Guid, AuthoringError> {
        match guid {
            Some(_) if name.is_empty() => Err(GuidError::EmptyName.into()),
            Some(text) => Ok(Guid::parse(text)?),
            None => Ok(self.guids.peek(name)?),
        }
    }

    fn build(&mut self, spec: AssetSpec, data: AssetData) -> Result<&mut Asset, AuthoringError> {
        self.build_with(spec, |_, _| data)
    }

    /// Strings, icon and the name binding are only written once the registry
    /// is known to accept the guid.
    fn build_with(
        &mut self,
        spec: AssetSpec,
        data: impl FnOnce(&mut Self, &str) -> AssetData,
    ) -> Result<&mut Asset, AuthoringError> {
        let AssetSpec {
            name,
            display_name,
            description,
            guid,
            icon,
            components,
        } = spec;
        let guid = self.identity_for(&name, guid.as_deref())?;
        self.registry.check_insertable(guid)?;

        let display_name = self.create_string(&display_name, Some(&format!("{name}.name")));
        let description = self.create_string(&description, Some(&format!("{name}.description")));
        let icon = icon.as_deref().and_then(|filename| self.create_sprite(filename));
        let data = data(&mut *self, &name);

        let mut asset = Asset::new(guid, name, display_name, description, icon, data);
        asset.add_components(components);
        let asset = self.registry.register(asset)?;
        self.guids.bind(asset.name(), guid);
        Ok(asset)
    }
}
