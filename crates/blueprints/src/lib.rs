pub mod actions;
pub mod asset;
pub mod components;
pub mod config;
pub mod context;
pub mod fragments;
pub mod icons;
pub mod identity;
pub mod localization;
pub mod paths;
pub mod progression;
pub mod reactive;
pub mod reference;
pub mod registry;
pub mod rules;
pub mod session;

pub use asset::{Asset, AssetData, AssetKind, PrefabLink};
pub use components::{Component, ComponentList};
pub use config::{load_config, AuthoringConfig, ConfigError, CONFIG_FILE_NAME};
pub use context::{ContextDurationValue, ContextValue};
pub use fragments::FragmentError;
pub use icons::{FileIconLoader, Icon, IconError, IconLoader, IconPathError, NoIcons};
pub use identity::{Guid, GuidAllocator, GuidError};
pub use localization::{create_string, LocalizationBackend, LocalizationPack, LocalizedText};
pub use paths::{ModPaths, ModRootError, ICONS_DIR_NAME, ROOT_ENV_VAR};
pub use progression::{LevelEntry, LevelTable, ProgressionError};
pub use reactive::{
    CombatContext, CombatEventSource, EventBus, Party, PartyRoster, RestoreEndOfCombat,
};
pub use reference::{to_refs, AssetRef, RefKind};
pub use registry::{AssetRegistry, DuplicatePolicy, RegistryError};
pub use session::{
    AbilityTraits, AssetSpec, AuthoringError, AuthoringOutput, AuthoringSession,
    BASIC_FEATS_SELECTION,
};
