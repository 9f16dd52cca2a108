use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::asset::{Asset, AssetKind};
use crate::identity::Guid;
use crate::reference::{AssetRef, RefKind};

/// What `register` does when the guid is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Last write wins; the replacement is logged.
    #[default]
    Overwrite,
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown duplicate policy '{other}' (expected 'overwrite' or 'reject')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no asset registered with guid {guid}")]
    NotFound { guid: Guid },
    #[error("asset {guid} is a {actual:?}, which a {expected:?} reference does not admit")]
    KindMismatch {
        guid: Guid,
        expected: RefKind,
        actual: AssetKind,
    },
    #[error("guid {guid} is already registered to '{existing_name}'")]
    Duplicate { guid: Guid, existing_name: String },
    #[error("registry is closed; cannot modify asset {guid}")]
    Closed { guid: Guid },
}

/// Guid-keyed store of every asset built during one authoring run.
///
/// Assets are kept in registration order. Once closed the registry is
/// read-only.
#[derive(Debug)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
    index_by_guid: HashMap<Guid, usize>,
    policy: DuplicatePolicy,
    open: bool,
}

impl AssetRegistry {
    pub fn open(policy: DuplicatePolicy) -> Self {
        Self {
            assets: Vec::new(),
            index_by_guid: HashMap::new(),
            policy,
            open: true,
        }
    }

    pub fn close(&mut self) {
        if self.open {
            info!(assets = self.assets.len(), "asset_registry_closed");
        }
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Fails with the error `register` would return for `guid`, without storing anything.
    pub fn check_insertable(&self, guid: Guid) -> Result<(), RegistryError> {
        if !self.open {
            return Err(RegistryError::Closed { guid });
        }
        match self.get(guid) {
            Some(existing) if self.policy == DuplicatePolicy::Reject => {
                Err(RegistryError::Duplicate {
                    guid,
                    existing_name: existing.name().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Stores `asset` under its own guid and hands back the stored record.
    pub fn register(&mut self, asset: Asset) -> Result<&mut Asset, RegistryError> {
        let guid = asset.guid();
        self.check_insertable(guid)?;

        let index = match self.index_by_guid.get(&guid).copied() {
            Some(index) => {
                warn!(
                    guid = %guid,
                    existing = self.assets[index].name(),
                    replacement = asset.name(),
                    "asset_registration_overwrote_existing"
                );
                self.assets[index] = asset;
                index
            }
            None => {
                let index = self.assets.len();
                self.assets.push(asset);
                self.index_by_guid.insert(guid, index);
                index
            }
        };

        let stored = &mut self.assets[index];
        info!(
            guid = %guid,
            name = stored.name(),
            kind = ?stored.kind(),
            "asset_registered"
        );
        Ok(stored)
    }

    pub fn get(&self, guid: Guid) -> Option<&Asset> {
        self.index_by_guid
            .get(&guid)
            .map(|index| &self.assets[*index])
    }

    pub fn resolve(&self, guid: Guid) -> Result<&Asset, RegistryError> {
        self.get(guid).ok_or(RegistryError::NotFound { guid })
    }

    /// Mutable access for post-registration edits; fails once closed.
    pub fn resolve_mut(&mut self, guid: Guid) -> Result<&mut Asset, RegistryError> {
        if !self.open {
            return Err(RegistryError::Closed { guid });
        }
        let index = *self
            .index_by_guid
            .get(&guid)
            .ok_or(RegistryError::NotFound { guid })?;
        Ok(&mut self.assets[index])
    }

    pub fn resolve_ref(&self, reference: AssetRef) -> Result<&Asset, RegistryError> {
        let asset = self.resolve(reference.guid())?;
        check_kind(reference, asset.kind())?;
        Ok(asset)
    }

    pub fn resolve_ref_mut(&mut self, reference: AssetRef) -> Result<&mut Asset, RegistryError> {
        let asset = self.resolve_mut(reference.guid())?;
        check_kind(reference, asset.kind())?;
        Ok(asset)
    }

    pub fn contains(&self, guid: Guid) -> bool {
        self.index_by_guid.contains_key(&guid)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::open(DuplicatePolicy::default())
    }
}

fn check_kind(reference: AssetRef, actual: AssetKind) -> Result<(), RegistryError> {
    if reference.admits(actual) {
        Ok(())
    } else {
        Err(RegistryError::KindMismatch {
            guid: reference.guid(),
            expected: reference.kind(),
            actual,
        })
    }
}
