use serde::Serialize;
use thiserror::Error;

use crate::asset::{Asset, AssetKind};
use crate::fragments::{expect_ref, FragmentError};
use crate::identity::Guid;
use crate::reference::{AssetRef, RefKind};

/// Features granted (or removed) at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelEntry {
    pub level: u32,
    pub features: Vec<AssetRef>,
}

/// Level entries in the order their levels were first introduced.
///
/// Holds at most one entry per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelTable {
    entries: Vec<LevelEntry>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `feature` to the entry for `level`, creating that entry at the
    /// end of the table when the level is new.
    pub fn add_to_level_entry(&mut self, level: u32, feature: AssetRef) {
        match self.entries.iter_mut().find(|entry| entry.level == level) {
            Some(entry) => entry.features.push(feature),
            None => self.entries.push(LevelEntry {
                level,
                features: vec![feature],
            }),
        }
    }

    pub fn entry(&self, level: u32) -> Option<&LevelEntry> {
        self.entries.iter().find(|entry| entry.level == level)
    }

    pub fn entries(&self) -> &[LevelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("asset '{name}' ({guid}) is a {kind:?}, not an archetype")]
    NotAnArchetype {
        name: String,
        guid: Guid,
        kind: AssetKind,
    },
    #[error(transparent)]
    Fragment(#[from] FragmentError),
}

#[derive(Debug, Clone, Copy)]
enum TableSide {
    Add,
    Remove,
}

/// Grants `feature` at `level` through the archetype's add table.
pub fn add_feature(
    archetype: &mut Asset,
    level: u32,
    feature: AssetRef,
) -> Result<(), ProgressionError> {
    edit_archetype_table(archetype, TableSide::Add, level, feature)
}

/// Strips `feature` at `level` through the archetype's remove table.
pub fn remove_feature(
    archetype: &mut Asset,
    level: u32,
    feature: AssetRef,
) -> Result<(), ProgressionError> {
    edit_archetype_table(archetype, TableSide::Remove, level, feature)
}

fn edit_archetype_table(
    archetype: &mut Asset,
    side: TableSide,
    level: u32,
    feature: AssetRef,
) -> Result<(), ProgressionError> {
    let feature = expect_ref(feature, RefKind::FeatureBase, "feature")?;
    let (name, guid, kind) = (
        archetype.name().to_string(),
        archetype.guid(),
        archetype.kind(),
    );
    let data = archetype
        .archetype_mut()
        .ok_or(ProgressionError::NotAnArchetype { name, guid, kind })?;
    let table = match side {
        TableSide::Add => &mut data.add_features,
        TableSide::Remove => &mut data.remove_features,
    };
    table.add_to_level_entry(level, feature);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(n: u128) -> AssetRef {
        AssetRef::FeatureBase(Guid::from_u128(n))
    }

    #[test]
    fn existing_level_gains_one_feature_and_no_entry() {
        let mut table = LevelTable::new();
        table.add_to_level_entry(3, feature(1));
        table.add_to_level_entry(5, feature(2));

        table.add_to_level_entry(3, feature(3));

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.entry(3).expect("level 3").features,
            vec![feature(1), feature(3)]
        );
    }

    #[test]
    fn new_level_is_appended_after_previous_levels() {
        let mut table = LevelTable::new();
        table.add_to_level_entry(5, feature(1));
        table.add_to_level_entry(1, feature(2));
        table.add_to_level_entry(3, feature(3));

        let levels = table
            .entries()
            .iter()
            .map(|entry| entry.level)
            .collect::<Vec<_>>();
        assert_eq!(levels, vec![5, 1, 3]);
    }
}
