use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Stable 128-bit asset identifier.
///
/// Displays as 32 lowercase hex digits without separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(Uuid);

impl Guid {
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Accepts 32 bare hex digits or the 8-4-4-4-12 hyphenated form.
    pub fn parse(text: &str) -> Result<Self, GuidError> {
        let malformed = || GuidError::Malformed {
            text: text.to_string(),
        };
        let trimmed = text.trim();
        let well_formed = match trimmed.len() {
            32 => trimmed.bytes().all(|byte| byte.is_ascii_hexdigit()),
            36 => trimmed.bytes().enumerate().all(|(index, byte)| match index {
                8 | 13 | 18 | 23 => byte == b'-',
                _ => byte.is_ascii_hexdigit(),
            }),
            _ => false,
        };
        if !well_formed {
            return Err(malformed());
        }
        Uuid::parse_str(trimmed).map(Self).map_err(|_| malformed())
    }

    /// Derives the identifier for `name` inside `namespace`.
    ///
    /// SHA-256 over `namespace || 0x00 || name`, truncated to the first 16 bytes.
    pub fn derive(namespace: &str, name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(namespace.as_bytes());
        hasher.update([0u8]);
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(Uuid::from_bytes(bytes))
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for Guid {
    type Err = GuidError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuidError {
    #[error("'{text}' is not a valid guid")]
    Malformed { text: String },
    #[error("asset name must not be empty")]
    EmptyName,
    #[error("guid {guid} for '{name}' is already bound to '{existing}'")]
    Collision {
        name: String,
        existing: String,
        guid: Guid,
    },
}

/// Name-keyed guid allocation for one authoring run.
///
/// Every name maps to exactly one guid and every guid to exactly one name.
#[derive(Debug, Clone)]
pub struct GuidAllocator {
    namespace: String,
    guids_by_name: HashMap<String, Guid>,
    names_by_guid: HashMap<Guid, String>,
}

impl GuidAllocator {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            guids_by_name: HashMap::new(),
            names_by_guid: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Binds `name` to a fixed guid instead of a derived one.
    ///
    /// Refuses a guid that already belongs to another name.
    pub fn pin(&mut self, name: &str, guid: Guid) -> Result<(), GuidError> {
        if name.is_empty() {
            return Err(GuidError::EmptyName);
        }
        if let Some(existing) = self.names_by_guid.get(&guid) {
            if existing != name {
                return Err(GuidError::Collision {
                    name: name.to_string(),
                    existing: existing.clone(),
                    guid,
                });
            }
        }
        self.bind(name, guid);
        Ok(())
    }

    /// The guid `get` would hand out for `name`, without recording it.
    pub fn peek(&self, name: &str) -> Result<Guid, GuidError> {
        if name.is_empty() {
            return Err(GuidError::EmptyName);
        }
        if let Some(guid) = self.guids_by_name.get(name) {
            return Ok(*guid);
        }

        let guid = Guid::derive(&self.namespace, name);
        match self.names_by_guid.get(&guid) {
            Some(existing) => Err(GuidError::Collision {
                name: name.to_string(),
                existing: existing.clone(),
                guid,
            }),
            None => Ok(guid),
        }
    }

    /// Returns the guid for `name`, deriving and remembering it on first use.
    pub fn get(&mut self, name: &str) -> Result<Guid, GuidError> {
        let guid = self.peek(name)?;
        if !self.guids_by_name.contains_key(name) {
            self.bind(name, guid);
            debug!(name, guid = %guid, "guid_derived");
        }
        Ok(guid)
    }

    /// Makes `name` the owner of `guid`, unbinding whatever either side held.
    pub fn bind(&mut self, name: &str, guid: Guid) {
        if let Some(previous) = self.guids_by_name.insert(name.to_string(), guid) {
            if previous != guid {
                self.names_by_guid.remove(&previous);
            }
        }
        if let Some(displaced) = self.names_by_guid.insert(guid, name.to_string()) {
            if displaced != name {
                self.guids_by_name.remove(&displaced);
                debug!(name, displaced = %displaced, guid = %guid, "guid_rebound");
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Guid> {
        self.guids_by_name.get(name).copied()
    }

    pub fn name_of(&self, guid: Guid) -> Option<&str> {
        self.names_by_guid.get(&guid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.guids_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guids_by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_and_hyphenated_forms() {
        let simple = Guid::parse("247a4068296e8be42890143f451b4b45").expect("simple");
        let hyphenated = Guid::parse("247a4068-296e-8be4-2890-143f451b4b45").expect("hyphenated");
        assert_eq!(simple, hyphenated);
        assert_eq!(simple.to_string(), "247a4068296e8be42890143f451b4b45");
        assert_eq!(simple.as_u128(), 0x247a4068296e8be42890143f451b4b45);
    }

    #[test]
    fn rejects_malformed_text() {
        for text in [
            "",
            "not-a-guid",
            "247a4068296e8be42890143f451b4b4",
            "{247a4068-296e-8be4-2890-143f451b4b45}",
            "urn:uuid:247a4068-296e-8be4-2890-143f451b4b45",
            "247a4068-296e8be4-2890-143f451b4b45a",
        ] {
            assert!(
                matches!(Guid::parse(text), Err(GuidError::Malformed { .. })),
                "text={text}"
            );
        }
    }

    #[test]
    fn derivation_is_stable_and_namespaced() {
        assert_eq!(
            Guid::derive("codex", "Toughness"),
            Guid::derive("codex", "Toughness")
        );
        assert_ne!(
            Guid::derive("codex", "Toughness"),
            Guid::derive("other", "Toughness")
        );
        assert_ne!(
            Guid::derive("codex", "Toughness"),
            Guid::derive("codex", "Toughness2")
        );
    }

    #[test]
    fn same_name_yields_same_guid() {
        let mut allocator = GuidAllocator::new("codex");
        let first = allocator.get("Toughness").expect("first");
        let second = allocator.get("Toughness").expect("second");
        assert_eq!(first, second);
        assert_eq!(allocator.len(), 1);
        assert_eq!(allocator.name_of(first), Some("Toughness"));
    }

    #[test]
    fn pinned_guid_wins_over_derivation() {
        let mut allocator = GuidAllocator::new("codex");
        let pinned = Guid::from_u128(42);
        allocator.pin("Toughness", pinned).expect("pin");
        assert_eq!(allocator.get("Toughness").expect("get"), pinned);
        assert_eq!(allocator.lookup("Toughness"), Some(pinned));
    }

    #[test]
    fn derived_guid_bound_to_other_name_is_collision() {
        let mut allocator = GuidAllocator::new("codex");
        let stolen = Guid::derive("codex", "Toughness");
        allocator.pin("Endurance", stolen).expect("pin");

        let error = allocator.get("Toughness").expect_err("collision");
        assert_eq!(
            error,
            GuidError::Collision {
                name: "Toughness".to_string(),
                existing: "Endurance".to_string(),
                guid: stolen,
            }
        );
        assert_eq!(allocator.lookup("Toughness"), None);
    }

    #[test]
    fn peek_does_not_record_the_name() {
        let mut allocator = GuidAllocator::new("codex");
        let peeked = allocator.peek("Toughness").expect("peek");
        assert_eq!(allocator.lookup("Toughness"), None);
        assert!(allocator.is_empty());
        assert_eq!(allocator.get("Toughness").expect("get"), peeked);
    }

    #[test]
    fn bind_moves_guid_to_new_owner() {
        let mut allocator = GuidAllocator::new("codex");
        let shared = Guid::from_u128(7);
        allocator.pin("Toughness", shared).expect("pin");
        allocator.bind("ImprovedToughness", shared);

        assert_eq!(allocator.lookup("Toughness"), None);
        assert_eq!(allocator.lookup("ImprovedToughness"), Some(shared));
        assert_eq!(allocator.name_of(shared), Some("ImprovedToughness"));
        assert_eq!(allocator.len(), 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut allocator = GuidAllocator::new("codex");
        assert_eq!(allocator.get(""), Err(GuidError::EmptyName));
    }
}
