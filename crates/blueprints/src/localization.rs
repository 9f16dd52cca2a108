use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Opaque handle to a localized string: only its key is stored on assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText {
    key: String,
}

impl LocalizedText {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// String table of the host game's current locale.
pub trait LocalizationBackend {
    /// Stores `value` under `key`, replacing any previous text.
    fn store(&mut self, key: &str, value: &str);

    fn lookup(&self, key: &str) -> Option<&str>;
}

/// Stores `value` and returns its handle.
///
/// Without an explicit key a fresh random one is generated, so unrelated
/// strings never share an entry. Reusing a key overwrites its text.
pub fn create_string(
    backend: &mut dyn LocalizationBackend,
    value: &str,
    key: Option<&str>,
) -> LocalizedText {
    let key = match key {
        Some(key) => key.to_string(),
        None => Uuid::new_v4().simple().to_string(),
    };
    backend.store(&key, value);
    LocalizedText { key }
}

#[derive(Debug, Clone, Default)]
pub struct LocalizationPack {
    strings: HashMap<String, String>,
}

impl LocalizationPack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, handle: &LocalizedText) -> Option<&str> {
        self.lookup(handle.key())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl LocalizationBackend for LocalizationPack {
    fn store(&mut self, key: &str, value: &str) {
        if let Some(previous) = self.strings.insert(key.to_string(), value.to_string()) {
            if previous != value {
                debug!(key, "localized_string_overwritten");
            }
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_distinct() {
        let mut pack = LocalizationPack::new();
        let first = create_string(&mut pack, "Toughness", None);
        let second = create_string(&mut pack, "Toughness", None);
        assert_ne!(first.key(), second.key());
        assert_eq!(pack.len(), 2);
        assert_eq!(pack.text(&first), Some("Toughness"));
    }

    #[test]
    fn explicit_key_overwrites_previous_text() {
        let mut pack = LocalizationPack::new();
        let first = create_string(&mut pack, "Old", Some("feat.toughness"));
        let second = create_string(&mut pack, "New", Some("feat.toughness"));
        assert_eq!(first, second);
        assert_eq!(pack.len(), 1);
        assert_eq!(pack.text(&first), Some("New"));
    }
}
