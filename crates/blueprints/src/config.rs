use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::icons::DEFAULT_ICON_SIZE_PX;
use crate::registry::DuplicatePolicy;

pub const CONFIG_FILE_NAME: &str = "codex.json";
pub const DUPLICATE_POLICY_ENV_VAR: &str = "CODEX_DUPLICATE_POLICY";
pub const DEFAULT_GUID_NAMESPACE: &str = "codex";

/// Settings for one authoring run, read from `codex.json` in the mod root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthoringConfig {
    /// Mixed into every derived guid so two mods never collide by name.
    pub guid_namespace: String,
    pub duplicate_policy: DuplicatePolicy,
    /// Asset name to fixed guid text, for names that already shipped.
    pub pinned_guids: BTreeMap<String, String>,
    pub icon_width: u32,
    pub icon_height: u32,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            guid_namespace: DEFAULT_GUID_NAMESPACE.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            pinned_guids: BTreeMap::new(),
            icon_width: DEFAULT_ICON_SIZE_PX,
            icon_height: DEFAULT_ICON_SIZE_PX,
        }
    }
}

impl AuthoringConfig {
    pub fn apply_env_overrides(&mut self) {
        let value = env::var(DUPLICATE_POLICY_ENV_VAR).ok();
        self.apply_duplicate_policy_override(value.as_deref());
    }

    /// Invalid values are logged and ignored.
    pub fn apply_duplicate_policy_override(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        match value.parse::<DuplicatePolicy>() {
            Ok(policy) => {
                info!(policy = ?policy, "duplicate_policy_overridden_by_env");
                self.duplicate_policy = policy;
            }
            Err(reason) => warn!(
                var = DUPLICATE_POLICY_ENV_VAR,
                value,
                reason = %reason,
                "duplicate_policy_override_ignored"
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AuthoringConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "authoring_config_missing_using_defaults");
            return Ok(AuthoringConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_config(&raw, path)
}

pub fn parse_config(raw: &str, path: &Path) -> Result<AuthoringConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, AuthoringConfig>(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            json_path,
            source: error.into_inner(),
        }
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().expect("temp");
        let config = load_config(&temp.path().join(CONFIG_FILE_NAME)).expect("config");
        assert_eq!(config, AuthoringConfig::default());
        assert_eq!(config.icon_width, 64);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{
                "guid_namespace": "kineticist",
                "duplicate_policy": "reject",
                "pinned_guids": { "Toughness": "d09b20029e9abfe4480b356c92095623" }
            }"#,
        )
        .expect("write");

        let config = load_config(&path).expect("config");
        assert_eq!(config.guid_namespace, "kineticist");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.pinned_guids.len(), 1);
        assert_eq!(config.icon_height, DEFAULT_ICON_SIZE_PX);
    }

    #[test]
    fn parse_error_names_the_json_path() {
        let error = parse_config(
            r#"{ "duplicate_policy": "sometimes" }"#,
            Path::new("codex.json"),
        )
        .expect_err("invalid policy");
        match error {
            ConfigError::Parse { json_path, .. } => assert_eq!(json_path, "duplicate_policy"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_config(r#"{ "icon_size": 32 }"#, Path::new("codex.json")).is_err());
    }

    #[test]
    fn policy_override_accepts_valid_and_ignores_invalid() {
        let mut config = AuthoringConfig::default();
        config.apply_duplicate_policy_override(Some("nonsense"));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Overwrite);

        config.apply_duplicate_policy_override(Some("reject"));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);

        config.apply_duplicate_policy_override(None);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    }
}
