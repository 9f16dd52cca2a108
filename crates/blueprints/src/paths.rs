//! Where a mod's files live on disk.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::CONFIG_FILE_NAME;

pub const ROOT_ENV_VAR: &str = "CODEX_ROOT";
pub const ICONS_DIR_NAME: &str = "Icons";

#[derive(Debug, Error)]
pub enum ModRootError {
    #[error("failed to locate the running executable: {0}")]
    CurrentExe(#[source] io::Error),
    #[error("CODEX_ROOT={} is not a mod directory (no codex.json, Icons/ or crates/codex)", .path.display())]
    InvalidOverride { path: PathBuf },
    #[error("no mod directory above {}; set CODEX_ROOT to the mod directory", .start.display())]
    NotFound { start: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPaths {
    pub root: PathBuf,
    pub icons_dir: PathBuf,
    pub config_path: PathBuf,
}

impl ModPaths {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            icons_dir: root.join(ICONS_DIR_NAME),
            config_path: root.join(CONFIG_FILE_NAME),
            root,
        }
    }

    /// `CODEX_ROOT` when set, otherwise the nearest mod directory above the
    /// running executable.
    pub fn locate() -> Result<Self, ModRootError> {
        let exe = env::current_exe().map_err(ModRootError::CurrentExe)?;
        Self::locate_from(env::var_os(ROOT_ENV_VAR), &exe)
    }

    pub fn locate_from(override_root: Option<OsString>, start: &Path) -> Result<Self, ModRootError> {
        if let Some(root) = override_root {
            let path = PathBuf::from(root);
            return match path.canonicalize() {
                Ok(root) if is_mod_dir(&root) => Ok(Self::at(root)),
                _ => Err(ModRootError::InvalidOverride { path }),
            };
        }

        let root = start
            .ancestors()
            .find(|dir| is_mod_dir(dir))
            .ok_or_else(|| ModRootError::NotFound {
                start: start.to_path_buf(),
            })?;
        debug!(start = %start.display(), root = %root.display(), "mod_root_found");
        Ok(Self::at(root))
    }
}

/// A mod directory carries its own config or icons, or is the authoring
/// workspace itself.
fn is_mod_dir(dir: &Path) -> bool {
    dir.join(CONFIG_FILE_NAME).is_file()
        || dir.join(ICONS_DIR_NAME).is_dir()
        || dir.join("crates").join("codex").join("Cargo.toml").is_file()
}
