use blueprints::{
    load_config, AuthoringSession, FileIconLoader, IconLoader, LocalizationPack, ModPaths,
    NoIcons,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::AppError;

pub(crate) struct AppWiring {
    pub(crate) session: AuthoringSession,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Codex Authoring ===");

    let paths = ModPaths::locate()?;
    info!(root = %paths.root.display(), "mod_root_resolved");

    let mut config = load_config(&paths.config_path)?;
    config.apply_env_overrides();

    let icons: Box<dyn IconLoader> = if paths.icons_dir.is_dir() {
        Box::new(FileIconLoader::new(
            &paths.icons_dir,
            config.icon_width,
            config.icon_height,
        ))
    } else {
        warn!(dir = %paths.icons_dir.display(), "icons_dir_missing_icons_disabled");
        Box::new(NoIcons)
    };

    let session = AuthoringSession::new(&config, Box::new(LocalizationPack::new()), icons)?;
    Ok(AppWiring { session })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
