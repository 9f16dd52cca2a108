mod bootstrap;
mod combat;
mod content;
mod summary;

use blueprints::{AuthoringError, ConfigError, ModRootError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    ModRoot(#[from] ModRootError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Authoring(#[from] AuthoringError),
    #[error("failed to serialize summary: {0}")]
    Dump(#[source] serde_json::Error),
}

/// One authoring pass: build the content, seal it, then play out a fight.
pub(crate) fn run(dump: bool) -> Result<(), AppError> {
    let mut wiring = bootstrap::build_app()?;
    let sample = content::author_sample_content(&mut wiring.session)?;
    let output = wiring.session.finish();

    let restored = combat::simulate_end_of_combat(&output.registry, &sample);
    let summary = summary::AuthoringSummary::collect(&output, &restored);
    info!(
        assets = summary.assets.len(),
        restored_items = summary.restored_items.len(),
        "authoring_pass_complete"
    );

    if dump {
        let json = serde_json::to_string_pretty(&summary).map_err(AppError::Dump)?;
        println!("{json}");
    }
    Ok(())
}
