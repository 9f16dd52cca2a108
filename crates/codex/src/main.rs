use std::process::ExitCode;

use tracing::error;

mod app;

fn main() -> ExitCode {
    let dump = std::env::args().skip(1).any(|arg| arg == "--dump");
    match app::run(dump) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "codex_run_failed");
            ExitCode::FAILURE
        }
    }
}
