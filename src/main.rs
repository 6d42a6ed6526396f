//! Main entry point for the `probe` CLI.

use host_probe::cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_fatal() {
                tracing::error!(error = %e, "Could not acquire host state");
            }
            eprintln!("Error: {e}");
            u8::try_from(e.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
        },
    }
}
