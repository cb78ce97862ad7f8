//! External formatter invocation

use schemac_gen::FormatConfig;
use std::path::Path;
use std::process::Command;

/// Run the configured formatter on `path`. Failures are logged, never fatal.
pub fn run(config: &FormatConfig, path: &Path) -> bool {
    let status = Command::new(&config.command)
        .args(&config.args)
        .arg(path)
        .status();

    match status {
        Ok(status) if status.success() => {
            tracing::debug!(command = %config.command, path = %path.display(), "formatted");
            true
        }
        Ok(status) => {
            tracing::warn!(
                command = %config.command,
                path = %path.display(),
                %status,
                "formatter failed"
            );
            false
        }
        Err(e) => {
            tracing::warn!(
                command = %config.command,
                path = %path.display(),
                error = %e,
                "formatter could not be started"
            );
            false
        }
    }
}
