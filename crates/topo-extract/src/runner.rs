//! Running the external graph extractor.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use topo_config::ExtractorConfig;

use crate::error::ExtractError;

/// Runs the configured extractor command against a definition file.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    #[must_use]
    pub const fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Human-readable command line for messages.
    #[must_use]
    pub fn command_line(&self, definition: &Path) -> String {
        let mut parts = vec![self.config.program.clone()];
        parts.extend(self.config.expand_args(&definition.to_string_lossy()));
        parts.join(" ")
    }

    /// Run the extractor and return its stdout.
    ///
    /// The child is killed when the timeout elapses.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::RelativeDefinitionPath`] if `definition` is relative.
    /// - [`ExtractError::ExtractionTimedOut`] if the run exceeds the timeout.
    /// - [`ExtractError::ExtractionFailed`] on a non-zero exit.
    /// - [`ExtractError::Io`] if the program cannot be started.
    pub async fn run(&self, definition: &Path) -> Result<String, ExtractError> {
        if !definition.is_absolute() {
            return Err(ExtractError::RelativeDefinitionPath(definition.to_path_buf()));
        }
        let command = self.command_line(definition);
        let args = self.config.expand_args(&definition.to_string_lossy());
        tracing::debug!(%command, timeout_secs = self.config.timeout_secs, "running extractor");

        let child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = timeout(Duration::from_secs(self.config.timeout_secs), child)
            .await
            .map_err(|_| ExtractError::ExtractionTimedOut {
                command: command.clone(),
                timeout_secs: self.config.timeout_secs,
            })??;

        if !output.status.success() {
            return Err(ExtractError::ExtractionFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(bytes = stdout.len(), "extractor finished");
        Ok(stdout)
    }
}
