//! External graph extractor configuration.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the absolute definition-file path in `args`.
pub const FILE_PLACEHOLDER: &str = "{file}";

const fn default_timeout_secs() -> u64 {
    120
}

fn default_args() -> Vec<String> {
    vec![FILE_PLACEHOLDER.to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    /// Program to run (e.g., `rad`). Empty means the definition file is
    /// parsed directly instead.
    #[serde(default)]
    pub program: String,

    /// Arguments; every `{file}` is replaced by the definition path.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Upper bound on a single extractor run, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExtractorConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.program.trim().is_empty()
    }

    /// Arguments with the file placeholder substituted.
    #[must_use]
    pub fn expand_args(&self, file: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(FILE_PLACEHOLDER, file))
            .collect()
    }
}
