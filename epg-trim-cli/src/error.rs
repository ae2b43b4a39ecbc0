use thiserror::Error;

use epg_trim_lib::{FetchError, PipelineError, SettingsError};

/// Errors that end the CLI with a non-zero exit code.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Config file or command-line value rejected
    #[error("Config error: {0}")]
    Config(String),

    /// Playlist or guide could not be retrieved
    #[error("Download failed: {0}")]
    Fetch(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        Self::config(e.to_string())
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        Self::fetch(e.to_string())
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Fetch(e) => e.into(),
            PipelineError::Settings(e) => e.into(),
            other => Self::other(other.to_string()),
        }
    }
}
