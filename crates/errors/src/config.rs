//! Configuration and scenario error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("scenario file not found: {path}")]
    ScenarioNotFound { path: String },

    #[error("parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("cannot read {path}: {message}")]
    ReadFailed { path: String, message: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Pass --config with an existing file or remove the flag."),
            Self::ScenarioNotFound { .. } => {
                Some("Pass --scenario with an existing TOML file, or omit it to use the built-in example.")
            }
            Self::ParseError { .. } => Some("Fix the TOML syntax and retry the command."),
            Self::InvalidValue { .. } => Some("Fix the configuration value and retry the command."),
            Self::ReadFailed { .. } => Some("Check the path is a readable file."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NotFound { .. } => "config.not_found",
            Self::ScenarioNotFound { .. } => "config.scenario_not_found",
            Self::ParseError { .. } => "config.parse_error",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::ReadFailed { .. } => "config.read_failed",
        })
    }
}

impl ConfigError {
    /// Classify a failed read of `path`; a missing file keeps its own variant
    #[must_use]
    pub fn from_io(path: &std::path::Path, err: &std::io::Error, scenario: bool) -> Self {
        let path = path.display().to_string();
        match (err.kind(), scenario) {
            (std::io::ErrorKind::NotFound, false) => Self::NotFound { path },
            (std::io::ErrorKind::NotFound, true) => Self::ScenarioNotFound { path },
            _ => Self::ReadFailed {
                path,
                message: err.to_string(),
            },
        }
    }
}
