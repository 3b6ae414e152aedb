#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the banker allocator
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone so they can travel through event channels.

use std::borrow::Cow;

use thiserror::Error;

pub mod allocator;
pub mod config;
pub mod service;

pub use allocator::{ConstructionError, RequestError};
pub use config::ConfigError;
pub use service::ServiceError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),

    #[error("request error: {0}")]
    Request(#[from] RequestError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for banker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Construction(err) => err.user_message(),
            Error::Request(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Service(err) => err.user_message(),
            Error::Internal(_) => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Construction(err) => err.user_hint(),
            Error::Request(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Service(err) => err.user_hint(),
            Error::Internal(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Service(err) => err.is_retryable(),
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Construction(err) => err.user_code(),
            Error::Request(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Service(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
        }
    }
}
