//! Allocator service error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceError {
    #[error("allocator service has stopped")]
    Stopped,

    #[error("allocator service dropped the reply for {operation}")]
    ReplyDropped { operation: String },
}

impl UserFacingError for ServiceError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Stopped => "service.stopped",
            Self::ReplyDropped { .. } => "service.reply_dropped",
        })
    }
}
