//! Allocator construction and request argument error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Rejected allocator construction. No engine exists when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConstructionError {
    #[error("{dimension} count must be positive")]
    EmptyDimension { dimension: String },

    #[error("{what} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "process {process} holds {allocated} units of resource {resource} but declares a maximum of {maximum}"
    )]
    AllocationExceedsMaximum {
        process: usize,
        resource: usize,
        allocated: u32,
        maximum: u32,
    },

    #[error("total supply of resource {resource} overflows")]
    SupplyOverflow { resource: usize },
}

impl ConstructionError {
    /// Shape error for a vector or matrix row
    pub fn shape(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

impl UserFacingError for ConstructionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyDimension { .. } => {
                Some("Declare at least one process and one resource class.")
            }
            Self::ShapeMismatch { .. } => Some(
                "Available needs one entry per resource class; Maximum and Allocation need one row per process.",
            ),
            Self::AllocationExceedsMaximum { .. } => {
                Some("Lower the initial allocation or raise the declared maximum.")
            }
            Self::SupplyOverflow { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::EmptyDimension { .. } => "construction.empty_dimension",
            Self::ShapeMismatch { .. } => "construction.shape_mismatch",
            Self::AllocationExceedsMaximum { .. } => "construction.allocation_exceeds_maximum",
            Self::SupplyOverflow { .. } => "construction.supply_overflow",
        })
    }
}

/// Malformed request arguments. The allocator state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestError {
    #[error("unknown process P{process} (valid range 0..{processes})")]
    UnknownProcess { process: usize, processes: usize },

    #[error("request has {actual} entries, expected one per resource class ({expected})")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl UserFacingError for RequestError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownProcess { .. } => Some("Pick a process id shown by `banker show`."),
            Self::DimensionMismatch { .. } => {
                Some("Pass exactly one unit count per resource class.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::UnknownProcess { .. } => "request.unknown_process",
            Self::DimensionMismatch { .. } => "request.dimension_mismatch",
        })
    }
}
