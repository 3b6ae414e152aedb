//! Allocation scenarios: the starting state of an allocator

use banker_engine::Allocator;
use banker_errors::{ConfigError, Error};
use banker_types::{ResourceMatrix, ResourceVector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Starting state of an allocator as written in a scenario file
///
/// ```toml
/// available = [3, 3, 2]
/// maximum = [[7, 5, 3], [3, 2, 2]]
/// allocation = [[0, 1, 0], [2, 0, 0]]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Declared process count, checked against `maximum` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processes: Option<usize>,
    /// Declared resource class count, checked against `available` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<usize>,
    pub available: ResourceVector,
    pub maximum: ResourceMatrix,
    pub allocation: ResourceMatrix,
}

impl Scenario {
    /// The five-process, three-class textbook example
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            processes: Some(5),
            resources: Some(3),
            available: vec![3, 3, 2],
            maximum: vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            allocation: vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
        }
    }

    /// Parse a scenario from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid scenario document.
    pub fn from_toml(source: &str, origin: &str) -> Result<Self, Error> {
        toml::from_str(source).map_err(|e| {
            Error::from(ConfigError::ParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })
        })
    }

    /// Load a scenario file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::from_io(path, &e, true))?;
        let scenario = Self::from_toml(&contents, &path.display().to_string())?;
        debug!(
            path = %path.display(),
            processes = scenario.maximum.len(),
            resources = scenario.available.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// Build the allocator this scenario describes.
    ///
    /// Counts left out of the file are taken from the matrices.
    ///
    /// # Errors
    ///
    /// Returns a construction error when the declared counts disagree with
    /// the matrices or the allocator rejects the data.
    pub fn into_allocator(self) -> Result<Allocator, Error> {
        let processes = self.processes.unwrap_or(self.maximum.len());
        let resources = self.resources.unwrap_or(self.available.len());
        Ok(Allocator::with_dimensions(
            processes,
            resources,
            self.available,
            self.maximum,
            self.allocation,
        )?)
    }
}
