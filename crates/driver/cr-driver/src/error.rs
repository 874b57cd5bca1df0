//! Driver errors.

use cr_cfg::CfgError;
use cr_regionck::{ConfigError, RegionckError};
use cr_span::FileSpan;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Anything that stops a fixture from being checked.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The fixture file could not be read
    #[error("failed to read {}", path.display())]
    Io {
        /// Fixture path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The fixture is not valid JSON for the fixture schema
    #[error("invalid fixture: {0}")]
    Json(#[from] serde_json::Error),

    /// A variable was used before any declaration of it
    #[error("node {node}: `{name}` is not declared")]
    UnresolvedName {
        /// Variable name
        name: String,
        /// Node containing the use
        node: u32,
    },

    /// Node ids are not `0..count`
    #[error("node ids must be 0..{count} without gaps, found {found}")]
    NodeIds {
        /// Number of nodes
        count: usize,
        /// First offending id
        found: u32,
    },

    /// The graph is malformed
    #[error(transparent)]
    Cfg(#[from] CfgError),

    /// Region checking failed
    #[error(transparent)]
    Regionck(#[from] RegionckError),

    /// The configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DriverError {
    /// Location in the checked function, for region checking errors.
    #[must_use]
    pub fn span(&self) -> Option<FileSpan> {
        match self {
            Self::Regionck(err) => Some(err.span()),
            _ => None,
        }
    }
}
