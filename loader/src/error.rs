//! Error types for loading definition sources and generator configuration.
//!
//! Every variant carries the path of the file involved, so a message on its
//! own is enough to find the offending input.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading sources or configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid JSON, or does not match the expected source
    /// shape.
    #[error("{}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The configuration file is not valid YAML, or does not match the
    /// configuration shape.
    #[error("{}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The configuration parsed but cannot be used.
    #[error("{}: invalid configuration: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },
}

impl LoadError {
    /// The file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Json { path, .. }
            | LoadError::Yaml { path, .. }
            | LoadError::InvalidConfig { path, .. } => path,
        }
    }
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
