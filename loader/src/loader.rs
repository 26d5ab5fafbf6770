//! Definition source loading.
//!
//! Each source file is read exactly once. Its bytes are fed to a running
//! SHA-256 digest and then deserialized into the typed raw-source schema
//! from `protocol-table-core`, so shape errors (a parameter entry with two
//! keys, a duplicated name, a string where an ID belongs) surface here with
//! the file path attached, before any merging.
//!
//! # Loading pattern
//!
//! ```no_run
//! use protocol_table_loader::{ZclSourcePaths, load_zcl_sources};
//!
//! let paths = ZclSourcePaths {
//!     cluster_defs: "defs/cluster_defs.json".into(),
//!     common: "defs/common.json".into(),
//!     command_meta: "defs/zcl_meta.json".into(),
//! };
//! let loaded = load_zcl_sources(&paths).unwrap();
//! println!("inputs fingerprint {}", loaded.fingerprint);
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use protocol_table_core::{SourceKind, TransportSources, ZclSources};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{LoadError, Result};

/// SHA-256 hex digest over the contents of every input of one pipeline, in
/// load order.
///
/// Only file contents contribute; moving an input does not change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deserialized sources together with the fingerprint of the bytes they were
/// read from.
#[derive(Debug, Clone)]
pub struct Loaded<S> {
    pub sources: S,
    pub fingerprint: Fingerprint,
}

/// Locations of the three cluster pipeline inputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZclSourcePaths {
    /// Per-cluster attribute and command maps.
    pub cluster_defs: PathBuf,
    /// Numeric IDs for clusters and foundation commands.
    pub common: PathBuf,
    /// Parameter lists for cluster and foundation commands.
    pub command_meta: PathBuf,
}

impl ZclSourcePaths {
    /// The file a source kind was read from, if it belongs to this pipeline.
    pub fn path_of(&self, kind: SourceKind) -> Option<&Path> {
        match kind {
            SourceKind::ClusterDefinitions => Some(&self.cluster_defs),
            SourceKind::CommonIds => Some(&self.common),
            SourceKind::CommandMeta => Some(&self.command_meta),
            SourceKind::SubsystemCommands | SourceKind::TransportMeta => None,
        }
    }

    pub(crate) fn resolve_against(&mut self, base: &Path) {
        resolve(&mut self.cluster_defs, base);
        resolve(&mut self.common, base);
        resolve(&mut self.command_meta, base);
    }
}

/// Locations of the two transport pipeline inputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportSourcePaths {
    /// Command names per subsystem.
    pub subsystems: PathBuf,
    /// IDs, classifiers and parameter lists per subsystem command.
    pub command_meta: PathBuf,
}

impl TransportSourcePaths {
    /// The file a source kind was read from, if it belongs to this pipeline.
    pub fn path_of(&self, kind: SourceKind) -> Option<&Path> {
        match kind {
            SourceKind::SubsystemCommands => Some(&self.subsystems),
            SourceKind::TransportMeta => Some(&self.command_meta),
            SourceKind::ClusterDefinitions | SourceKind::CommonIds | SourceKind::CommandMeta => {
                None
            }
        }
    }

    pub(crate) fn resolve_against(&mut self, base: &Path) {
        resolve(&mut self.subsystems, base);
        resolve(&mut self.command_meta, base);
    }
}

pub(crate) fn resolve(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

/// Reads JSON sources one at a time while accumulating their fingerprint.
///
/// # Examples
///
/// ```
/// use protocol_table_core::CommonIds;
/// use protocol_table_loader::SourceReader;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("common.json");
/// std::fs::write(&path, r#"{"clusterId": {"genBasic": 0}}"#).unwrap();
///
/// let mut reader = SourceReader::new();
/// let ids: CommonIds = reader.read(&path).unwrap();
/// assert_eq!(ids.cluster_ids.get("genBasic"), Some(&0));
/// assert_eq!(reader.finish().as_str().len(), 64);
/// ```
#[derive(Default)]
pub struct SourceReader {
    hasher: Sha256,
}

impl SourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and deserializes one source file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::Json`] if it does not deserialize into `T`.
    pub fn read<T: DeserializeOwned>(&mut self, path: &Path) -> Result<T> {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Length prefix keeps `ab` + `c` distinct from `a` + `bc`.
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(&bytes);

        let value = serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "loaded source");
        Ok(value)
    }

    /// Returns the fingerprint of everything read so far.
    pub fn finish(self) -> Fingerprint {
        Fingerprint(format!("{:x}", self.hasher.finalize()))
    }
}

/// Loads the cluster definitions, common identifiers and command metadata.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered, naming the failing file.
pub fn load_zcl_sources(paths: &ZclSourcePaths) -> Result<Loaded<ZclSources>> {
    let mut reader = SourceReader::new();
    let sources = ZclSources {
        cluster_defs: reader.read(&paths.cluster_defs)?,
        common_ids: reader.read(&paths.common)?,
        command_meta: reader.read(&paths.command_meta)?,
    };
    Ok(Loaded {
        sources,
        fingerprint: reader.finish(),
    })
}

/// Loads the subsystem command lists and the transport command metadata.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered, naming the failing file.
pub fn load_transport_sources(paths: &TransportSourcePaths) -> Result<Loaded<TransportSources>> {
    let mut reader = SourceReader::new();
    let sources = TransportSources {
        subsystems: reader.read(&paths.subsystems)?,
        command_meta: reader.read(&paths.command_meta)?,
    };
    Ok(Loaded {
        sources,
        fingerprint: reader.finish(),
    })
}
