//! Merge error taxonomy.
//!
//! Every variant names the entity and field that failed, and
//! [`MergeError::origin`] names the source document it came from, so the
//! message is enough to find and fix the offending JSON.

use std::fmt;

use thiserror::Error;

use crate::ValidationError;

/// Identifies one of the raw definition sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Per-cluster attribute and command maps.
    ClusterDefinitions,
    /// Numeric IDs for clusters and foundation commands.
    CommonIds,
    /// Ordered parameter lists for cluster and foundation commands.
    CommandMeta,
    /// Which transport commands exist, per subsystem.
    SubsystemCommands,
    /// IDs, classifiers and parameter lists for transport commands.
    TransportMeta,
}

impl SourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            SourceKind::ClusterDefinitions => "cluster definitions",
            SourceKind::CommonIds => "common identifiers",
            SourceKind::CommandMeta => "command metadata",
            SourceKind::SubsystemCommands => "subsystem commands",
            SourceKind::TransportMeta => "transport metadata",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A semantic disagreement between the definition sources.
///
/// Merging stops at the first one; no partial table is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// A declared cluster has no entry in the common identifiers.
    #[error("cluster `{0}` has no entry in clusterId")]
    UnknownClusterId(String),

    /// A type name that is not a [`DataType`](crate::DataType) member.
    /// `scope` is the cluster (for attributes) or `cluster.command` (for
    /// parameters); `name` is the attribute or parameter.
    #[error("`{scope}`: `{name}` has unknown data type `{type_name}`")]
    UnknownDataType {
        scope: String,
        name: String,
        type_name: String,
        origin: SourceKind,
    },

    /// A documented cluster lacks metadata for one of its declared commands.
    #[error("cluster `{cluster}` declares command `{command}` but its metadata has no entry for it")]
    UndocumentedCommand { cluster: String, command: String },

    /// A foundation command has an ID but no metadata.
    #[error("foundation command `{0}` has no metadata")]
    MissingFoundationMeta(String),

    /// A subsystem name outside the fixed subsystem enumeration.
    #[error("unknown subsystem `{0}`")]
    UnknownSubsystem(String),

    /// A declared transport command has no metadata.
    #[error("`{subsystem}.{command}` has no metadata")]
    MissingCommandMeta { subsystem: String, command: String },

    /// The classifier index is outside `POLL..=SRSP`.
    #[error("`{subsystem}.{command}`: type index {index} is out of range")]
    InvalidTypeIndex {
        subsystem: String,
        command: String,
        index: i64,
    },

    /// The classifier tag is not one of `POLL`, `SREQ`, `AREQ`, `SRSP`.
    #[error("`{subsystem}.{command}`: unknown command type `{tag}`")]
    UnknownCommandType {
        subsystem: String,
        command: String,
        tag: String,
    },

    /// A parameter type index outside the parameter type list.
    #[error("`{subsystem}.{command}`: parameter `{parameter}` has out-of-range type index {index}")]
    InvalidParameterTypeIndex {
        subsystem: String,
        command: String,
        parameter: String,
        index: i64,
    },

    /// A parameter type tag that is not a parameter type member.
    #[error("`{subsystem}.{command}`: parameter `{parameter}` has unknown type `{tag}`")]
    UnknownParameterType {
        subsystem: String,
        command: String,
        parameter: String,
        tag: String,
    },

    /// The merged table failed an integrity check.
    #[error(transparent)]
    Inconsistent(#[from] ValidationError),
}

impl MergeError {
    /// The source document the offending data was read from.
    pub fn origin(&self) -> SourceKind {
        match self {
            MergeError::UnknownClusterId(_) => SourceKind::CommonIds,
            MergeError::UnknownDataType { origin, .. } => *origin,
            MergeError::UndocumentedCommand { .. } | MergeError::MissingFoundationMeta(_) => {
                SourceKind::CommandMeta
            }
            MergeError::UnknownSubsystem(_) => SourceKind::SubsystemCommands,
            MergeError::MissingCommandMeta { .. }
            | MergeError::InvalidTypeIndex { .. }
            | MergeError::UnknownCommandType { .. }
            | MergeError::InvalidParameterTypeIndex { .. }
            | MergeError::UnknownParameterType { .. } => SourceKind::TransportMeta,
            MergeError::Inconsistent(err) => err.origin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_entity_and_field() {
        let err = MergeError::UnknownDataType {
            scope: "fooCluster".into(),
            name: "someAttr".into(),
            type_name: "notARealType".into(),
            origin: SourceKind::ClusterDefinitions,
        };
        assert_eq!(
            err.to_string(),
            "`fooCluster`: `someAttr` has unknown data type `notARealType`"
        );
        assert_eq!(err.origin(), SourceKind::ClusterDefinitions);
    }

    #[test]
    fn test_origin_of_transport_errors() {
        let err = MergeError::InvalidTypeIndex {
            subsystem: "SYS".into(),
            command: "ping".into(),
            index: 4,
        };
        assert_eq!(err.origin(), SourceKind::TransportMeta);
        assert_eq!(
            MergeError::UnknownSubsystem("WIFI".into()).origin(),
            SourceKind::SubsystemCommands
        );
    }
}
