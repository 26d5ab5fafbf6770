//! Integrity checks on merged tables.
//!
//! The mergers guarantee every name and type resolved; these checks catch
//! sources that resolve cleanly but still disagree with each other, such as
//! two clusters given the same ID.
//!
//! # Examples
//!
//! ```
//! use protocol_table_core::*;
//!
//! let mut tables = ZclTables::default();
//! tables.clusters.clusters.insert("genBasic", ClusterDefinition::new(0));
//! assert!(validate_zcl_tables(&tables).is_empty());
//!
//! tables.clusters.clusters.insert("genClone", ClusterDefinition::new(0));
//! let errors = validate_zcl_tables(&tables);
//! assert!(matches!(errors[0], ValidationError::DuplicateClusterId { id: 0, .. }));
//! ```

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{CommandType, SourceKind, TransportTable, ZclTables};

/// Table integrity errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two clusters resolved to the same numeric ID.
    #[error("clusters `{first}` and `{second}` share ID {id}")]
    DuplicateClusterId {
        id: u16,
        first: String,
        second: String,
    },
    /// Two foundation commands resolved to the same numeric ID.
    #[error("foundation commands `{first}` and `{second}` share ID {id}")]
    DuplicateFoundationId {
        id: u8,
        first: String,
        second: String,
    },
    /// A subsystem lists the same command name twice.
    #[error("subsystem `{subsystem}` declares command `{command}` more than once")]
    DuplicateTransportCommand { subsystem: String, command: String },
    /// Two commands of one subsystem share an ID and classifier, so a
    /// decoder could not tell their frames apart.
    #[error("`{subsystem}`: commands `{first}` and `{second}` share ID {id} as {command_type}")]
    DuplicateTransportCommandId {
        subsystem: String,
        id: u8,
        command_type: CommandType,
        first: String,
        second: String,
    },
}

impl ValidationError {
    /// The source document to fix.
    pub fn origin(&self) -> SourceKind {
        match self {
            ValidationError::DuplicateClusterId { .. }
            | ValidationError::DuplicateFoundationId { .. } => SourceKind::CommonIds,
            ValidationError::DuplicateTransportCommand { .. } => SourceKind::SubsystemCommands,
            ValidationError::DuplicateTransportCommandId { .. } => SourceKind::TransportMeta,
        }
    }
}

/// Validates the cluster and foundation tables.
///
/// Returns every problem found; an empty vector means the tables are
/// consistent.
pub fn validate_zcl_tables(tables: &ZclTables) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut cluster_ids: HashMap<u16, &str> = HashMap::new();
    for (name, cluster) in tables.clusters.clusters.iter() {
        match cluster_ids.entry(cluster.id) {
            Entry::Occupied(first) => errors.push(ValidationError::DuplicateClusterId {
                id: cluster.id,
                first: first.get().to_string(),
                second: name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(name);
            }
        }
    }

    let mut foundation_ids: HashMap<u8, &str> = HashMap::new();
    for (name, command) in tables.foundation.commands.iter() {
        match foundation_ids.entry(command.id) {
            Entry::Occupied(first) => errors.push(ValidationError::DuplicateFoundationId {
                id: command.id,
                first: first.get().to_string(),
                second: name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(name);
            }
        }
    }

    errors
}

/// Validates the transport table.
pub fn validate_transport_table(table: &TransportTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (subsystem, commands) in table.subsystems.iter() {
        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut seen_ids: HashMap<(u8, CommandType), &str> = HashMap::new();

        for command in commands {
            if !seen_names.insert(command.name.as_str()) {
                errors.push(ValidationError::DuplicateTransportCommand {
                    subsystem: subsystem.to_string(),
                    command: command.name.clone(),
                });
                continue;
            }

            let key = (command.id, command.command_type);
            if let Some(first) = seen_ids.get(&key) {
                errors.push(ValidationError::DuplicateTransportCommandId {
                    subsystem: subsystem.to_string(),
                    id: command.id,
                    command_type: command.command_type,
                    first: first.to_string(),
                    second: command.name.clone(),
                });
            } else {
                seen_ids.insert(key, command.name.as_str());
            }
        }
    }

    errors
}
