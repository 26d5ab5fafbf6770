//! Merged, validated definition tables.
//!
//! These are the values the emitters serialize. Field names in the serde
//! representation match the names protocol consumers already read (`ID`,
//! `commandsResponse`, `knownBufLen`), so the JSON target and the TypeScript
//! target describe the same shape.

use serde::Serialize;

use crate::{CommandType, DataType, OrderedMap, ParameterType};

/// A named, typed command parameter. Position in its list is wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl Parameter {
    /// Creates a parameter.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeDefinition {
    #[serde(rename = "ID")]
    pub id: u16,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDefinition {
    #[serde(rename = "ID")]
    pub id: u8,
    pub parameters: Vec<Parameter>,
}

/// One cluster of the application-layer table.
///
/// # Examples
///
/// ```
/// use protocol_table_core::{AttributeDefinition, ClusterDefinition, DataType};
///
/// let mut cluster = ClusterDefinition::new(0);
/// cluster.attributes.insert(
///     "zclVersion",
///     AttributeDefinition { id: 0, data_type: DataType::Uint8 },
/// );
///
/// assert_eq!(
///     serde_json::to_string(&cluster).unwrap(),
///     r#"{"ID":0,"attributes":{"zclVersion":{"ID":0,"type":"UINT8"}},"commands":{},"commandsResponse":{}}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterDefinition {
    #[serde(rename = "ID")]
    pub id: u16,
    pub attributes: OrderedMap<AttributeDefinition>,
    pub commands: OrderedMap<CommandDefinition>,
    #[serde(rename = "commandsResponse")]
    pub commands_response: OrderedMap<CommandDefinition>,
}

impl ClusterDefinition {
    /// Creates a cluster with no attributes or commands.
    pub fn new(id: u16) -> Self {
        Self {
            id,
            attributes: OrderedMap::new(),
            commands: OrderedMap::new(),
            commands_response: OrderedMap::new(),
        }
    }
}

/// A command shared by every cluster (read/write attribute and friends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundationCommand {
    #[serde(rename = "ID")]
    pub id: u8,
    /// Buffer length hint consumers use to preallocate.
    #[serde(rename = "knownBufLen")]
    pub known_buf_len: u32,
    pub parameters: Vec<Parameter>,
}

/// Cluster name to cluster definition, in source declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterTable {
    pub clusters: OrderedMap<ClusterDefinition>,
}

/// Foundation command name to definition, in source declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FoundationTable {
    pub commands: OrderedMap<FoundationCommand>,
}

/// Output of the cluster pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZclTables {
    pub clusters: ClusterTable,
    pub foundation: FoundationTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportParameter {
    pub name: String,
    #[serde(rename = "parameterType")]
    pub parameter_type: ParameterType,
}

/// One command of the co-processor serial interface.
///
/// `request` and `response` are `None` when the source declares no list for
/// that direction, which is distinct from an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportCommand {
    pub name: String,
    #[serde(rename = "ID")]
    pub id: u8,
    #[serde(rename = "type")]
    pub command_type: CommandType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Vec<TransportParameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Vec<TransportParameter>>,
}

/// Subsystem name to its commands, in source declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransportTable {
    pub subsystems: OrderedMap<Vec<TransportCommand>>,
}

impl TransportTable {
    /// Total number of commands across all subsystems.
    pub fn command_count(&self) -> usize {
        self.subsystems.values().map(Vec::len).sum()
    }
}
