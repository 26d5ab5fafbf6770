//! Typed shapes of the raw definition sources.
//!
//! The definition files are hand-maintained JSON. Deserializing them into
//! these records is where structural mistakes surface: a missing `id`, a
//! parameter entry with two keys, or a duplicated name all fail while the
//! source is loaded, before any merging happens. Semantic checks (does this
//! type name exist, is this cluster known) are left to the mergers.

use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};

use crate::OrderedMap;

/// One cluster from the cluster-definition source.
///
/// `attrId`, `cmd` and `cmdRsp` may each be absent or `null`; both mean
/// "nothing declared".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawCluster {
    /// Attribute name to `{id, type}`.
    #[serde(rename = "attrId", default)]
    pub attributes: Option<OrderedMap<RawAttribute>>,
    /// Outgoing command name to command ID.
    #[serde(rename = "cmd", default)]
    pub commands: Option<OrderedMap<u8>>,
    /// Response command name to command ID.
    #[serde(rename = "cmdRsp", default)]
    pub command_responses: Option<OrderedMap<u8>>,
}

/// An attribute declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawAttribute {
    pub id: u16,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// The cluster-definition source, keyed by cluster name.
pub type ClusterDefinitions = OrderedMap<RawCluster>;

/// The common-identifiers source.
///
/// Only `clusterId` and `foundation` are read; any other tables in the file
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommonIds {
    /// Cluster name to cluster ID.
    #[serde(rename = "clusterId")]
    pub cluster_ids: OrderedMap<u16>,
    /// Foundation command name to command ID.
    #[serde(default)]
    pub foundation: OrderedMap<u8>,
}

/// The command-parameter metadata source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandMeta {
    /// Foundation command name to metadata.
    #[serde(default)]
    pub foundation: OrderedMap<RawFoundationMeta>,
    /// Cluster name to command name to metadata.
    #[serde(default)]
    pub functional: OrderedMap<OrderedMap<RawCommandMeta>>,
}

/// Metadata for a foundation command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawFoundationMeta {
    /// Buffer length hint consumers use to preallocate.
    #[serde(rename = "knownBufLen")]
    pub known_buf_len: u32,
    #[serde(default)]
    pub params: Vec<RawParameter>,
}

/// Metadata for a cluster-specific command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCommandMeta {
    /// Direction marker carried by the source (0 client-to-server, 1
    /// server-to-client). Not used by the merge.
    #[serde(default)]
    pub dir: Option<u8>,
    #[serde(default)]
    pub params: Vec<RawParameter>,
}

/// A parameter written as a single-entry object, `{"name": type}`.
///
/// `T` is the raw type reference: a type name for cluster commands, a
/// [`TypeRef`] for transport commands.
///
/// # Examples
///
/// ```
/// use protocol_table_core::RawParameter;
///
/// let params: Vec<RawParameter> =
///     serde_json::from_str(r#"[{"groupid": "uint16"}, {"groupname": "charStr"}]"#).unwrap();
/// assert_eq!(params[1].name, "groupname");
/// assert_eq!(params[1].ty, "charStr");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter<T = String> {
    pub name: String,
    pub ty: T,
}

struct RawParameterVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for RawParameterVisitor<T> {
    type Value = RawParameter<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a single-entry object mapping a parameter name to its type")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let Some((name, ty)) = access.next_entry::<String, T>()? else {
            return Err(de::Error::custom("parameter entry is empty"));
        };
        if let Some(extra) = access.next_key::<String>()? {
            return Err(de::Error::custom(format!(
                "parameter entry `{name}` has a second key `{extra}`"
            )));
        }
        Ok(RawParameter { name, ty })
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RawParameter<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawParameterVisitor(PhantomData))
    }
}

/// A reference to a member of an index-based enumeration.
///
/// Legacy transport sources use the position in a fixed list; newer sources
/// may use the symbolic tag directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Index(i64),
    Tag(String),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Index(index) => write!(f, "{index}"),
            TypeRef::Tag(tag) => f.write_str(tag),
        }
    }
}

/// The subsystem source: which commands exist, grouped by subsystem.
pub type SubsystemCommandLists = OrderedMap<Vec<String>>;

/// The transport metadata source, keyed by subsystem then command.
pub type TransportMeta = OrderedMap<OrderedMap<RawTransportCommand>>;

/// Metadata for one transport command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTransportCommand {
    #[serde(rename = "cmdId")]
    pub id: u8,
    #[serde(rename = "type")]
    pub command_type: TypeRef,
    #[serde(default)]
    pub params: RawTransportParams,
}

/// Request and response parameter lists; either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTransportParams {
    #[serde(default)]
    pub req: Option<Vec<RawParameter<TypeRef>>>,
    #[serde(default)]
    pub rsp: Option<Vec<RawParameter<TypeRef>>>,
}

/// The three inputs of the cluster pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZclSources {
    pub cluster_defs: ClusterDefinitions,
    pub common_ids: CommonIds,
    pub command_meta: CommandMeta,
}

/// The two inputs of the transport pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportSources {
    pub subsystems: SubsystemCommandLists,
    pub command_meta: TransportMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_cluster_null_and_absent_fields() {
        let defs: ClusterDefinitions = serde_json::from_str(
            r#"{
                "genBasic": {"attrId": {"zclVersion": {"id": 0, "type": "uint8"}}, "cmd": null},
                "genTime": {}
            }"#,
        )
        .unwrap();

        let basic = defs.get("genBasic").unwrap();
        assert_eq!(basic.attributes.as_ref().unwrap().len(), 1);
        assert!(basic.commands.is_none());
        assert!(basic.command_responses.is_none());
        assert_eq!(defs.get("genTime"), Some(&RawCluster::default()));
    }

    #[test]
    fn test_common_ids_ignores_other_tables() {
        let ids: CommonIds = serde_json::from_str(
            r#"{"profileId": {"HA": 260}, "clusterId": {"genBasic": 0}, "foundation": {"read": 0}}"#,
        )
        .unwrap();
        assert_eq!(ids.cluster_ids.get("genBasic"), Some(&0));
        assert_eq!(ids.foundation.get("read"), Some(&0));
    }

    #[test]
    fn test_parameter_entry_with_two_keys_is_rejected() {
        let err = serde_json::from_str::<Vec<RawParameter>>(r#"[{"a": "uint8", "b": "uint8"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("second key `b`"));
    }

    #[test]
    fn test_parameter_entry_empty_is_rejected() {
        let err = serde_json::from_str::<Vec<RawParameter>>("[{}]").unwrap_err();
        assert!(err.to_string().contains("parameter entry is empty"));
    }

    #[test]
    fn test_transport_command_accepts_index_or_tag() {
        let meta: OrderedMap<RawTransportCommand> = serde_json::from_str(
            r#"{
                "ping": {"cmdId": 1, "type": 1, "params": {"req": [], "rsp": [{"capabilities": 1}]}},
                "resetReq": {"cmdId": 0, "type": "AREQ", "params": {"req": [{"type": "UINT8"}]}}
            }"#,
        )
        .unwrap();

        let ping = meta.get("ping").unwrap();
        assert_eq!(ping.command_type, TypeRef::Index(1));
        assert_eq!(ping.params.rsp.as_ref().unwrap()[0].ty, TypeRef::Index(1));

        let reset = meta.get("resetReq").unwrap();
        assert_eq!(reset.command_type, TypeRef::Tag("AREQ".into()));
        assert!(reset.params.rsp.is_none());
    }
}
