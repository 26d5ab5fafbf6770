//! Cluster table merge.
//!
//! Combines the cluster definitions (keyed by cluster name), the common
//! identifiers (numeric IDs by name) and the command metadata (parameter
//! lists by cluster then command name) into one [`ZclTables`].
//!
//! # Example
//!
//! ```
//! use protocol_table_core::*;
//!
//! let sources = ZclSources {
//!     cluster_defs: serde_json::from_str(
//!         r#"{"genBasic": {"attrId": {"zclVersion": {"id": 0, "type": "UINT8"}}}}"#,
//!     ).unwrap(),
//!     common_ids: serde_json::from_str(r#"{"clusterId": {"genBasic": 0}}"#).unwrap(),
//!     command_meta: CommandMeta::default(),
//! };
//!
//! let tables = merge_zcl_tables(&sources, &MergeOptions::default()).unwrap();
//! let basic = tables.clusters.clusters.get("genBasic").unwrap();
//! assert_eq!(basic.attributes.get("zclVersion").unwrap().data_type, DataType::Uint8);
//! assert!(basic.commands.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    AttributeDefinition, ClusterDefinition, ClusterDefinitions, ClusterTable, CommandDefinition,
    CommandMeta, CommonIds, DataType, FoundationCommand, FoundationTable, MergeError, OrderedMap,
    Parameter, RawAttribute, RawCommandMeta, RawParameter, SourceKind, ZclSources, ZclTables,
    validate_zcl_tables,
};

/// What to do when a cluster has command metadata, but not for every
/// command it declares.
///
/// A cluster with no metadata at all is always emitted without commands;
/// this policy only covers the partially documented case.
///
/// # Examples
///
/// ```
/// use protocol_table_core::UndocumentedCommandPolicy;
///
/// assert_eq!(UndocumentedCommandPolicy::default(), UndocumentedCommandPolicy::Fail);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndocumentedCommandPolicy {
    /// Stop with [`MergeError::UndocumentedCommand`].
    #[default]
    Fail,
    /// Omit that command only, log a warning, and keep the rest of the
    /// cluster.
    Skip,
}

/// Options for [`merge_zcl_tables`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub undocumented_command: UndocumentedCommandPolicy,
}

/// Merges the three cluster sources into validated cluster and foundation
/// tables.
///
/// Output order follows declaration order in the cluster definitions and in
/// the foundation ID table. Returns the first inconsistency found.
pub fn merge_zcl_tables(
    sources: &ZclSources,
    options: &MergeOptions,
) -> Result<ZclTables, MergeError> {
    let clusters = merge_clusters(
        &sources.cluster_defs,
        &sources.common_ids,
        &sources.command_meta,
        options,
    )?;
    let foundation = merge_foundation(&sources.common_ids, &sources.command_meta)?;
    let tables = ZclTables {
        clusters,
        foundation,
    };

    if let Some(err) = validate_zcl_tables(&tables).into_iter().next() {
        return Err(err.into());
    }

    info!(
        clusters = tables.clusters.clusters.len(),
        foundation = tables.foundation.commands.len(),
        "merged cluster table"
    );
    Ok(tables)
}

/// Builds the per-cluster table.
pub fn merge_clusters(
    cluster_defs: &ClusterDefinitions,
    common_ids: &CommonIds,
    command_meta: &CommandMeta,
    options: &MergeOptions,
) -> Result<ClusterTable, MergeError> {
    let mut clusters = OrderedMap::new();

    for (name, raw) in cluster_defs.iter() {
        let id = common_ids
            .cluster_ids
            .get(name)
            .copied()
            .ok_or_else(|| MergeError::UnknownClusterId(name.to_string()))?;

        let documented = command_meta.functional.get(name);
        let declares_commands = raw.commands.as_ref().is_some_and(|c| !c.is_empty())
            || raw.command_responses.as_ref().is_some_and(|c| !c.is_empty());
        if documented.is_none() && declares_commands {
            debug!(cluster = name, "no command metadata, emitting cluster without commands");
        }

        let cluster = ClusterDefinition {
            id,
            attributes: resolve_attributes(name, raw.attributes.as_ref())?,
            commands: resolve_commands(name, raw.commands.as_ref(), documented, options)?,
            commands_response: resolve_commands(
                name,
                raw.command_responses.as_ref(),
                documented,
                options,
            )?,
        };
        debug!(
            cluster = name,
            id,
            attributes = cluster.attributes.len(),
            commands = cluster.commands.len(),
            responses = cluster.commands_response.len(),
            "resolved cluster"
        );
        clusters.insert(name, cluster);
    }

    Ok(ClusterTable { clusters })
}

/// Builds the foundation command table.
///
/// Every command with an ID must have metadata.
pub fn merge_foundation(
    common_ids: &CommonIds,
    command_meta: &CommandMeta,
) -> Result<FoundationTable, MergeError> {
    let mut commands = OrderedMap::new();

    for (name, &id) in common_ids.foundation.iter() {
        let meta = command_meta
            .foundation
            .get(name)
            .ok_or_else(|| MergeError::MissingFoundationMeta(name.to_string()))?;

        let scope = format!("foundation.{name}");
        commands.insert(
            name,
            FoundationCommand {
                id,
                known_buf_len: meta.known_buf_len,
                parameters: resolve_parameters(&scope, &meta.params)?,
            },
        );
    }

    Ok(FoundationTable { commands })
}

fn resolve_attributes(
    cluster: &str,
    declared: Option<&OrderedMap<RawAttribute>>,
) -> Result<OrderedMap<AttributeDefinition>, MergeError> {
    let mut attributes = OrderedMap::new();
    let Some(declared) = declared else {
        return Ok(attributes);
    };

    for (name, raw) in declared.iter() {
        let data_type = resolve_data_type(
            cluster,
            name,
            &raw.type_name,
            SourceKind::ClusterDefinitions,
        )?;
        attributes.insert(
            name,
            AttributeDefinition {
                id: raw.id,
                data_type,
            },
        );
    }

    Ok(attributes)
}

fn resolve_commands(
    cluster: &str,
    declared: Option<&OrderedMap<u8>>,
    documented: Option<&OrderedMap<RawCommandMeta>>,
    options: &MergeOptions,
) -> Result<OrderedMap<CommandDefinition>, MergeError> {
    let mut commands = OrderedMap::new();
    let (Some(declared), Some(documented)) = (declared, documented) else {
        return Ok(commands);
    };

    for (name, &id) in declared.iter() {
        let Some(meta) = documented.get(name) else {
            match options.undocumented_command {
                UndocumentedCommandPolicy::Fail => {
                    return Err(MergeError::UndocumentedCommand {
                        cluster: cluster.to_string(),
                        command: name.to_string(),
                    });
                }
                UndocumentedCommandPolicy::Skip => {
                    warn!(cluster, command = name, "skipping command without metadata");
                    continue;
                }
            }
        };

        let scope = format!("{cluster}.{name}");
        commands.insert(
            name,
            CommandDefinition {
                id,
                parameters: resolve_parameters(&scope, &meta.params)?,
            },
        );
    }

    Ok(commands)
}

fn resolve_parameters(scope: &str, params: &[RawParameter]) -> Result<Vec<Parameter>, MergeError> {
    params
        .iter()
        .map(|param| {
            let data_type =
                resolve_data_type(scope, &param.name, &param.ty, SourceKind::CommandMeta)?;
            Ok(Parameter::new(param.name.clone(), data_type))
        })
        .collect()
}

fn resolve_data_type(
    scope: &str,
    name: &str,
    type_name: &str,
    origin: SourceKind,
) -> Result<DataType, MergeError> {
    type_name
        .parse()
        .map_err(|_| MergeError::UnknownDataType {
            scope: scope.to_string(),
            name: name.to_string(),
            type_name: type_name.to_string(),
            origin,
        })
}
