//! Transport command table merge.
//!
//! The subsystem source declares which commands exist; the metadata source
//! describes each one. Unlike the cluster merge there is no leniency: every
//! declared command must be described.

use tracing::{debug, info};

use crate::{
    CommandType, IndexedTag, MergeError, OrderedMap, ParameterType, RawParameter,
    RawTransportCommand, Subsystem, TransportCommand, TransportParameter, TransportSources,
    TransportTable, TypeRef, validate_transport_table,
};

/// Merges the subsystem command lists with their metadata.
///
/// Commands keep the order in which each subsystem lists them.
///
/// # Examples
///
/// ```
/// use protocol_table_core::*;
///
/// let sources = TransportSources {
///     subsystems: serde_json::from_str(r#"{"SYS": ["ping"]}"#).unwrap(),
///     command_meta: serde_json::from_str(
///         r#"{"SYS": {"ping": {"cmdId": 1, "type": 1, "params": {"req": [], "rsp": [{"capabilities": 1}]}}}}"#,
///     ).unwrap(),
/// };
///
/// let table = merge_transport_table(&sources).unwrap();
/// let ping = &table.subsystems.get("SYS").unwrap()[0];
/// assert_eq!(ping.command_type, CommandType::Sreq);
/// assert_eq!(ping.response.as_ref().unwrap()[0].parameter_type, ParameterType::Uint16);
/// ```
pub fn merge_transport_table(sources: &TransportSources) -> Result<TransportTable, MergeError> {
    let mut subsystems = OrderedMap::new();

    for (subsystem, commands) in sources.subsystems.iter() {
        if subsystem.parse::<Subsystem>().is_err() {
            return Err(MergeError::UnknownSubsystem(subsystem.to_string()));
        }

        let documented = sources.command_meta.get(subsystem);
        let mut resolved = Vec::with_capacity(commands.len());
        for command in commands {
            let meta = documented.and_then(|meta| meta.get(command)).ok_or_else(|| {
                MergeError::MissingCommandMeta {
                    subsystem: subsystem.to_string(),
                    command: command.clone(),
                }
            })?;
            resolved.push(resolve_command(subsystem, command, meta)?);
        }

        debug!(subsystem, commands = resolved.len(), "resolved subsystem");
        subsystems.insert(subsystem, resolved);
    }

    let table = TransportTable { subsystems };
    if let Some(err) = validate_transport_table(&table).into_iter().next() {
        return Err(err.into());
    }

    info!(
        subsystems = table.subsystems.len(),
        commands = table.command_count(),
        "merged transport table"
    );
    Ok(table)
}

fn resolve_command(
    subsystem: &str,
    command: &str,
    meta: &RawTransportCommand,
) -> Result<TransportCommand, MergeError> {
    Ok(TransportCommand {
        name: command.to_string(),
        id: meta.id,
        command_type: resolve_command_type(subsystem, command, &meta.command_type)?,
        request: resolve_parameters(subsystem, command, meta.params.req.as_deref())?,
        response: resolve_parameters(subsystem, command, meta.params.rsp.as_deref())?,
    })
}

fn resolve_command_type(
    subsystem: &str,
    command: &str,
    raw: &TypeRef,
) -> Result<CommandType, MergeError> {
    match raw {
        TypeRef::Index(index) => {
            CommandType::from_index(*index).ok_or_else(|| MergeError::InvalidTypeIndex {
                subsystem: subsystem.to_string(),
                command: command.to_string(),
                index: *index,
            })
        }
        TypeRef::Tag(tag) => tag.parse().map_err(|_| MergeError::UnknownCommandType {
            subsystem: subsystem.to_string(),
            command: command.to_string(),
            tag: tag.clone(),
        }),
    }
}

fn resolve_parameters(
    subsystem: &str,
    command: &str,
    params: Option<&[RawParameter<TypeRef>]>,
) -> Result<Option<Vec<TransportParameter>>, MergeError> {
    let Some(params) = params else {
        return Ok(None);
    };

    params
        .iter()
        .map(|param| {
            Ok(TransportParameter {
                name: param.name.clone(),
                parameter_type: resolve_parameter_type(subsystem, command, param)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn resolve_parameter_type(
    subsystem: &str,
    command: &str,
    param: &RawParameter<TypeRef>,
) -> Result<ParameterType, MergeError> {
    match &param.ty {
        TypeRef::Index(index) => ParameterType::from_index(*index).ok_or_else(|| {
            MergeError::InvalidParameterTypeIndex {
                subsystem: subsystem.to_string(),
                command: command.to_string(),
                parameter: param.name.clone(),
                index: *index,
            }
        }),
        TypeRef::Tag(tag) => tag.parse().map_err(|_| MergeError::UnknownParameterType {
            subsystem: subsystem.to_string(),
            command: command.to_string(),
            parameter: param.name.clone(),
            tag: tag.clone(),
        }),
    }
}
