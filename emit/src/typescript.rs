//! TypeScript rendering.
//!
//! The layout matches the hand-maintained modules these tables replace:
//! four-space indentation, a trailing comma after every entry, and enum
//! members referenced by name (`DataType.UINT8`, `ParameterType.UINT16`,
//! `Type.SREQ`, `[Subsystem.SYS]`).

use protocol_table_core::{
    ClusterTable, CommandDefinition, FoundationTable, OrderedMap, Parameter, TransportParameter,
    TransportTable,
};

use crate::format::Header;

const INDENT: &str = "    ";

const CLUSTER_PRELUDE: &str = "import DataType from './dataType';
import * as TsType from './tstype';

interface ClusterDefinition {
    ID: number;
    attributes: {[s: string]: TsType.Attribute};
    commands: {
        [s: string]: TsType.Command;
    };
    commandsResponse: {
        [s: string]: TsType.Command;
    };
};

const Cluster: {
    [s: string]: ClusterDefinition;
}
= {
";

const FOUNDATION_PRELUDE: &str = "import DataType from './dataType';
import * as TsType from './tstype';

interface FoundationDefinition {
    ID: number;
    knownBufLen: number;
    parameters: TsType.Parameter[];
};

const Foundation: {
    [s: string]: FoundationDefinition;
}
= {
";

const TRANSPORT_PRELUDE: &str = "import {Subsystem, Type} from '../unpi/constants';
import ParameterType from './parameterType';
import {MtCmd} from './tstype';

const Definition: {
    [s: number]: MtCmd[];
}
= {
";

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

fn push_header(out: &mut String, header: &Header) {
    out.push_str(&format!("// {header}\n\n"));
}

fn push_footer(out: &mut String, name: &str) {
    out.push_str("};\n\n");
    out.push_str(&format!("export default {name};\n"));
}

/// Renders a name as an object key, quoting it when it is not a plain
/// identifier.
fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// Renders a single-quoted string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn push_parameters(out: &mut String, depth: usize, parameters: &[Parameter]) {
    push_line(out, depth, "parameters: [");
    for param in parameters {
        push_line(
            out,
            depth + 1,
            &format!(
                "{{name: {}, type: DataType.{}}},",
                string_literal(&param.name),
                param.data_type
            ),
        );
    }
    push_line(out, depth, "],");
}

fn push_commands(
    out: &mut String,
    depth: usize,
    key: &str,
    commands: &OrderedMap<CommandDefinition>,
) {
    push_line(out, depth, &format!("{key}: {{"));
    for (name, command) in commands.iter() {
        push_line(out, depth + 1, &format!("{}: {{", property_key(name)));
        push_line(out, depth + 2, &format!("ID: {},", command.id));
        push_parameters(out, depth + 2, &command.parameters);
        push_line(out, depth + 1, "},");
    }
    push_line(out, depth, "},");
}

/// Renders the cluster table as the `Cluster` module.
///
/// # Examples
///
/// ```
/// use protocol_table_core::*;
/// use protocol_table_emit::{Header, typescript};
///
/// let mut table = ClusterTable::default();
/// let mut basic = ClusterDefinition::new(0);
/// basic
///     .attributes
///     .insert("zclVersion", AttributeDefinition { id: 0, data_type: DataType::Uint8 });
/// table.clusters.insert("genBasic", basic);
///
/// let source = typescript::render_clusters(&table, &Header::new("table-gen", "00"));
/// assert!(source.contains(
///     "    genBasic: {\n        ID: 0,\n        attributes: {\n            zclVersion: {ID: 0, type: DataType.UINT8},\n        },\n        commands: {\n        },\n        commandsResponse: {\n        },\n    },\n"
/// ));
/// ```
pub fn render_clusters(table: &ClusterTable, header: &Header) -> String {
    let mut out = String::new();
    push_header(&mut out, header);
    out.push_str(CLUSTER_PRELUDE);

    for (name, cluster) in table.clusters.iter() {
        push_line(&mut out, 1, &format!("{}: {{", property_key(name)));
        push_line(&mut out, 2, &format!("ID: {},", cluster.id));

        push_line(&mut out, 2, "attributes: {");
        for (attr, definition) in cluster.attributes.iter() {
            push_line(
                &mut out,
                3,
                &format!(
                    "{}: {{ID: {}, type: DataType.{}}},",
                    property_key(attr),
                    definition.id,
                    definition.data_type
                ),
            );
        }
        push_line(&mut out, 2, "},");

        push_commands(&mut out, 2, "commands", &cluster.commands);
        push_commands(&mut out, 2, "commandsResponse", &cluster.commands_response);
        push_line(&mut out, 1, "},");
    }

    push_footer(&mut out, "Cluster");
    out
}

/// Renders the foundation table as the `Foundation` module.
pub fn render_foundation(table: &FoundationTable, header: &Header) -> String {
    let mut out = String::new();
    push_header(&mut out, header);
    out.push_str(FOUNDATION_PRELUDE);

    for (name, command) in table.commands.iter() {
        push_line(&mut out, 1, &format!("{}: {{", property_key(name)));
        push_line(&mut out, 2, &format!("ID: {},", command.id));
        push_line(&mut out, 2, &format!("knownBufLen: {},", command.known_buf_len));
        push_parameters(&mut out, 2, &command.parameters);
        push_line(&mut out, 1, "},");
    }

    push_footer(&mut out, "Foundation");
    out
}

fn push_transport_parameters(
    out: &mut String,
    key: &str,
    parameters: Option<&[TransportParameter]>,
) {
    let Some(parameters) = parameters else {
        return;
    };

    push_line(out, 3, &format!("{key}: ["));
    for param in parameters {
        push_line(
            out,
            4,
            &format!(
                "{{name: {}, parameterType: ParameterType.{}}},",
                string_literal(&param.name),
                param.parameter_type
            ),
        );
    }
    push_line(out, 3, "],");
}

/// Renders the transport table as the `Definition` module.
///
/// A command without request (or response) parameters omits that key; an
/// empty list is rendered as an empty array.
pub fn render_transport(table: &TransportTable, header: &Header) -> String {
    let mut out = String::new();
    push_header(&mut out, header);
    out.push_str(TRANSPORT_PRELUDE);

    for (subsystem, commands) in table.subsystems.iter() {
        push_line(&mut out, 1, &format!("[Subsystem.{subsystem}]: ["));
        for command in commands {
            push_line(&mut out, 2, "{");
            push_line(&mut out, 3, &format!("name: {},", string_literal(&command.name)));
            push_line(&mut out, 3, &format!("ID: {},", command.id));
            push_line(&mut out, 3, &format!("type: Type.{},", command.command_type));
            push_transport_parameters(&mut out, "request", command.request.as_deref());
            push_transport_parameters(&mut out, "response", command.response.as_deref());
            push_line(&mut out, 2, "},");
        }
        push_line(&mut out, 1, "],");
    }

    push_footer(&mut out, "Definition");
    out
}
