//! JSON rendering.
//!
//! Each document is an object holding the header under `"@generated"`
//! followed by the table under a single key. Table structure and key order
//! are exactly what the table types serialize to.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EmitError;
use crate::format::{GENERATED_MARKER, Header};

/// Renders `table` as a pretty-printed JSON document stored under `key`.
///
/// # Examples
///
/// ```
/// use protocol_table_core::*;
/// use protocol_table_emit::{Header, json};
///
/// let mut table = FoundationTable::default();
/// table.commands.insert(
///     "read",
///     FoundationCommand { id: 0, known_buf_len: 0, parameters: Vec::new() },
/// );
///
/// let doc = json::render("foundation", &table, &Header::new("table-gen", "00")).unwrap();
/// let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
/// assert_eq!(value["foundation"]["read"]["knownBufLen"], 0);
/// assert!(value["@generated"].as_str().unwrap().ends_with("sha256:00. Do not edit."));
/// ```
pub fn render<T: Serialize>(key: &str, table: &T, header: &Header) -> Result<String, EmitError> {
    let mut doc = Map::new();
    doc.insert(
        GENERATED_MARKER.to_string(),
        Value::String(header.to_string()),
    );
    doc.insert(key.to_string(), serde_json::to_value(table)?);

    let mut out = serde_json::to_string_pretty(&Value::Object(doc))?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use protocol_table_core::{
        AttributeDefinition, ClusterDefinition, ClusterTable, CommandType, DataType,
        TransportCommand, TransportTable,
    };

    use super::*;

    #[test]
    fn test_gen_basic_document() {
        let mut basic = ClusterDefinition::new(0);
        basic.attributes.insert(
            "zclVersion",
            AttributeDefinition {
                id: 0,
                data_type: DataType::Uint8,
            },
        );
        let mut table = ClusterTable::default();
        table.clusters.insert("genBasic", basic);

        let doc = render("clusters", &table, &Header::new("table-gen", "ab")).unwrap();
        let value: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(
            value["clusters"],
            serde_json::json!({
                "genBasic": {
                    "ID": 0,
                    "attributes": {"zclVersion": {"ID": 0, "type": "UINT8"}},
                    "commands": {},
                    "commandsResponse": {}
                }
            })
        );
        assert!(doc.starts_with("{\n  \"@generated\": "));
    }

    #[test]
    fn test_key_order_follows_table_order() {
        let mut table = ClusterTable::default();
        table.clusters.insert("zeta", ClusterDefinition::new(2));
        table.clusters.insert("alpha", ClusterDefinition::new(1));

        let doc = render("clusters", &table, &Header::new("table-gen", "ab")).unwrap();
        let zeta = doc.find("\"zeta\"").unwrap();
        let alpha = doc.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_absent_transport_lists_are_omitted() {
        let mut table = TransportTable::default();
        table.subsystems.insert(
            "SYS",
            vec![TransportCommand {
                name: "ping".into(),
                id: 1,
                command_type: CommandType::Sreq,
                request: Some(Vec::new()),
                response: None,
            }],
        );

        let doc = render("subsystems", &table, &Header::new("table-gen", "ab")).unwrap();
        let value: Value = serde_json::from_str(&doc).unwrap();
        let ping = &value["subsystems"]["SYS"][0];
        assert_eq!(ping["type"], "SREQ");
        assert_eq!(ping["request"], serde_json::json!([]));
        assert!(ping.get("response").is_none());
    }
}
