//! Emitters for merged protocol tables.
//!
//! The emitters render a table exactly as given. They perform no checks of
//! their own; anything that reaches them has already been merged and
//! validated by `protocol-table-core`. Output order is table order, so equal
//! tables always render to identical bytes.
//!
//! # Example
//!
//! ```
//! use protocol_table_core::*;
//! use protocol_table_emit::{Header, OutputFormat, emit_zcl_tables};
//!
//! let tables = ZclTables::default();
//! let files = emit_zcl_tables(&tables, OutputFormat::TypeScript, &Header::new("table-gen", "00"))
//!     .unwrap();
//! let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
//! assert_eq!(names, ["cluster.ts", "foundation.ts"]);
//! ```

mod error;
mod format;
pub mod json;
pub mod typescript;

use protocol_table_core::{TransportTable, ZclTables};

pub use error::EmitError;
pub use format::{GENERATED_MARKER, GeneratedFile, Header, OutputFormat};

/// Renders the cluster and foundation tables, in that order.
pub fn emit_zcl_tables(
    tables: &ZclTables,
    format: OutputFormat,
    header: &Header,
) -> Result<Vec<GeneratedFile>, EmitError> {
    let (clusters, foundation) = match format {
        OutputFormat::TypeScript => (
            typescript::render_clusters(&tables.clusters, header),
            typescript::render_foundation(&tables.foundation, header),
        ),
        OutputFormat::Json => (
            json::render("clusters", &tables.clusters, header)?,
            json::render("foundation", &tables.foundation, header)?,
        ),
    };

    let ext = format.extension();
    Ok(vec![
        GeneratedFile {
            name: format!("cluster.{ext}"),
            contents: clusters,
        },
        GeneratedFile {
            name: format!("foundation.{ext}"),
            contents: foundation,
        },
    ])
}

/// Renders the transport table.
pub fn emit_transport_table(
    table: &TransportTable,
    format: OutputFormat,
    header: &Header,
) -> Result<String, EmitError> {
    match format {
        OutputFormat::TypeScript => Ok(typescript::render_transport(table, header)),
        OutputFormat::Json => json::render("subsystems", table, header),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_names() {
        let files = emit_zcl_tables(
            &ZclTables::default(),
            OutputFormat::Json,
            &Header::new("table-gen", "00"),
        )
        .unwrap();
        assert_eq!(files[0].name, "cluster.json");
        assert_eq!(files[1].name, "foundation.json");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let header = Header::new("table-gen", "00");
        let table = TransportTable::default();
        for format in [OutputFormat::TypeScript, OutputFormat::Json] {
            assert_eq!(
                emit_transport_table(&table, format, &header).unwrap(),
                emit_transport_table(&table, format, &header).unwrap()
            );
        }
    }

    #[test]
    fn test_output_format_deserializes_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"typescript\"").unwrap();
        assert_eq!(format, OutputFormat::TypeScript);
        assert_eq!(OutputFormat::default(), OutputFormat::TypeScript);
    }
}
