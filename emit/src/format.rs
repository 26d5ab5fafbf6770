//! Output targets and the generated-file header.

use serde::{Deserialize, Serialize};

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// TypeScript modules referencing the runtime enumerations by name.
    #[default]
    #[cfg_attr(feature = "clap", value(name = "typescript"))]
    TypeScript,
    /// Plain JSON documents.
    Json,
}

impl OutputFormat {
    /// File extension for this format, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::TypeScript => "ts",
            OutputFormat::Json => "json",
        }
    }
}

/// Marker identifying generated files.
pub const GENERATED_MARKER: &str = "@generated";

/// Provenance line written at the top of every emitted file.
///
/// # Examples
///
/// ```
/// use protocol_table_emit::Header;
///
/// let header = Header::new("table-gen", "ab12");
/// assert_eq!(
///     header.to_string(),
///     "@generated by table-gen from inputs sha256:ab12. Do not edit."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    generator: String,
    fingerprint: String,
}

impl Header {
    pub fn new(generator: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{GENERATED_MARKER} by {} from inputs sha256:{}. Do not edit.",
            self.generator, self.fingerprint
        )
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name, relative to the pipeline's output location.
    pub name: String,
    pub contents: String,
}
