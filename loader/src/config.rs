//! Generator configuration.
//!
//! Defines the YAML file that tells the generator where each pipeline's
//! sources live, where the output goes, and how strict the cluster merge is.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! format: typescript
//! clusters:
//!   cluster_defs: defs/cluster_defs.json
//!   common: defs/common.json
//!   command_meta: defs/zcl_meta.json
//!   output_dir: src/zcl/definition
//!   undocumented_commands: fail
//! transport:
//!   subsystems: defs/zmt_defs.json
//!   command_meta: defs/zpi_meta.json
//!   output: src/znp/definition.ts
//! ```
//!
//! Either pipeline may be left out, but not both. Relative paths are resolved
//! against the directory holding the configuration file.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use protocol_table_core::{MergeOptions, UndocumentedCommandPolicy};
use protocol_table_emit::OutputFormat;
use serde::Deserialize;

use crate::error::{LoadError, Result};
use crate::loader::{TransportSourcePaths, ZclSourcePaths, resolve};

/// Configuration file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "table-gen.yml";

/// The only configuration format version understood.
pub const SUPPORTED_VERSION: &str = "1.0";

/// Inputs and output of the cluster and foundation pipeline.
///
/// # Examples
///
/// ```
/// use protocol_table_core::UndocumentedCommandPolicy;
/// use protocol_table_loader::ClusterPipelineConfig;
///
/// let yaml = "
/// cluster_defs: cluster_defs.json
/// common: common.json
/// command_meta: zcl_meta.json
/// output_dir: out
/// ";
/// let config: ClusterPipelineConfig = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.undocumented_commands, UndocumentedCommandPolicy::Fail);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterPipelineConfig {
    #[serde(flatten)]
    pub sources: ZclSourcePaths,
    /// Directory receiving `cluster.<ext>` and `foundation.<ext>`.
    pub output_dir: PathBuf,
    /// What to do with a declared command missing from otherwise present
    /// cluster metadata.
    #[serde(default)]
    pub undocumented_commands: UndocumentedCommandPolicy,
}

impl ClusterPipelineConfig {
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            undocumented_command: self.undocumented_commands,
        }
    }
}

/// Inputs and output of the transport pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportPipelineConfig {
    #[serde(flatten)]
    pub sources: TransportSourcePaths,
    /// File receiving the transport table.
    pub output: PathBuf,
}

/// Top-level generator configuration.
///
/// # Examples
///
/// ```no_run
/// use protocol_table_loader::GeneratorConfig;
///
/// let config = GeneratorConfig::load("table-gen.yml").unwrap();
/// if let Some(clusters) = &config.clusters {
///     println!("cluster tables go to {}", clusters.output_dir.display());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Configuration format version (`"1.0"`).
    pub version: String,
    /// Output format shared by both pipelines.
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub clusters: Option<ClusterPipelineConfig>,
    #[serde(default)]
    pub transport: Option<TransportPipelineConfig>,
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file and resolves its relative paths.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read,
    /// [`LoadError::Yaml`] if parsing fails, or [`LoadError::InvalidConfig`]
    /// if the version is unsupported or no pipeline is configured.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        if let Err(message) = config.check() {
            return Err(LoadError::InvalidConfig {
                path: path.to_path_buf(),
                message,
            });
        }

        config.resolve_against(path.parent().unwrap_or(Path::new("")));
        Ok(config)
    }

    /// Checks everything the YAML shape alone cannot express.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.version != SUPPORTED_VERSION {
            return Err(format!(
                "unsupported version `{}` (expected `{SUPPORTED_VERSION}`)",
                self.version
            ));
        }
        if self.clusters.is_none() && self.transport.is_none() {
            return Err("neither `clusters` nor `transport` is configured".to_string());
        }
        Ok(())
    }

    /// Rewrites every relative path as `base` joined with it.
    pub fn resolve_against(&mut self, base: &Path) {
        if let Some(clusters) = &mut self.clusters {
            clusters.sources.resolve_against(base);
            resolve(&mut clusters.output_dir, base);
        }
        if let Some(transport) = &mut self.transport {
            transport.sources.resolve_against(base);
            resolve(&mut transport.output, base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
format: json
clusters:
  cluster_defs: defs/cluster_defs.json
  common: defs/common.json
  command_meta: /shared/zcl_meta.json
  output_dir: out/zcl
  undocumented_commands: skip
transport:
  subsystems: defs/zmt_defs.json
  command_meta: defs/zpi_meta.json
  output: out/definition.json
"#
    }

    fn minimal_yaml() -> &'static str {
        r#"
version: "1.0"
transport:
  subsystems: zmt_defs.json
  command_meta: zpi_meta.json
  output: definition.ts
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: GeneratorConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        let clusters = config.clusters.as_ref().unwrap();
        assert_eq!(
            clusters.sources.cluster_defs,
            PathBuf::from("defs/cluster_defs.json")
        );
        assert_eq!(
            clusters.merge_options().undocumented_command,
            UndocumentedCommandPolicy::Skip
        );
        assert_eq!(
            config.transport.as_ref().unwrap().output,
            PathBuf::from("out/definition.json")
        );
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: GeneratorConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        assert_eq!(config.format, OutputFormat::TypeScript);
        assert!(config.clusters.is_none());
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let yaml = sample_yaml().replace("undocumented_commands: skip", "undocumented_commands: ignore");
        assert!(serde_yaml::from_str::<GeneratorConfig>(&yaml).is_err());
    }

    #[test]
    fn test_check_requires_a_pipeline() {
        let config: GeneratorConfig = serde_yaml::from_str("version: \"1.0\"").unwrap();
        assert_eq!(
            config.check(),
            Err("neither `clusters` nor `transport` is configured".to_string())
        );
    }

    #[test]
    fn test_check_rejects_unknown_version() {
        let yaml = minimal_yaml().replace("\"1.0\"", "\"2.0\"");
        let config: GeneratorConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.check().unwrap_err().contains("`2.0`"));
    }

    #[test]
    fn test_resolve_against_config_dir() {
        let mut config: GeneratorConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        config.resolve_against(Path::new("/repo"));

        let clusters = config.clusters.unwrap();
        assert_eq!(clusters.sources.common, PathBuf::from("/repo/defs/common.json"));
        assert_eq!(
            clusters.sources.command_meta,
            PathBuf::from("/shared/zcl_meta.json")
        );
        assert_eq!(clusters.output_dir, PathBuf::from("/repo/out/zcl"));
        assert_eq!(
            config.transport.unwrap().output,
            PathBuf::from("/repo/out/definition.json")
        );
    }
}
