//! Source loading and configuration for the protocol table generator.
//!
//! This crate sits between the file system and the pure merge logic in
//! `protocol-table-core`: it reads the generator configuration, reads each
//! definition source once into its typed raw schema, and fingerprints the
//! bytes so generated output can be traced back to its inputs.
//!
//! # Quick start
//!
//! ```no_run
//! use protocol_table_core::merge_zcl_tables;
//! use protocol_table_loader::{GeneratorConfig, load_zcl_sources};
//!
//! let config = GeneratorConfig::load("table-gen.yml").unwrap();
//! if let Some(clusters) = &config.clusters {
//!     let loaded = load_zcl_sources(&clusters.sources).unwrap();
//!     let tables = merge_zcl_tables(&loaded.sources, &clusters.merge_options()).unwrap();
//!     println!("{} clusters", tables.clusters.clusters.len());
//! }
//! ```

mod config;
mod error;
mod loader;

pub use config::{
    ClusterPipelineConfig, DEFAULT_CONFIG_FILE, GeneratorConfig, SUPPORTED_VERSION,
    TransportPipelineConfig,
};
pub use error::{LoadError, Result};
pub use loader::{
    Fingerprint, Loaded, SourceReader, TransportSourcePaths, ZclSourcePaths,
    load_transport_sources, load_zcl_sources,
};
