//! Protocol definition tables and the merge logic that builds them.
//!
//! Protocol metadata is maintained by hand across several JSON sources that
//! are keyed inconsistently: by name, by numeric ID, by type index. This
//! crate turns them into single, validated, strongly typed tables:
//!
//! - [`merge_zcl_tables`] combines the cluster definitions, the common
//!   identifiers and the command metadata into a [`ClusterTable`] and a
//!   [`FoundationTable`].
//! - [`merge_transport_table`] combines the per-subsystem command lists and
//!   their metadata into a [`TransportTable`].
//!
//! Both are pure functions of their inputs. They return a complete table or
//! the first [`MergeError`] found; nothing is coerced or defaulted, with one
//! exception: a cluster that has no command metadata at all is emitted with
//! empty command maps.
//!
//! Wire types come from closed enumerations ([`DataType`], [`CommandType`],
//! [`ParameterType`], [`Subsystem`]). The raw source shapes ([`RawCluster`],
//! [`CommonIds`], [`CommandMeta`], [`RawTransportCommand`]) are checked when
//! they are deserialized, before any merging.
//!
//! # Example
//!
//! ```
//! use protocol_table_core::*;
//!
//! let sources = ZclSources {
//!     cluster_defs: serde_json::from_str(
//!         r#"{"fooCluster": {"attrId": {"someAttr": {"id": 0, "type": "notARealType"}}}}"#,
//!     ).unwrap(),
//!     common_ids: serde_json::from_str(r#"{"clusterId": {"fooCluster": 1}}"#).unwrap(),
//!     command_meta: CommandMeta::default(),
//! };
//!
//! let err = merge_zcl_tables(&sources, &MergeOptions::default()).unwrap_err();
//! assert_eq!(err.origin(), SourceKind::ClusterDefinitions);
//! assert!(err.to_string().contains("notARealType"));
//! ```

mod cluster;
mod error;
mod map;
mod source;
mod table;
mod transport;
mod types;
mod validate;

pub use cluster::{
    MergeOptions, UndocumentedCommandPolicy, merge_clusters, merge_foundation, merge_zcl_tables,
};
pub use error::{MergeError, SourceKind};
pub use map::OrderedMap;
pub use source::*;
pub use table::*;
pub use transport::merge_transport_table;
pub use types::{CommandType, DataType, IndexedTag, ParameterType, ParseTagError, Subsystem};
pub use validate::{ValidationError, validate_transport_table, validate_zcl_tables};
