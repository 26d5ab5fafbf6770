//! Integration tests for loading configuration and definition sources from
//! disk.

use std::fs;
use std::path::{Path, PathBuf};

use protocol_table_core::{DataType, MergeOptions, merge_transport_table, merge_zcl_tables};
use protocol_table_loader::{
    GeneratorConfig, LoadError, TransportSourcePaths, ZclSourcePaths, load_transport_sources,
    load_zcl_sources,
};
use tempfile::TempDir;

const CLUSTER_DEFS: &str = r#"{
    "genBasic": {"attrId": {"zclVersion": {"id": 0, "type": "UINT8"}}, "cmd": null, "cmdRsp": null},
    "genOnOff": {"attrId": {"onOff": {"id": 0, "type": "boolean"}}, "cmd": {"off": 0, "on": 1}}
}"#;

const COMMON: &str = r#"{
    "clusterId": {"genBasic": 0, "genOnOff": 6},
    "foundation": {"read": 0},
    "status": {"success": 0}
}"#;

const ZCL_META: &str = r#"{
    "foundation": {"read": {"knownBufLen": 0, "params": [{"attrId": "uint16"}]}},
    "functional": {"genOnOff": {"off": {"dir": 0, "params": []}, "on": {"dir": 0, "params": []}}}
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn zcl_paths(dir: &Path) -> ZclSourcePaths {
    ZclSourcePaths {
        cluster_defs: write(dir, "cluster_defs.json", CLUSTER_DEFS),
        common: write(dir, "common.json", COMMON),
        command_meta: write(dir, "zcl_meta.json", ZCL_META),
    }
}

// ---------------------------------------------------------------------------
// Source loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_and_merge_zcl_sources() {
    let dir = TempDir::new().unwrap();
    let loaded = load_zcl_sources(&zcl_paths(dir.path())).unwrap();
    assert_eq!(loaded.fingerprint.as_str().len(), 64);

    let tables = merge_zcl_tables(&loaded.sources, &MergeOptions::default()).unwrap();
    let on_off = tables.clusters.clusters.get("genOnOff").unwrap();
    assert_eq!(on_off.id, 6);
    assert_eq!(
        on_off.attributes.get("onOff").unwrap().data_type,
        DataType::Boolean
    );
    assert_eq!(
        on_off.commands.keys().collect::<Vec<_>>(),
        vec!["off", "on"]
    );
    assert_eq!(
        tables.foundation.commands.get("read").unwrap().parameters[0].data_type,
        DataType::Uint16
    );
}

#[test]
fn test_fingerprint_is_stable_across_loads() {
    let dir = TempDir::new().unwrap();
    let paths = zcl_paths(dir.path());

    let first = load_zcl_sources(&paths).unwrap();
    let second = load_zcl_sources(&paths).unwrap();
    assert_eq!(first.fingerprint, second.fingerprint);

    write(dir.path(), "common.json", &COMMON.replace("\"genOnOff\": 6", "\"genOnOff\": 7"));
    let third = load_zcl_sources(&paths).unwrap();
    assert_ne!(first.fingerprint, third.fingerprint);
}

#[test]
fn test_missing_source_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let mut paths = zcl_paths(dir.path());
    paths.command_meta = dir.path().join("absent.json");

    let err = load_zcl_sources(&paths).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(err.path(), paths.command_meta.as_path());
}

#[test]
fn test_parameter_with_two_keys_fails_at_load() {
    let dir = TempDir::new().unwrap();
    let mut paths = zcl_paths(dir.path());
    paths.command_meta = write(
        dir.path(),
        "bad_meta.json",
        r#"{"foundation": {}, "functional": {"genOnOff": {"off": {"params": [{"a": "uint8", "b": "uint8"}]}}}}"#,
    );

    let err = load_zcl_sources(&paths).unwrap_err();
    assert!(matches!(err, LoadError::Json { .. }));
    let message = err.to_string();
    assert!(message.contains("bad_meta.json"), "{message}");
    assert!(message.contains("has a second key `b`"), "{message}");
}

#[test]
fn test_duplicate_cluster_name_fails_at_load() {
    let dir = TempDir::new().unwrap();
    let mut paths = zcl_paths(dir.path());
    paths.cluster_defs = write(
        dir.path(),
        "dup_defs.json",
        r#"{"genBasic": {}, "genBasic": {}}"#,
    );

    let err = load_zcl_sources(&paths).unwrap_err();
    assert!(err.to_string().contains("duplicate key `genBasic`"));
}

#[test]
fn test_non_numeric_cluster_id_fails_at_load() {
    let dir = TempDir::new().unwrap();
    let mut paths = zcl_paths(dir.path());
    paths.common = write(dir.path(), "ids.json", r#"{"clusterId": {"genBasic": "zero"}}"#);

    let err = load_zcl_sources(&paths).unwrap_err();
    assert!(matches!(err, LoadError::Json { .. }));
    assert_eq!(err.path(), paths.common.as_path());
}

#[test]
fn test_load_and_merge_transport_sources() {
    let dir = TempDir::new().unwrap();
    let paths = TransportSourcePaths {
        subsystems: write(dir.path(), "zmt_defs.json", r#"{"SYS": ["resetReq", "ping"]}"#),
        command_meta: write(
            dir.path(),
            "zpi_meta.json",
            r#"{"SYS": {
                "resetReq": {"cmdId": 0, "type": 2, "params": {"req": [{"type": 0}]}},
                "ping": {"cmdId": 1, "type": "SREQ", "params": {"req": [], "rsp": [{"capabilities": "UINT16"}]}}
            }}"#,
        ),
    };

    let loaded = load_transport_sources(&paths).unwrap();
    let table = merge_transport_table(&loaded.sources).unwrap();
    assert_eq!(table.command_count(), 2);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_paths_resolve_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let config_path = write(
        &config_dir,
        "table-gen.yml",
        r#"
version: "1.0"
clusters:
  cluster_defs: defs/cluster_defs.json
  common: defs/common.json
  command_meta: defs/zcl_meta.json
  output_dir: generated
"#,
    );

    let config = GeneratorConfig::load(&config_path).unwrap();
    let clusters = config.clusters.unwrap();
    assert_eq!(
        clusters.sources.cluster_defs,
        config_dir.join("defs/cluster_defs.json")
    );
    assert_eq!(clusters.output_dir, config_dir.join("generated"));
    assert!(config.transport.is_none());
}

#[test]
fn test_config_without_pipelines_is_invalid() {
    let dir = TempDir::new().unwrap();
    let config_path = write(dir.path(), "table-gen.yml", "version: \"1.0\"\n");

    let err = GeneratorConfig::load(&config_path).unwrap_err();
    assert!(matches!(err, LoadError::InvalidConfig { .. }));
    assert!(err.to_string().contains("invalid configuration"));
}

#[test]
fn test_malformed_config_is_yaml_error() {
    let dir = TempDir::new().unwrap();
    let config_path = write(dir.path(), "table-gen.yml", "version: [\n");

    let err = GeneratorConfig::load(&config_path).unwrap_err();
    assert!(matches!(err, LoadError::Yaml { .. }));
    assert_eq!(err.path(), config_path.as_path());
}
