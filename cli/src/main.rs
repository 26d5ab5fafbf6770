use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use protocol_table_core::{
    MergeError, TransportTable, ZclTables, merge_transport_table, merge_zcl_tables,
};
use protocol_table_emit::{Header, OutputFormat, emit_transport_table, emit_zcl_tables};
use protocol_table_loader::{
    ClusterPipelineConfig, DEFAULT_CONFIG_FILE, Fingerprint, GeneratorConfig,
    TransportPipelineConfig, load_transport_sources, load_zcl_sources,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const GENERATOR: &str = "table-gen";

#[derive(Debug, Parser)]
#[command(name = "table-gen")]
#[command(about = "Merge protocol definition sources into validated, generated tables")]
#[command(version)]
struct Cli {
    /// Generator configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Log filter directive (e.g. `debug`, `protocol_table_core=trace`).
    /// Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load, merge and write the generated tables.
    Generate(GenerateArgs),
    /// Regenerate in memory and compare with the files on disk.
    Check(CheckArgs),
    /// Load and merge only, then print a summary.
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pipeline {
    Clusters,
    Transport,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Run only this pipeline.
    #[arg(long, value_enum)]
    only: Option<Pipeline>,
    /// Output format (defaults to the configured one).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Check only this pipeline.
    #[arg(long, value_enum)]
    only: Option<Pipeline>,
    /// Output format (defaults to the configured one).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Validate only this pipeline.
    #[arg(long, value_enum)]
    only: Option<Pipeline>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.log_level.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::Generate(args) => run_generate(&cli.config, args),
        Command::Check(args) => run_check(&cli.config, args),
        Command::Validate(args) => run_validate(&cli.config, args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(log_level: Option<&str>) -> Result<(), String> {
    let filter = match log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| format!("invalid --log-level `{directive}`: {e}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// The configured pipelines a command should run.
struct Selection<'a> {
    clusters: Option<&'a ClusterPipelineConfig>,
    transport: Option<&'a TransportPipelineConfig>,
}

fn select(config: &GeneratorConfig, only: Option<Pipeline>) -> Result<Selection<'_>, String> {
    let selection = match only {
        None => Selection {
            clusters: config.clusters.as_ref(),
            transport: config.transport.as_ref(),
        },
        Some(Pipeline::Clusters) => Selection {
            clusters: Some(
                config
                    .clusters
                    .as_ref()
                    .ok_or("the `clusters` pipeline is not configured")?,
            ),
            transport: None,
        },
        Some(Pipeline::Transport) => Selection {
            clusters: None,
            transport: Some(
                config
                    .transport
                    .as_ref()
                    .ok_or("the `transport` pipeline is not configured")?,
            ),
        },
    };
    Ok(selection)
}

fn load_config(path: &Path) -> Result<GeneratorConfig, String> {
    let config = GeneratorConfig::load(path).map_err(|e| e.to_string())?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Prefixes a merge error with the file its offending data came from.
fn describe_merge_error(err: &MergeError, source: Option<&Path>) -> String {
    match source {
        Some(path) => format!("{}: {err}", path.display()),
        None => err.to_string(),
    }
}

fn run_cluster_pipeline(
    config: &ClusterPipelineConfig,
) -> Result<(ZclTables, Fingerprint), String> {
    let loaded = load_zcl_sources(&config.sources).map_err(|e| e.to_string())?;
    let tables = merge_zcl_tables(&loaded.sources, &config.merge_options())
        .map_err(|err| describe_merge_error(&err, config.sources.path_of(err.origin())))?;
    Ok((tables, loaded.fingerprint))
}

fn run_transport_pipeline(
    config: &TransportPipelineConfig,
) -> Result<(TransportTable, Fingerprint), String> {
    let loaded = load_transport_sources(&config.sources).map_err(|e| e.to_string())?;
    let table = merge_transport_table(&loaded.sources)
        .map_err(|err| describe_merge_error(&err, config.sources.path_of(err.origin())))?;
    Ok((table, loaded.fingerprint))
}

/// A rendered file and where it belongs.
struct Output {
    path: PathBuf,
    contents: String,
}

/// Runs every selected pipeline to completion and renders its files.
///
/// Either every selected pipeline succeeds or nothing is returned.
fn render_outputs(selection: &Selection<'_>, format: OutputFormat) -> Result<Vec<Output>, String> {
    let mut outputs = Vec::new();

    if let Some(config) = selection.clusters {
        let (tables, fingerprint) = run_cluster_pipeline(config)?;
        let header = Header::new(GENERATOR, fingerprint.as_str());
        let files = emit_zcl_tables(&tables, format, &header).map_err(|e| e.to_string())?;
        outputs.extend(files.into_iter().map(|file| Output {
            path: config.output_dir.join(file.name),
            contents: file.contents,
        }));
    }

    if let Some(config) = selection.transport {
        let (table, fingerprint) = run_transport_pipeline(config)?;
        let header = Header::new(GENERATOR, fingerprint.as_str());
        let contents = emit_transport_table(&table, format, &header).map_err(|e| e.to_string())?;
        outputs.push(Output {
            path: config.output.clone(),
            contents,
        });
    }

    Ok(outputs)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_generate(config_path: &Path, args: GenerateArgs) -> Result<(), String> {
    let config = load_config(config_path)?;
    let selection = select(&config, args.only)?;
    let format = args.format.unwrap_or(config.format);

    let outputs = render_outputs(&selection, format)?;

    for output in &outputs {
        if let Some(parent) = output.path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("{}: {e}", parent.display()))?;
        }
        fs::write(&output.path, &output.contents)
            .map_err(|e| format!("{}: {e}", output.path.display()))?;
        println!("wrote {}", output.path.display());
    }

    info!(files = outputs.len(), "generation complete");
    Ok(())
}

fn run_check(config_path: &Path, args: CheckArgs) -> Result<(), String> {
    let config = load_config(config_path)?;
    let selection = select(&config, args.only)?;
    let format = args.format.unwrap_or(config.format);

    let outputs = render_outputs(&selection, format)?;

    let mut out_of_date = 0usize;
    for output in &outputs {
        match fs::read_to_string(&output.path) {
            Ok(existing) if existing == output.contents => {
                debug!(path = %output.path.display(), "up to date");
            }
            Ok(_) => {
                println!("stale: {}", output.path.display());
                out_of_date += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                println!("missing: {}", output.path.display());
                out_of_date += 1;
            }
            Err(e) => return Err(format!("{}: {e}", output.path.display())),
        }
    }

    if out_of_date > 0 {
        return Err(format!(
            "{out_of_date} of {} generated file(s) out of date; run `{GENERATOR} generate`",
            outputs.len()
        ));
    }

    println!("{} generated file(s) up to date", outputs.len());
    Ok(())
}

fn run_validate(config_path: &Path, args: ValidateArgs) -> Result<(), String> {
    let config = load_config(config_path)?;
    let selection = select(&config, args.only)?;

    if let Some(clusters) = selection.clusters {
        let (tables, fingerprint) = run_cluster_pipeline(clusters)?;
        println!(
            "clusters: {} clusters, {} foundation commands (inputs sha256:{fingerprint})",
            tables.clusters.clusters.len(),
            tables.foundation.commands.len()
        );
    }

    if let Some(transport) = selection.transport {
        let (table, fingerprint) = run_transport_pipeline(transport)?;
        println!(
            "transport: {} subsystems, {} commands (inputs sha256:{fingerprint})",
            table.subsystems.len(),
            table.command_count()
        );
    }

    Ok(())
}
