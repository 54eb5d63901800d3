mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use config::{FlowfixConfig, discover_config, load_config};
use flowfix_catalog::{PortTemplateCatalog, SchemaCatalog};
use flowfix_core::{
    FsWriter, ResolutionArtifacts, ResolveError, ResolveOutcome, ResolveSettings, WritePort,
    input_fingerprint, report_from_failure, report_from_outcome, resolve,
    write_resolution_artifacts,
};
use flowfix_types::blueprint::Blueprint;
use flowfix_types::report::{InputInfo, ToolInfo};
use flowfix_types::wire::{DocumentFormat, parse_blueprint, render_blueprint};
use fs_err as fs;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "flowfix",
    version,
    about = "Validating, self-healing resolver for declarative dataflow blueprints."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate and heal a blueprint without writing anything.
    Check(CheckArgs),
    /// Resolve a blueprint and write the healed document plus artifacts.
    Resolve(ResolveArgs),
    /// Explain a violation category, its healability, and remediation.
    Explain(ExplainArgs),
    /// List the healing transforms in their application order.
    ListHeals(ListHealsArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Blueprint document (YAML or JSON).
    input: Utf8PathBuf,

    /// Validation attempts before the loop gives up.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Config file (default: flowfix.toml next to the input).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ResolveArgs {
    /// Blueprint document (YAML or JSON).
    input: Utf8PathBuf,

    /// Output directory for artifacts (default: <input_dir>/flowfix-out).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Validation attempts before the loop gives up.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Config file (default: flowfix.toml next to the input).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Violation category, e.g. "binding.missing".
    category: String,
}

#[derive(Debug, Parser)]
struct ListHealsArgs {
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Resolve(args) => cmd_resolve(args),
        Command::Explain(args) => cmd_explain(args),
        Command::ListHeals(args) => cmd_list_heals(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "flowfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        commit: None,
    }
}

struct LoadedInput {
    contents: String,
    format: DocumentFormat,
    blueprint: Blueprint,
    settings: ResolveSettings,
    config: FlowfixConfig,
}

fn load_input(
    input: &Utf8Path,
    config_path: Option<&Utf8Path>,
    max_attempts: Option<u32>,
) -> anyhow::Result<LoadedInput> {
    let contents = fs::read_to_string(input).with_context(|| format!("read {}", input))?;
    let format = DocumentFormat::from_extension(input.extension());

    let blueprint = parse_blueprint(&contents, format)
        .with_context(|| format!("parse blueprint {}", input))?;

    let input_dir = input.parent().unwrap_or(Utf8Path::new("."));
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => match discover_config(input_dir) {
            Some(path) => load_config(&path)?,
            None => FlowfixConfig::default(),
        },
    };
    let settings = config.settings(max_attempts);

    Ok(LoadedInput {
        contents,
        format,
        blueprint,
        settings,
        config,
    })
}

fn run_resolution(
    loaded: LoadedInput,
) -> Result<(ResolveOutcome, LoadedInput), (ResolveError, LoadedInput)> {
    let schemas = SchemaCatalog::builtin();
    let templates = PortTemplateCatalog::builtin();
    let blueprint = loaded.blueprint.clone();
    match resolve(blueprint, &schemas, &templates, &loaded.settings) {
        Ok(outcome) => Ok((outcome, loaded)),
        Err(err) => Err((err, loaded)),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let loaded = load_input(&args.input, args.config.as_deref(), args.max_attempts)?;
    match run_resolution(loaded) {
        Ok((outcome, _)) => {
            println!(
                "Blueprint validated in {} attempt(s) with {} healing operation(s)",
                outcome.attempts,
                outcome.operations.len()
            );
            for op in &outcome.operations {
                println!("  {}", op.log_line());
            }
            for delta in &outcome.role_deltas {
                println!("  note: {}", delta);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err((err, _)) => {
            eprintln!("{}", err);
            Ok(ExitCode::from(2))
        }
    }
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<ExitCode> {
    let loaded = load_input(&args.input, args.config.as_deref(), args.max_attempts)?;
    let input_dir = args.input.parent().unwrap_or(Utf8Path::new("."));
    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| loaded.config.output.out_dir.clone())
        .unwrap_or_else(|| input_dir.join("flowfix-out"));

    let input_info = InputInfo {
        path: args.input.to_string(),
        sha256: input_fingerprint(loaded.contents.as_bytes()),
    };

    match run_resolution(loaded) {
        Ok((outcome, loaded)) => {
            let healed_document = render_blueprint(&outcome.blueprint, loaded.format)
                .context("render healed blueprint")?;
            let patch = diffy::create_patch(&loaded.contents, &healed_document).to_string();

            let mut report = report_from_outcome(&outcome, tool_info());
            report.input = Some(input_info);

            let healed_file_name = match loaded.format {
                DocumentFormat::Yaml => "healed.yaml".to_string(),
                DocumentFormat::Json => "healed.json".to_string(),
            };
            let artifacts = ResolutionArtifacts {
                healed_file_name,
                healed_document,
                report,
                patch,
            };
            write_resolution_artifacts(&artifacts, &out_dir, &FsWriter)
                .context("write artifacts")?;

            info!(out_dir = %out_dir, attempts = outcome.attempts, "blueprint resolved");
            println!(
                "Resolved {} in {} attempt(s); artifacts in {}",
                args.input, outcome.attempts, out_dir
            );
            Ok(ExitCode::SUCCESS)
        }
        Err((err, _)) => {
            // Failures still leave a report behind for operators.
            let mut report = report_from_failure(&err, tool_info());
            report.input = Some(input_info);
            let report_wire = flowfix_types::wire::ReportV1::from(&report);
            let report_json =
                serde_json::to_string_pretty(&report_wire).context("serialize report")?;
            let writer = FsWriter;
            writer.create_dir_all(&out_dir)?;
            writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;
            debug!(out_dir = %out_dir, "failure report written");

            eprintln!("{}", err);
            Ok(ExitCode::from(2))
        }
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<ExitCode> {
    let Some(info) = explain::lookup_category(&args.category) else {
        let available = explain::list_category_keys().join(", ");
        anyhow::bail!(
            "Unknown violation category: '{}'\n\nAvailable categories: {}",
            args.category,
            available
        );
    };

    println!("CATEGORY: {}", info.category);
    println!(
        "Healable: {}",
        if info.healable { "yes" } else { "no (fatal)" }
    );
    println!();
    println!("{}", info.description);
    println!();
    println!("REMEDIATION");
    println!("{}", info.remediation);
    Ok(ExitCode::SUCCESS)
}

fn cmd_list_heals(args: ListHealsArgs) -> anyhow::Result<ExitCode> {
    match args.format {
        OutputFormat::Text => {
            println!("Healing transforms (application order):\n");
            for heal in explain::HEAL_REGISTRY {
                println!("  {:<26} {}", heal.id, heal.title);
                println!("  {:<26} heals: {}", "", heal.heals);
            }
            println!();
            println!("Use 'flowfix explain <category>' for category details.");
        }
        OutputFormat::Json => {
            let heals: Vec<_> = explain::HEAL_REGISTRY
                .iter()
                .map(|h| {
                    serde_json::json!({
                        "id": h.id,
                        "title": h.title,
                        "heals": h.heals,
                        "description": h.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&heals)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
