use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::generator::{
    generate_from_schema_file, load_graph, plan, GenerateOptions, GraphSummary, TracingObserver,
    DEFAULT_EXTENSION,
};
use crate::logging::{LogConfig, LogFormat};
use crate::runtime_config::RuntimeConfig;

/// Command-line interface for kubegen
///
/// Generates value objects, client traits and enums from a schema document.
#[derive(Parser, Debug)]
#[command(name = "kubegen")]
#[command(about = "Schema-driven source generator", long_about = None, version)]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error (overrides KUBEGEN_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: pretty or json (overrides KUBEGEN_LOG_FORMAT)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Logging configuration from the environment, with command-line overrides applied.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig::from_env();
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = LogFormat::parse(format);
        }
        config
    }
}

/// Available kubegen commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one source file per definition; existing files are never overwritten
    Generate {
        /// Path to the schema document (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Root directory of the generated tree
        #[arg(short, long)]
        output: PathBuf,

        /// Directory of template overrides (default: KUBEGEN_TEMPLATES)
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Worker threads (default: KUBEGEN_JOBS, else 1)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Extension of generated files
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Do not write a mod.rs index per namespace directory
        #[arg(long, default_value_t = false)]
        no_module_index: bool,
    },
    /// Resolve the schema and report what it defines, without writing anything
    Validate {
        /// Path to the schema document (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,
    },
    /// Print the file each definition maps to, without writing anything
    Plan {
        /// Path to the schema document (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Extension of generated files
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Do not write a mod.rs index per namespace directory
        #[arg(long, default_value_t = false)]
        no_module_index: bool,

        /// Print the plan as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Any load, resolution or generation failure, with context naming the schema.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    run_with_config(cli, &RuntimeConfig::from_env())
}

pub(crate) fn run_with_config(cli: Cli, config: &RuntimeConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            schema,
            output,
            templates,
            jobs,
            extension,
            no_module_index,
        } => {
            let templates = templates.or_else(|| config.templates.clone());
            let options = GenerateOptions {
                jobs: jobs.filter(|&j| j > 0).unwrap_or(config.jobs),
                extension,
                module_index: !no_module_index,
            };
            let report = generate_from_schema_file(
                &schema,
                &output,
                templates.as_deref(),
                &options,
                &TracingObserver,
            )
            .with_context(|| format!("generation from {} failed", schema.display()))?;
            println!(
                "{} file(s) written, {} skipped under {}",
                report.written.len(),
                report.skipped.len(),
                output.display()
            );
            Ok(())
        }
        Commands::Validate { schema } => {
            let summary = GraphSummary::of(&resolve_schema(&schema)?);
            println!(
                "{}: {} definition(s) ({} value object(s), {} client interface(s), {} enum constant(s))",
                schema.display(),
                summary.total(),
                summary.value_objects,
                summary.client_interfaces,
                summary.enum_constants
            );
            Ok(())
        }
        Commands::Plan {
            schema,
            extension,
            no_module_index,
            json,
        } => {
            let options = GenerateOptions {
                extension,
                module_index: !no_module_index,
                ..GenerateOptions::default()
            };
            let planned = plan(&resolve_schema(&schema)?, &options);
            if json {
                println!("{}", serde_json::to_string_pretty(&planned)?);
            } else {
                for entry in &planned {
                    println!(
                        "{}\t{}\t{}",
                        entry.path.display(),
                        entry.kind,
                        entry.template
                    );
                }
            }
            Ok(())
        }
    }
}

fn resolve_schema(schema: &Path) -> anyhow::Result<crate::schema::SchemaGraph> {
    load_graph(schema).with_context(|| format!("invalid schema {}", schema.display()))
}
