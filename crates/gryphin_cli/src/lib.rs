//! Command-line interface for Gryphin.
//!
//! # Usage
//!
//! ```bash
//! # Generate a query builder from the schema named in ./.gryphin
//! gryphin generate --root . --output src/api
//!
//! # Summarize an introspection result
//! gryphin inspect schema.json
//! ```

pub mod config;
pub mod error;

pub use config::{discover, Configuration, CONFIG_FILE_NAME};
pub use error::{CliError, CliResult};

use clap::{Parser, Subcommand};
use colored::Colorize;
use gryphin_codegen::CodeGenerator;
use gryphin_schema::{scalars, SkipReason, TypeGraph, TypeKind};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gryphin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a query builder from the schema named in `.gryphin`
    #[command(alias = "gen")]
    Generate {
        /// Directory holding the `.gryphin` configuration
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Directory the generated units are written to
        #[arg(short, long)]
        output: PathBuf,

        /// Configuration file, bypassing discovery in the root directory
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print a summary of an introspection schema
    Inspect {
        /// Introspection JSON file
        schema: PathBuf,
    },

    /// Print version information
    Version,
}

/// What a generate run produced.
#[derive(Debug)]
pub struct GenerateSummary {
    /// The configuration file used.
    pub config: PathBuf,
    /// Written files, in emission order.
    pub written: Vec<PathBuf>,
    /// Scalar overrides that were not applied.
    pub skipped: Vec<(String, SkipReason)>,
    /// Distinct override files still in effect, appended to the aliases unit.
    pub appended: usize,
}

/// Runs a parsed command line and returns the process exit code.
///
/// # Errors
///
/// Returns the error that stopped the command.
pub fn run(cli: Cli) -> CliResult<i32> {
    match cli.command {
        Commands::Generate {
            root,
            output,
            config,
        } => {
            let start = Instant::now();
            let summary = generate(&root, &output, config.as_deref())?;

            for (scalar, reason) in &summary.skipped {
                eprintln!(
                    "{} scalar override `{}` skipped: {}",
                    "Warning:".yellow().bold(),
                    scalar,
                    reason
                );
            }
            if !cli.quiet {
                println!(
                    "{} {}",
                    "Using configuration".blue(),
                    summary.config.display()
                );
                if cli.verbose {
                    for path in &summary.written {
                        println!("  {} {}", "wrote".dimmed(), path.display());
                    }
                }
                println!(
                    "{} {} unit(s) to {}",
                    "Generated".green().bold(),
                    summary.written.len(),
                    output.display()
                );
                println!("Generation time: {:.3} sec", start.elapsed().as_secs_f64());
            }
            Ok(0)
        }
        Commands::Inspect { schema } => {
            let graph = load_schema(&schema)?;
            print!("{}", inspect(&graph));
            Ok(0)
        }
        Commands::Version => {
            println!("gryphin {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

/// Runs the whole pipeline: discover, load, ingest, merge, emit, append
/// override files, write.
///
/// Paths in the configuration resolve against its directory. Nothing is
/// written unless every earlier step succeeds.
///
/// # Errors
///
/// Fails on configuration, schema, override-file and write errors.
pub fn generate(root: &Path, output: &Path, config: Option<&Path>) -> CliResult<GenerateSummary> {
    let config_path = match config {
        Some(path) => path.to_path_buf(),
        None => discover(root)?,
    };
    info!(path = %config_path.display(), "using configuration");

    let configuration = Configuration::load(&config_path)?;
    let base = config_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let mut graph = load_schema(&configuration.schema_path(&base)?)?;
    let overrides = configuration.scalar_overrides(&base)?;
    let report = scalars::merge(&overrides, &mut graph);

    let mut generated =
        CodeGenerator::with_options(&graph, configuration.codegen_options()).generate();
    let loader = |path: &Path| {
        std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })
    };
    let appended = generated.append_file_overrides(&graph, &overrides, &loader)?;

    std::fs::create_dir_all(output).map_err(|source| CliError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(generated.units().len());
    for unit in generated.units() {
        let path = output.join(&unit.relative_path);
        std::fs::write(&path, &unit.content).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    info!(units = written.len(), output = %output.display(), "schema generated");

    Ok(GenerateSummary {
        config: config_path,
        written,
        skipped: report.skipped,
        appended,
    })
}

/// Reads and ingests an introspection file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not a valid schema.
pub fn load_schema(path: &Path) -> CliResult<TypeGraph> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(gryphin_schema::ingest(&text)?)
}

/// Renders the per-kind type counts and root types of a graph.
#[must_use]
pub fn inspect(graph: &TypeGraph) -> String {
    const KINDS: [TypeKind; 6] = [
        TypeKind::Object,
        TypeKind::Interface,
        TypeKind::Union,
        TypeKind::Enum,
        TypeKind::InputObject,
        TypeKind::Scalar,
    ];

    let mut out = format!("{} {}\n", "Types:".bold(), graph.len());
    for kind in KINDS {
        let count = graph.iter().filter(|(_, ty)| ty.kind() == kind).count();
        if count > 0 {
            out.push_str(&format!("  {:<14}{count}\n", kind.as_str()));
        }
    }

    let roots = graph.roots();
    for (label, root) in [
        ("query", roots.query),
        ("mutation", roots.mutation),
        ("subscription", roots.subscription),
    ] {
        if let Some(id) = root {
            let label = format!("{label}:");
            out.push_str(&format!("{} {}\n", label.as_str().bold(), graph.name_of(id)));
        }
    }
    out
}
