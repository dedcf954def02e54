mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use tl_catalog::UnitsCatalog;
use tl_log::{LabelResolver, ParsedDocument, RunTable, parse_log_file, plot_spec, summarize};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "tl-cli")]
#[command(about = "ThermoLog CLI - extract thermo runs from LAMMPS output", long_about = None)]
struct Cli {
    /// Units catalog to use instead of the bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the thermo runs found in one or more log files
    Runs {
        /// LAMMPS stdout or log files
        #[arg(required = true)]
        logs: Vec<PathBuf>,
    },
    /// List the columns of a run with unit-annotated labels
    Columns {
        /// LAMMPS stdout or log file
        log: PathBuf,
        /// Run number (starting at 1)
        run: usize,
    },
    /// Export a run's table
    Export {
        /// LAMMPS stdout or log file
        log: PathBuf,
        /// Run number (starting at 1)
        run: usize,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a plot request (axes, labels, title, points) as JSON
    Plot {
        /// LAMMPS stdout or log file
        log: PathBuf,
        /// Run number (starting at 1)
        run: usize,
        /// Column for the y axis
        y: String,
        /// Column for the x axis (defaults to Time for dynamics runs, Step otherwise)
        #[arg(long)]
        x: Option<String>,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let labels = LabelResolver::new(&catalog);

    match cli.command {
        Commands::Runs { logs } => cmd_runs(&logs),
        Commands::Columns { log, run } => cmd_columns(&log, run, &labels),
        Commands::Export {
            log,
            run,
            format,
            output,
        } => cmd_export(&log, run, format, output.as_deref(), &labels),
        Commands::Plot {
            log,
            run,
            y,
            x,
            output,
        } => cmd_plot(&log, run, &y, x.as_deref(), output.as_deref(), &labels),
    }
}

fn load_catalog(path: Option<&Path>) -> CliResult<UnitsCatalog> {
    match path {
        Some(path) => {
            let catalog = tl_catalog::load_yaml(path)?;
            info!(path = %path.display(), "using units catalog override");
            Ok(catalog)
        }
        None => Ok(UnitsCatalog::bundled()?.clone()),
    }
}

fn cmd_runs(logs: &[PathBuf]) -> CliResult<()> {
    let parsed: Vec<(&PathBuf, tl_log::LogResult<ParsedDocument>)> = logs
        .par_iter()
        .map(|path| (path, parse_log_file(path)))
        .collect();

    let mut first_error = None;
    for (path, result) in parsed {
        println!("{}:", path.display());
        let doc = match result {
            Ok(doc) => {
                info!(
                    path = %path.display(),
                    runs = doc.runs.len(),
                    notices = doc.notices.len(),
                    "parsed log"
                );
                doc
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to parse log");
                println!("  ✗ {}", err);
                first_error.get_or_insert(err);
                continue;
            }
        };

        if doc.runs.is_empty() {
            println!("  No thermo runs found");
        }
        for summary in summarize(&doc.runs) {
            let mut line = format!(
                "  Run {}: {} ({} rows, {} columns)",
                summary.index,
                summary.kind,
                summary.row_count,
                summary.columns.len()
            );
            if let Some(units) = &summary.unit_system {
                line.push_str(&format!("  units={}", units));
            }
            if let Some(dt) = summary.timestep {
                line.push_str(&format!("  dt={}", dt));
            }
            if let Some((first, last)) = summary.step_range {
                line.push_str(&format!("  steps={}..{}", first, last));
            }
            println!("{}", line);
        }
        for notice in &doc.notices {
            println!("  ! {}", notice);
        }
    }

    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn cmd_columns(log: &Path, run: usize, labels: &LabelResolver<'_>) -> CliResult<()> {
    let doc = parse_log_file(log)?;
    let table = doc.runs.run(run)?;

    println!("Run {}/{} ({}):", run, doc.runs.len(), table.run_kind());
    for column in table.columns() {
        println!("  {}", labels.resolve(table, column));
    }
    for notice in &doc.notices {
        println!("  ! {}", notice);
    }
    Ok(())
}

fn cmd_export(
    log: &Path,
    run: usize,
    format: ExportFormat,
    output: Option<&Path>,
    labels: &LabelResolver<'_>,
) -> CliResult<()> {
    let doc = parse_log_file(log)?;
    let table = doc.runs.run(run)?;

    let content = match format {
        ExportFormat::Csv => table_to_csv(table, labels),
        ExportFormat::Json => serde_json::to_string_pretty(table)?,
    };
    write_output(output, &content)?;
    if let Some(path) = output {
        println!(
            "✓ Exported run {} ({} rows) to {}",
            run,
            table.row_count(),
            path.display()
        );
    }
    Ok(())
}

fn cmd_plot(
    log: &Path,
    run: usize,
    y: &str,
    x: Option<&str>,
    output: Option<&Path>,
    labels: &LabelResolver<'_>,
) -> CliResult<()> {
    let doc = parse_log_file(log)?;
    let spec = plot_spec(&doc.runs, run, y, x, labels)?;
    let content = serde_json::to_string_pretty(&spec)?;
    write_output(output, &content)?;
    if let Some(path) = output {
        println!("✓ Wrote plot request '{}' to {}", spec.title, path.display());
    }
    Ok(())
}

fn table_to_csv(table: &RunTable, labels: &LabelResolver<'_>) -> String {
    let header: Vec<String> = table
        .columns()
        .iter()
        .map(|c| csv_field(&labels.resolve(table, c)))
        .collect();

    let mut csv = header.join(",");
    csv.push('\n');
    for row in table.rows() {
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        csv.push_str(&values.join(","));
        csv.push('\n');
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
