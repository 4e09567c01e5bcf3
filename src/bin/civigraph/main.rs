//! civigraph CLI tool
//!
//! Command-line tooling around the chart core: source-data validation,
//! dataset compilation, and a live-reload viewer server.
//!
//! ## Commands
//!
//! - `validate <path>`: data-quality report (dangling references, duplicate
//!   ids, duplicate edges, structural cycles). Exits non-zero on hard
//!   defects; cycles alone are warnings, since the hierarchy builder
//!   resolves them.
//! - `build <path> -o <output>`: compile the CSV pair (plus optional
//!   `roster.toml`) into the `dataset.json` the browser viewer fetches.
//! - `serve <path>` (requires the `service` feature): static file server
//!   with live reload for viewer development.
//!
//! `<path>` may be the data directory itself or any ancestor; the first
//! directory found containing an `*entities*.csv` file is used.

use clap::{Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use walkdir::WalkDir;

#[cfg(feature = "service")]
mod dev_server;

use civigraph::{
    codec::{load_dir, Dataset},
    store::{IntegrityReport, OrgStore},
};

#[derive(Parser)]
#[command(name = "civigraph")]
#[command(author, version, about = "Organizational chart data tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check source data quality and report defects
    Validate {
        /// Data directory (or any ancestor of it)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// List every dropped edge and duplicate, not just counts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compile the CSV pair into the dataset the viewer fetches
    Build {
        /// Data directory (or any ancestor of it)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output path for the compiled dataset
        #[arg(short, long, default_value = "dataset.json")]
        output: PathBuf,
    },

    /// Serve a viewer directory with live reload
    #[cfg(feature = "service")]
    Serve {
        /// Directory containing the viewer assets and dataset
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Port to bind
        #[arg(short, long, default_value_t = 8012)]
        port: u16,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { path, verbose } => run_validate(&path, verbose),
        Commands::Build { path, output } => run_build(&path, &output),
        #[cfg(feature = "service")]
        Commands::Serve { path, port } => run_serve(path, port),
    }
}

/// Locate the data directory: the first directory at or below `root`
/// containing an `*entities*.csv` file. Walk order is sorted for a
/// deterministic pick.
fn find_data_dir(root: &Path) -> Option<PathBuf> {
    WalkDir::new(root)
        .max_depth(4)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some("csv")
                && entry.file_name().to_string_lossy().contains("entities")
        })
        .and_then(|entry| entry.path().parent().map(Path::to_path_buf))
}

fn load_store(root: &Path) -> Result<(OrgStore, PathBuf), String> {
    let data_dir = find_data_dir(root)
        .ok_or_else(|| format!("no *entities*.csv found under {}", root.display()))?;
    let (mut entities, relationships, roster) =
        load_dir(&data_dir).map_err(|err| err.to_string())?;
    if let Some(roster) = roster {
        for entity in &mut entities {
            roster.apply(entity);
        }
    }
    Ok((OrgStore::new(entities, relationships), data_dir))
}

fn print_report(report: &IntegrityReport, verbose: bool) {
    println!(
        "{} entities, {} relationships",
        report.entity_count, report.relationship_count
    );

    if report.gaps.is_empty() {
        println!("✅ all relationship endpoints resolve");
    } else {
        println!("❌ {} relationships reference unknown entities", report.gaps.len());
        if verbose {
            for gap in &report.gaps {
                println!("   {}: unknown entity {}", gap.relationship_id, gap.missing);
            }
        }
    }

    for (label, ids) in [
        ("duplicate entity ids", report.duplicate_entity_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>()),
        ("duplicate relationship ids", report.duplicate_relationship_ids.clone()),
        ("duplicate edges", report.duplicate_edges.clone()),
    ] {
        if ids.is_empty() {
            println!("✅ no {label}");
        } else {
            println!("❌ {} {label}", ids.len());
            if verbose {
                for id in ids {
                    println!("   {id}");
                }
            }
        }
    }

    if report.structural_cycles.is_empty() {
        println!("✅ no structural cycles");
    } else {
        println!(
            "⚠️  {} structural cycle(s); the hierarchy builder will cut them",
            report.structural_cycles.len()
        );
        for cycle in &report.structural_cycles {
            let ids: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            println!("   {}", ids.join(" -> "));
        }
    }
}

fn run_validate(root: &Path, verbose: bool) -> ExitCode {
    let (store, data_dir) = match load_store(root) {
        Ok(loaded) => loaded,
        Err(message) => {
            eprintln!("❌ {message}");
            return ExitCode::FAILURE;
        }
    };
    println!("Validating {}", data_dir.display());

    let report = store.integrity_report();
    print_report(&report, verbose);

    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_build(root: &Path, output: &Path) -> ExitCode {
    let data_dir = match find_data_dir(root) {
        Some(dir) => dir,
        None => {
            eprintln!("❌ no *entities*.csv found under {}", root.display());
            return ExitCode::FAILURE;
        }
    };
    let compiled = load_dir(&data_dir).and_then(|(entities, relationships, roster)| {
        let dataset = Dataset::compile(entities, relationships, roster.as_ref());
        let json = dataset.to_json()?;
        std::fs::write(output, json)?;
        Ok(dataset)
    });
    match compiled {
        Ok(dataset) => {
            println!(
                "📦 wrote {} ({} entities, {} relationships)",
                output.display(),
                dataset.entities.len(),
                dataset.relationships.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("❌ build failed: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "service")]
fn run_serve(path: PathBuf, port: u16) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("❌ failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    let server = dev_server::ViewerServer::new(path, port);
    match runtime.block_on(server.serve()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ server error: {err}");
            ExitCode::FAILURE
        }
    }
}
