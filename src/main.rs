mod db;
mod error;
mod parser;
mod settings;
mod source;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use parser::{Outcome, ParseOptions};
use settings::Settings;

#[derive(Parser)]
#[command(name = "planning_update", about = "Extract projects from monthly Planning Division Update reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one report and print its projects
    Parse {
        /// Report file (PDF, or text with form feeds between pages)
        file: PathBuf,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse reports and store their projects in the database
    Load {
        /// A report file or a directory of reports
        path: PathBuf,
        /// Max reports to load (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Projects stored per month
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Parse { file, json } => {
            let report = match parser::parse_document(&file, settings.parse_options()) {
                Outcome::Parsed(report) => report,
                Outcome::Failed { document, cause } => bail!("PARSEFAIL for {}: {}", document, cause),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for project in &report.projects {
                    println!(" PROJ  {} {}", project.title, project.ordinal);
                }
            }
            Ok(())
        }
        Commands::Load { path, limit } => {
            let files = report_files(&path, limit)?;
            if files.is_empty() {
                println!("No reports found at {}.", path.display());
                return Ok(());
            }
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            println!("Loading {} reports into {}...", files.len(), settings.db_path.display());
            let counts = load_reports(&conn, &files, settings.parse_options())?;
            counts.print();
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::month_counts(&conn)?;
            if rows.is_empty() {
                println!("No projects stored. Run 'load' first.");
                return Ok(());
            }
            println!("{:<7} | {:>8}", "Month", "Projects");
            println!("{}", "-".repeat(18));
            for r in &rows {
                println!("{:>4}-{:02} | {:>8}", r.year, r.month, r.projects);
            }
            let total: usize = rows.iter().map(|r| r.projects).sum();
            println!("\n{} projects across {} months", total, rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// `path` itself, or the reports directly inside it in name order.
fn report_files(path: &Path, limit: Option<usize>) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = fs::read_dir(path)
        .with_context(|| format!("Failed to read {:?}", path))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    files.retain(|p| p.is_file() && source::is_report_file(p));
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    Ok(files)
}

#[derive(Default)]
struct LoadCounts {
    reports: usize,
    projects: usize,
    diagnostics: usize,
    failed: Vec<String>,
}

impl LoadCounts {
    fn print(&self) {
        println!(
            "Loaded {} projects from {} reports ({} diagnostics).",
            self.projects, self.reports, self.diagnostics
        );
        if !self.failed.is_empty() {
            println!("{} reports failed:", self.failed.len());
            for document in &self.failed {
                println!("  {}", document);
            }
        }
    }
}

/// Reports are parsed in parallel, each with its own parse state, then
/// stored one at a time. A failing report is recorded and skipped.
fn load_reports(
    conn: &rusqlite::Connection,
    files: &[PathBuf],
    options: ParseOptions,
) -> anyhow::Result<LoadCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = LoadCounts::default();
    for chunk in files.chunks(32) {
        let outcomes: Vec<Outcome> = chunk
            .par_iter()
            .map(|file| parser::parse_document(file, options))
            .collect();

        for outcome in outcomes {
            match outcome {
                Outcome::Parsed(report) => match db::save_report(conn, &report) {
                    Ok(stored) => {
                        counts.reports += 1;
                        counts.projects += stored;
                        counts.diagnostics += report.diagnostics.len();
                    }
                    Err(e) => {
                        warn!(document = %report.document, error = %format!("{e:#}"), "DBFAIL");
                        counts.failed.push(report.document);
                    }
                },
                // already logged with its cause by the parser
                Outcome::Failed { document, .. } => counts.failed.push(document),
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}
