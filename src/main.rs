mod db;
mod department;
mod error;
mod output;
mod regulator;
mod settings;
mod sheet;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use department::{Department, DepartmentRange};
use regulator::table::{collect_regulators, parse_departments, DepartmentTable};
use settings::Settings;
use sheet::xlsx::XlsxDocument;
use sheet::Document;

#[derive(Parser)]
#[command(name = "regulators", about = "Extract regulators from the paginated regulators workbook")]
struct Cli {
    /// Settings file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    /// Increase logging verbosity
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild regulators for the configured departments and save them as JSON
    Parse {
        /// The xlsx input file
        input: PathBuf,
        /// Output JSON file (default from settings: regulators.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also store the run in this SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
        /// Restrict to these departments (repeatable, e.g. --only health)
        #[arg(long)]
        only: Vec<Department>,
    },
    /// List the workbook's page sheets and configured pages it lacks
    Pages {
        /// The xlsx input file
        input: PathBuf,
    },
    /// Show the department page-range table in effect
    Departments,
    /// Show per-department counts of the latest stored run
    Stats {
        /// SQLite database written by `parse --db`
        db: PathBuf,
    },
}

fn init_tracing(verbose: bool, log_path: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.verbose {
        settings.verbose = true;
    }
    if cli.log_path.is_some() {
        settings.log_path = cli.log_path;
    }
    init_tracing(settings.verbose, settings.log_path.as_deref())?;

    let t0 = Instant::now();

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            db: db_path,
            only,
        } => {
            let output = output.unwrap_or_else(|| settings.output_file.clone());
            let ranges: Vec<DepartmentRange> = settings
                .departments
                .iter()
                .filter(|r| only.is_empty() || only.contains(&r.department))
                .copied()
                .collect();
            if ranges.is_empty() {
                println!("No configured department matches --only.");
                return Ok(());
            }

            let mut doc = XlsxDocument::open(&input)?;
            info!("Parsing {} departments from {:?}", ranges.len(), input);

            let pb = ProgressBar::new(ranges.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            let tables = parse_departments(&mut doc, &ranges, settings.malformed_rows, |t| {
                pb.set_message(t.department.to_string());
                pb.inc(1);
            })
            .with_context(|| format!("Failed to parse {:?}", input))?;
            pb.finish_and_clear();

            print_summary(&tables);
            let regulators = collect_regulators(tables);

            info!("Saving regulators to: {:?}", output);
            output::save_json(&output, &regulators)?;
            println!("Saved {} regulators to {:?}", regulators.len(), output);

            if let Some(path) = db_path {
                let conn = db::connect(&path)?;
                db::init_schema(&conn)?;
                let run_id = db::new_run_id();
                db::save_run(&conn, &run_id, &input.to_string_lossy(), &regulators)?;
                println!("Stored {} in {:?}", run_id, path);
            }
            Ok(())
        }
        Commands::Pages { input } => {
            let doc = XlsxDocument::open(&input)?;
            let pages = doc.page_numbers();
            println!("{} page sheets in {:?}", pages.len(), input);

            let mut complete = true;
            for range in &settings.departments {
                let missing: Vec<u32> = range.pages().filter(|p| !pages.contains(p)).collect();
                if !missing.is_empty() {
                    complete = false;
                    println!("  {:<16} missing pages {:?}", range.department, missing);
                }
            }
            if complete {
                println!("All configured department pages are present.");
            }
            Ok(())
        }
        Commands::Departments => {
            println!("{:>4} | {:<16} | {:<7}", "Code", "Department", "Pages");
            println!("{}", "-".repeat(33));
            for range in &settings.departments {
                let pages = if range.start_page == range.end_page {
                    range.start_page.to_string()
                } else {
                    format!("{}-{}", range.start_page, range.end_page)
                };
                println!(
                    "{:>4} | {:<16} | {:<7}",
                    range.department.code(),
                    range.department,
                    pages
                );
            }
            Ok(())
        }
        Commands::Stats { db: db_path } => {
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Runs:       {}", s.runs);
            match s.latest_run {
                Some(run_id) => {
                    println!("Latest run: {}", run_id);
                    for c in &s.departments {
                        let name = Department::from_code(c.department)
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| format!("code {}", c.department));
                        println!("  {:<16} {:>5}", name, c.regulators);
                    }
                }
                None => println!("No runs stored yet."),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_summary(tables: &[DepartmentTable]) {
    println!(
        "{:<16} | {:>5} | {:>4} | {:>7} | {:>9} | {:>7}",
        "Department", "Found", "Gaps", "Missing", "Malformed", "Orphans"
    );
    println!("{}", "-".repeat(64));
    for t in tables {
        let missing: u32 = t.gaps.iter().map(|g| g.missing()).sum();
        println!(
            "{:<16} | {:>5} | {:>4} | {:>7} | {:>9} | {:>7}",
            t.department,
            t.regulators.len(),
            t.gaps.len(),
            missing,
            t.malformed.len(),
            t.orphans.len()
        );
    }

    // Locations of rows that did not make it into any record
    for t in tables {
        let dropped: Vec<String> = t
            .malformed
            .iter()
            .chain(&t.orphans)
            .map(|r| format!("{}:{}", r.page, r.row))
            .collect();
        if !dropped.is_empty() {
            println!("  {} dropped rows (page:row): {}", t.department, dropped.join(", "));
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
