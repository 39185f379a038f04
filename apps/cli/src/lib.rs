pub mod cli;
pub mod commands;
pub mod config;
pub mod state;
pub mod store;

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::commands::{DirectoryImport, ExamSession, ImportResult, ImportStatus};
use crate::config::Config;
use crate::state::AppState;
use exam_core::ParseReport;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.data_dir);
    tracing::debug!("Using configuration {:?}", config);
    let state = AppState::new(config).context("failed to open question bank store")?;

    match cli.command {
        Commands::Import { dir, force } => {
            let dir = dir.unwrap_or_else(|| state.config.exams_dir.clone());
            let result = commands::import_directory(&dir, &state.repository, force)
                .with_context(|| format!("failed to import from {}", dir.display()))?;
            print_directory_import(&result);
        }
        Commands::Parse { file, save } => {
            if save {
                let result = commands::import_file(&file, &state.repository, true)
                    .with_context(|| format!("failed to import {}", file.display()))?;
                print_import(&result);
            } else {
                let report = commands::parse_file(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                print_report(&file, &report);
                report.into_collection()?;
            }
        }
        Commands::List => {
            let banks = commands::list_banks(&state.repository)?;
            if banks.is_empty() {
                println!("No question banks found.");
            }
            for bank in banks {
                println!(
                    "{:<24} {:>5} questions  imported {}  from {}",
                    bank.name,
                    bank.question_count,
                    bank.imported_at.format("%Y-%m-%d %H:%M"),
                    bank.source_file
                );
            }
        }
        Commands::Remove { bank } => {
            commands::remove_bank(&bank, &state.repository)?;
            println!("Removed {bank}");
        }
        Commands::Exam { bank, count } => {
            let stdin = io::stdin();
            let mut session = ExamSession::new(stdin.lock(), io::stdout());
            println!("Welcome to the CLI Exam!");
            commands::start_exam(
                &state,
                bank.as_deref(),
                count,
                &mut session,
                &mut rand::thread_rng(),
            )?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so they never interleave with exam prompts
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn print_report(file: &Path, report: &ParseReport) {
    println!(
        "{}: {} blocks found, {} validated, {} rejected",
        file.display(),
        report.blocks_found,
        report.valid_count(),
        report.anomalies.len()
    );
    for anomaly in &report.anomalies {
        println!("  {anomaly}");
    }
}

fn print_import(result: &ImportResult) {
    match result.status {
        ImportStatus::Saved => println!(
            "{}: saved {} questions to bank '{}' ({} blocks, {} rejected)",
            result.source_file,
            result.imported,
            result.bank,
            result.blocks_found,
            result.anomalies.len()
        ),
        ImportStatus::Unchanged => println!(
            "{}: unchanged, bank '{}' has {} questions",
            result.source_file, result.bank, result.imported
        ),
        ImportStatus::NoQuestions => println!(
            "{}: no usable questions in {} blocks, nothing saved",
            result.source_file, result.blocks_found
        ),
    }
    if result.stale_removed {
        println!("  removed stale bank '{}'", result.bank);
    }
    for anomaly in &result.anomalies {
        println!("  {anomaly}");
    }
}

fn print_directory_import(result: &DirectoryImport) {
    for file in &result.files {
        print_import(file);
    }
    for (path, error) in &result.failures {
        println!("{path}: failed ({error})");
    }
    println!(
        "Imported {} questions from {} files",
        result.imported(),
        result.files.len()
    );
}
