mod check;
mod cli;
mod logging;
mod reporter;
mod utils;

use anyhow::{anyhow, bail, Context, Result};
use check::{check_document, write_classification, write_mark_outcome, Confirmation};
use clap::Parser;
use cli::{CheckArgs, Cli, Commands, DocumentArgs, ListArgs};
use colored::*;
use dotenv::dotenv;
use pdf_duper::store::{DocumentStatus, PdfRecord};
use pdf_duper::{AppConfig, DocumentStore, Fingerprint, Fingerprinter, Store};
use reporter::CliReporter;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let Some(command) = args.command else {
        return match cli::write_long_help(&mut io::stdout()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("Error printing help: {}", err);
                ExitCode::FAILURE
            }
        };
    };

    let config = match pdf_duper::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    debug!("database: {}", config.masked_database_url());

    let result = match command {
        Commands::Check(args) => run_check(&config, &args),
        Commands::MarkRead(args) => run_mark_read(&config, &args),
        Commands::Register(args) => run_register(&config, &args),
        Commands::Fingerprint(args) => run_fingerprint(&config, &args.path),
        Commands::List(args) => run_list(&config, &args),
        Commands::InitDb => run_init_db(&config),
        Commands::PrintConfig => {
            print_config(&config);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn open_store(config: &AppConfig) -> Result<Store> {
    let store = Store::connect(config)
        .with_context(|| format!("opening database {}", config.masked_database_url()))?;
    if !store.table_exists()? {
        bail!("No pdf_data table exists in the database; run `pdf-duper init-db` to create it");
    }
    Ok(store)
}

fn fingerprint_document(config: &AppConfig, path: &Path, name: &str) -> Result<Fingerprint> {
    let fingerprinter = Fingerprinter::new(config.fingerprint);
    let reporter = CliReporter::new(name);
    fingerprinter
        .fingerprint_file_with(path, &reporter)
        .with_context(|| format!("fingerprinting {}", path.display()))
}

fn run_check(config: &AppConfig, args: &CheckArgs) -> Result<()> {
    let name = args.document.display_name();
    let store = open_store(config)?;
    let fingerprint = fingerprint_document(config, &args.document.path, &name)?;

    let confirmation = Confirmation::from_flags(args.yes, args.no_prompt);
    let stdin = io::stdin();
    let outcome = check_document(
        &store,
        &fingerprint,
        &name,
        confirmation,
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;
    debug!(
        "check of '{}': {}, marked: {:?}",
        name, outcome.classification, outcome.marked
    );
    Ok(())
}

fn run_mark_read(config: &AppConfig, args: &DocumentArgs) -> Result<()> {
    let name = args.display_name();
    let store = open_store(config)?;
    let fingerprint = fingerprint_document(config, &args.path, &name)?;
    let outcome = pdf_duper::mark_as_read(&store, &fingerprint, &name)?;
    write_mark_outcome(&mut io::stdout(), &name, &outcome)?;
    Ok(())
}

fn run_register(config: &AppConfig, args: &DocumentArgs) -> Result<()> {
    let name = args.display_name();
    let store = open_store(config)?;
    let fingerprint = fingerprint_document(config, &args.path, &name)?;
    if pdf_duper::register(&store, &fingerprint, &name)? {
        println!("{}", format!("'{}' registered as seen", name).green());
    } else {
        let classification = pdf_duper::classify(&store, &fingerprint)?;
        write_classification(&mut io::stdout(), &name, &classification)?;
    }
    Ok(())
}

fn run_fingerprint(config: &AppConfig, path: &Path) -> Result<()> {
    let name = path.to_string_lossy();
    let fingerprint = fingerprint_document(config, path, &name)?;
    println!("{}", fingerprint);
    Ok(())
}

fn run_list(config: &AppConfig, args: &ListArgs) -> Result<()> {
    let store = open_store(config)?;
    let records = store.list_all()?;

    if let Some(path) = &args.csv {
        pdf_duper::export::write_records_to_csv(&records, path, args.with_hash)
            .map_err(|e| anyhow!("writing CSV to {}: {}", path.display(), e))?;
        info!("Wrote {} records to {}", records.len(), path.display());
        return Ok(());
    }

    if records.is_empty() {
        println!("No PDFs have been classified yet.");
        return Ok(());
    }

    print_records(&records, args.with_hash);
    Ok(())
}

fn run_init_db(config: &AppConfig) -> Result<()> {
    let store = Store::connect(config)
        .with_context(|| format!("opening database {}", config.masked_database_url()))?;
    store.create_schema()?;
    println!("pdf_data table ready in {}", config.masked_database_url());
    Ok(())
}

fn print_records(records: &[PdfRecord], with_hash: bool) {
    let name_width = records
        .iter()
        .map(|r| r.file_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("File name".len());

    println!("{}  {}", format!("{:<width$}", "File name", width = name_width).bold(), "Status".bold());
    for record in records {
        let status = record.document_status();
        let padded = format!("{:<6}", status.as_str());
        let status_text = match status {
            DocumentStatus::Read => padded.green(),
            DocumentStatus::Exists => padded.yellow(),
        };
        if with_hash {
            println!(
                "{:<width$}  {}  {}",
                record.file_name,
                status_text,
                record.hash.dimmed(),
                width = name_width
            );
        } else {
            println!("{:<width$}  {}", record.file_name, status_text, width = name_width);
        }
    }
}

fn print_config(config: &AppConfig) {
    println!("Configuration:");
    println!("  database_url:         {}", config.masked_database_url());
    println!("  fingerprint:          {}", config.fingerprint);
    println!("  pool_size:            {}", config.pool_size);
    println!("  connect_timeout_secs: {}", config.connect_timeout_secs);
}
