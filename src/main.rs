//! ipd-split
//!
//! Splits an IPD backup archive into a JSON list of databases and records.

use clap::Parser;
use ipd_stream::{DecodeOptions, LocalArchiveFile};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ipd-split")]
#[command(about = "Split an IPD backup archive into a JSON list of databases and records")]
struct Args {
    /// Input IPD file
    in_file: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Only keep records of this database (repeatable)
    #[arg(short = 'd', long = "database", value_name = "NAME")]
    databases: Vec<String>,

    /// Stop after this many records
    #[arg(long, value_name = "N")]
    max_records: Option<usize>,
}

fn error(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("{}", message);
    ExitCode::from(1)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if !args.in_file.exists() {
        return error("input file does not exist");
    }

    let file = match LocalArchiveFile::new(&args.in_file) {
        Ok(file) => file,
        Err(e) => return error(e),
    };

    let filter: Option<Box<dyn Fn(&str) -> bool + Send + Sync>> = if args.databases.is_empty() {
        None
    } else {
        let wanted = args.databases;
        Some(Box::new(move |name: &str| wanted.iter().any(|w| w == name)))
    };
    let options = DecodeOptions {
        filter,
        max_records: args.max_records,
    };

    let decoded = match file.decode_sync(options) {
        Ok(decoded) => decoded,
        Err(e) => return error(e),
    };

    info!(
        databases = decoded.archive.len(),
        records = decoded.archive.record_count(),
        end = ?decoded.end,
        "decoded {}",
        file.name()
    );

    let json = if args.pretty {
        decoded.archive.to_json_pretty()
    } else {
        decoded.archive.to_json()
    };

    match json {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => error(e),
    }
}
