use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overtone_tools::config;
use overtone_tools::pivot::{self, PivotConfig, PivotError};

/// Transform overtones CSV into columns of harmonics
#[derive(Parser)]
#[command(name = "hpivot", author, version, about, long_about = None)]
struct Args {
    /// Input CSV with harmonic, track, frequency, amplitude and flag columns
    #[arg(short = 'i', long = "inFile", value_name = "FILE")]
    in_file: Option<PathBuf>,

    /// Number of harmonics that get their own column
    #[arg(short = 'm', long = "maxHarmonic", value_parser = parse_max_harmonic)]
    max_harmonic: Option<usize>,

    /// Output CSV (default: input name with 'oout' replaced by 'hpivot')
    #[arg(short = 'o', long = "outFile", value_name = "FILE")]
    out_file: Option<PathBuf>,
}

fn parse_max_harmonic(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = config::load_config()?.pivot;

    let config = PivotConfig {
        in_file: args.in_file.unwrap_or(settings.in_file),
        out_file: args.out_file,
        max_harmonic: args.max_harmonic.unwrap_or(settings.max_harmonic),
    };

    let summary = pivot::run(&config)?;
    if summary.dropped_rows > 0 {
        eprintln!(
            "Warning: {} rows after the last complete set were ignored",
            summary.dropped_rows
        );
    }
    println!(
        "Wrote {} sets to {}",
        summary.sets_written,
        summary.out_file.display()
    );

    Ok(())
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("\nERROR: {}\n", err);
        match err.downcast_ref::<PivotError>() {
            Some(PivotError::InputNotFound(_)) => {
                eprintln!("Please check that:");
                eprintln!("1. The file path is correct");
                eprintln!("2. The file exists");
                eprintln!("3. You have permission to read the file");
            }
            Some(PivotError::OutputCollision(_)) => {
                eprintln!("Name the input '*oout*' or choose an output with --outFile");
            }
            Some(PivotError::EmptyInput) => {
                eprintln!("The pivot expects rows of: harmonic,track,freq,amp,newflag");
            }
            _ => {}
        }
        process::exit(1);
    }
}
