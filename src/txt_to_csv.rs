use clap::Parser;
use std::io;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overtone_tools::config;
use overtone_tools::convert::{self, ConvertConfig, ConvertError};

/// Convert an overtone tracker dump on stdin to CSV on stdout
#[derive(Parser)]
#[command(name = "txt_to_csv", author, version, about, long_about = None)]
struct Args {
    /// Line prefix that starts the record section (default from config.toml)
    #[arg(long)]
    marker: Option<String>,

    /// Emit only harmonic, tracknum, f, amp and newflag, ready for hpivot
    #[arg(short, long)]
    pivot_columns: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = config::load_config()?.convert;

    let config = ConvertConfig {
        marker: args.marker.unwrap_or(settings.marker),
        select_pivot_columns: args.pivot_columns,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    convert::convert(stdin.lock(), stdout.lock(), &config)?;

    Ok(())
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("\nERROR: {}\n", err);
        if let Some(ConvertError::MarkerNotFound(_)) = err.downcast_ref::<ConvertError>() {
            eprintln!("Is this a tracker dump? Use --marker if the section line differs.");
        }
        process::exit(1);
    }
}
