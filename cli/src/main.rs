#![deny(missing_docs)]

//! # Swagger Gen CLI
//!
//! Command Line Interface for generating Swagger 2.0 documents.
//!
//! Supported Commands:
//! - `generate`: API description (JSON/YAML) -> Swagger document (JSON/YAML).

use clap::{ArgAction, Parser, Subcommand};
use swagger_gen_core::AppResult;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Swagger 2.0 document generator")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a Swagger document from a serialized API description.
    Generate(generate::GenerateArgs),
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,swagger_gen_core=debug,swagger_gen=debug".to_string(),
            _ => "debug,swagger_gen_core=trace,swagger_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}
