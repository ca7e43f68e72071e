//! lhadec CLI - decode raw LZH/LHA payloads
//!
//! Works on a payload already cut out of an archive: the caller supplies
//! the method signature and the declared original size from the header.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{cmd_decode, cmd_methods};
use lhadec_lzhuf::LzhMethod;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lhadec")]
#[command(author, version, about = "Decode raw LZH/LHA entry payloads")]
#[command(long_about = "
lhadec decodes the compressed payload of a single LZH/LHA entry.
Supported methods: lh0-lh7, lzs, lz4, lz5 (and lhd directory entries)

Examples:
  lhadec decode --method lh5 --size 20000 payload.bin -o file.txt
  lhadec decode --method -lh1- --size 512 --offset 42 archive.lzh
  lhadec methods --json
")]
struct Cli {
    /// Log decoder activity (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one entry payload
    #[command(alias = "d")]
    Decode {
        /// File holding the payload
        input: PathBuf,

        /// Compression method, e.g. lh5 or -lh5-
        #[arg(short, long)]
        method: LzhMethod,

        /// Declared original size in bytes
        #[arg(short, long)]
        size: u64,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Byte offset of the payload within the input
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Hide the progress bar shown when writing to a file
        #[arg(long)]
        no_progress: bool,
    },

    /// List the known method signatures
    #[command(alias = "m")]
    Methods {
        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            input,
            method,
            size,
            output,
            offset,
            no_progress,
        } => cmd_decode(&input, method, size, output.as_deref(), offset, !no_progress),
        Commands::Methods { json } => cmd_methods(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
