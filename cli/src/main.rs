use clap::{Parser, Subcommand};
use log::LevelFilter;

mod cert;
mod der;
mod error;
mod output;
mod utils;

use error::Result;

use cert::CertCommands;
use der::DerCommands;

#[derive(Parser)]
#[command(name = "kensa")]
#[command(about = "X.509 certificate inspector", long_about = None)]
struct Cli {
    /// Log to stderr (-v for debug, -vv for trace). RUST_LOG overrides this
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Certificate operations
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
    /// DER encoding operations
    Der {
        #[command(subcommand)]
        command: DerCommands,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Cert { command } => match command {
            CertCommands::Inspect { config } => {
                cert::inspect::execute(config)?;
            }
        },
        Commands::Der { command } => match command {
            DerCommands::Dump { config } => {
                der::dump::execute(config)?;
            }
        },
    }

    Ok(())
}
