mod decode;
mod generate;
mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jde-fixtures")]
#[command(version)]
#[command(
    about = "Generate mock JD Edwards ERP tables (Julian dates, implicit decimals) as CSV fixtures",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate F0101 (address book) and F4211 (sales order detail) CSV files
    Generate {
        /// Number of address book rows (customers)
        #[arg(short, long)]
        entities: Option<usize>,

        /// Number of sales order detail rows
        #[arg(short, long)]
        transactions: Option<usize>,

        /// Random seed for reproducibility (default: 42)
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the CSV files (default: data)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Date the trailing date windows end on, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<chrono::NaiveDate>,

        /// Header row naming: generic or jde
        #[arg(long)]
        headers: Option<String>,

        /// YAML config file with generation settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show progress while generating
        #[arg(short, long)]
        progress: bool,

        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check previously generated fixture files
    Validate {
        /// Directory containing F0101.csv and F4211.csv
        #[arg(default_value = "data")]
        dir: PathBuf,

        /// Treat warnings as errors (exit 1)
        #[arg(long)]
        strict: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a Julian date or an implicit-decimal amount
    Decode {
        /// Julian date in CYYDDD form (e.g., 123001 or 099365)
        #[arg(short, long, required_unless_present = "amount")]
        date: Option<String>,

        /// Integer with two implied decimals (e.g., 10500)
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<i64>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            entities,
            transactions,
            seed,
            output,
            as_of,
            headers,
            config,
            progress,
            json,
        } => generate::run(
            entities,
            transactions,
            seed,
            output,
            as_of,
            headers,
            config,
            progress,
            json,
        ),
        Commands::Validate { dir, strict, json } => validate::run(dir, strict, json),
        Commands::Decode { date, amount } => decode::run(date, amount),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "jde-fixtures",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
