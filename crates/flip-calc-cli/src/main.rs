mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::book::BookArgs;
use commands::deal::{EvaluateArgs, NegotiateArgs};
use commands::regions::TransferTaxArgs;

/// Fix-and-flip deal valuation
#[derive(Parser)]
#[command(
    name = "ffc",
    version,
    about = "Fix-and-flip deal valuation",
    long_about = "A CLI for valuing fix-and-flip real-estate deals with decimal precision. \
                  Computes acquisition, renovation, financing and holding costs, profit and \
                  margin for two sale-price scenarios, rental yield, and a purchase-price \
                  negotiation table."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Value a deal: costs, profit, margin, rental metrics, negotiation table
    Evaluate(EvaluateArgs),
    /// Show only the purchase-price negotiation table
    Negotiate(NegotiateArgs),
    /// Look up the transfer-tax rate of a region
    TransferTax(TransferTaxArgs),
    /// List all regions and their transfer-tax rates
    Regions,
    /// Print the template deal parameters
    Template,
    /// Manage a deal book file
    Book(BookArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::deal::run_evaluate(args),
        Commands::Negotiate(args) => commands::deal::run_negotiate(args),
        Commands::TransferTax(args) => commands::regions::run_transfer_tax(args),
        Commands::Regions => commands::regions::run_regions(),
        Commands::Template => commands::deal::run_template(),
        Commands::Book(args) => commands::book::run_book(args),
        Commands::Version => {
            println!("ffc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
