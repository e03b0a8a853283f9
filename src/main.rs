use anyhow::Result;
use cards2cash::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cards2cash::AppCommand {
    fn from(cmd: Commands) -> cards2cash::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                strict,
                json,
            } => cards2cash::AppCommand::Convert {
                amount,
                from,
                to,
                strict,
                json,
            },
            Commands::Rates { currencies } => cards2cash::AppCommand::Rates { currencies },
            Commands::Search {
                query,
                category,
                json,
            } => cards2cash::AppCommand::Search {
                query,
                category,
                json,
            },
            Commands::Browse { category } => cards2cash::AppCommand::Browse { category },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
        /// Fail instead of passing the amount through when no rate is known
        #[arg(long)]
        strict: bool,
        /// Print the conversion as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display unit exchange rates between currencies
    Rates {
        /// Currencies to include (defaults to every currency in the rate table)
        currencies: Vec<String>,
    },
    /// Search app destinations
    Search {
        query: String,
        /// Only show destinations in this category
        #[arg(long, default_value = "all")]
        category: String,
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search as you type, reading queries from stdin
    Browse {
        /// Only show destinations in this category
        #[arg(long, default_value = "all")]
        category: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => cards2cash::cli::setup::setup_at_path(path),
            None => cards2cash::cli::setup::setup(),
        },
        Some(cmd) => cards2cash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
