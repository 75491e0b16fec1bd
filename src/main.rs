use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use usdcop::cli::convert::ConvertArgs;
use usdcop::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Serve the exchange rate endpoint
    Serve,
    /// Show today's USD/COP rate
    Rate,
    /// Convert between USD and COP
    Convert {
        /// Amount in US dollars
        #[arg(long)]
        usd: Option<String>,
        /// Amount in Colombian pesos
        #[arg(long)]
        cop: Option<String>,
        /// Multiply the COP amount, e.g. 1000 or 1000000
        #[arg(long)]
        times: Option<f64>,
        /// Base URL of a running usdcop server
        #[arg(long)]
        server: Option<String>,
    },
}

impl From<Commands> for usdcop::AppCommand {
    fn from(cmd: Commands) -> usdcop::AppCommand {
        match cmd {
            Commands::Serve => usdcop::AppCommand::Serve,
            Commands::Rate => usdcop::AppCommand::Rate,
            Commands::Convert {
                usd,
                cop,
                times,
                server,
            } => usdcop::AppCommand::Convert(ConvertArgs {
                usd,
                cop,
                times,
                server,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => usdcop::cli::setup::setup(),
        Some(cmd) => usdcop::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
