use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use kindred_cli::commands::Commands;
use kindred_cli::{KindredCliContext, OutputFormat, output_error, run_command};

#[derive(Parser)]
#[command(name = "kindred-cli")]
#[command(about = "Kindred family records CLI", long_about = None)]
#[command(version = kindred::VERSION)]
struct Cli {
    /// JSON snapshot holding the family records
    #[arg(long, short, default_value = "kindred.json", global = true, env = "KINDRED_SNAPSHOT")]
    snapshot: PathBuf,

    /// Output format - use json for tool integration
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table, global = true)]
    output: OutputFormat,

    /// Use machine-readable output (alias for --output json)
    #[arg(long, global = true)]
    machine: bool,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Quiet mode (suppress all logging output)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.machine {
        OutputFormat::Json
    } else {
        cli.output
    };

    // Machine mode implies quiet so stdout stays parseable
    let log_level = if cli.quiet || cli.machine {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if matches!(cli.command, Commands::Version) {
        println!("Kindred CLI v{}", kindred::VERSION);
        return Ok(());
    }

    let result = match KindredCliContext::new(&cli.snapshot).await {
        Ok(ctx) => run_command(cli.command, &ctx, format).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        output_error(&e, format);
        std::process::exit(1);
    }

    Ok(())
}
