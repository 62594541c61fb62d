//! The `cfn-check` command line tool.

use std::io::IsTerminal;
use std::io::stderr;
use std::path::PathBuf;

use cfn_check::commands;
use cfn_check::config::Config;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use tracing_log::AsTrace;

#[derive(Subcommand)]
enum Commands {
    /// Checks a template against a schema and reports diagnostics.
    Check(commands::check::CheckArgs),
}

#[derive(Parser)]
#[command(author, version, propagate_version = true, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// The path to a configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity,
}

pub async fn inner() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_log::LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(cli.verbose.log_level_filter().as_trace())
        .with_writer(std::io::stderr)
        .with_ansi(stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => Config::read_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Check(args) => commands::check::check(args.apply(config)).await,
    }
}

#[tokio::main]
pub async fn main() {
    if let Err(e) = inner().await {
        eprintln!(
            "{error}: {e:?}",
            error = if std::io::stderr().is_terminal() {
                "error".red().bold()
            } else {
                "error".normal()
            }
        );
        std::process::exit(1);
    }
}
