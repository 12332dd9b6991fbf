//! The command-line entry point for translating and running list requests.

use std::path::PathBuf;

use clap::Parser;

use simple_rest_cli::{run, Command, Context};
use simple_rest_configuration::environment::ProcessEnvironment;

/// Translate list-endpoint query strings into SQL, and run them.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// The directory holding `configuration.json`.
    #[arg(long, value_name = "DIRECTORY", env = "SIMPLE_REST_CONFIGURATION", default_value = ".")]
    configuration: PathBuf,
    /// Print the collected query metrics after `list` and `export`.
    #[arg(long, env = "SIMPLE_REST_PRINT_METRICS")]
    metrics: bool,
    #[command(subcommand)]
    subcommand: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let context = Context {
        configuration_dir: args.configuration,
        environment: ProcessEnvironment,
        metrics_registry: prometheus::Registry::new(),
        print_metrics: args.metrics,
    };
    run(args.subcommand, context, &mut std::io::stdout().lock()).await
}
