//! rustible-etcd - etcd lookups from the command line
//!
//! Runs the `etcd` lookup plugin outside a playbook, printing the resolved
//! values as JSON or YAML.

mod cli;

use anyhow::Result;
use cli::commands::CommandContext;
use cli::{Cli, Commands};
use rustible_etcd::config::Config;
use rustible_etcd::error::Error;
use rustible_etcd::logging::LoggingBuilder;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            e.downcast_ref::<Error>().map_or(1, Error::exit_code)
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    // Load configuration
    let config = Config::load(cli.config.as_ref())?;

    // Initialize logging based on configuration and verbosity
    let mut logging = LoggingBuilder::from_config(config.logging.clone())
        .with_verbosity(cli.verbosity());
    if let Some(format) = cli.log_format {
        logging = logging.with_format(format);
    }
    logging.init()?;

    tracing::debug!(version = rustible_etcd::version(), "rustible-etcd starting");

    let ctx = CommandContext::new(cli, config);

    // Execute the appropriate command
    match &cli.command {
        Commands::Lookup(args) => args.execute(&ctx),
        Commands::Get(args) => args.execute(&ctx),
    }
}
