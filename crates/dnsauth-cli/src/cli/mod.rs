//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config = Config::load()?;

    // Flag or env first, then the config file, then defaults
    let output_format = cli.output.or(config.output_format).unwrap_or_default();
    let log_endpoint = cli.log_endpoint.or_else(|| config.log_endpoint.clone());

    let ctx = commands::Context {
        check: config.check_config(cli.resolver),
        log_endpoint,
        admin_token: config.admin_token.clone(),
        output_format,
        explain: cli.explain || config.explain_by_default,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Check(args) => commands::check::execute(ctx, args).await,
        Commands::Stats(args) => commands::stats::execute(ctx, args).await,
        Commands::Serve(args) => commands::serve::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(&ctx, args),
    }
}

/// `RUST_LOG` wins; otherwise warn, debug with `--verbose`, info for `serve`.
fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "debug"
    } else if matches!(cli.command, Commands::Serve(_)) {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr so JSON/CSV output on stdout stays parseable.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

