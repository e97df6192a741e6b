//! `dnsauth serve` - run the usage log service.

use anyhow::Result;
use colored::Colorize;
use dnsauth::store::{self, ServerConfig};

use super::Context;
use crate::cli::args::ServeArgs;
use crate::education::Explain;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ServeArgs) -> Result<()> {
    let config = server_config(&ctx, args)?;

    if ctx.explain {
        Explain::serve(&config).print(ctx.output_format);
    }

    if ctx.output_format == OutputFormat::Pretty {
        println!(
            "{} http://{} ({})",
            "Listening on".bold(),
            config.listen.to_string().cyan(),
            config.database_url.dimmed()
        );
        if config.admin_token().is_none() {
            println!("{}", "GET /stats is open: no admin token configured".yellow());
        }
    }

    store::run(&config).await?;
    Ok(())
}

/// Config file (or defaults), then flags. The CLI admin token fills an unset server token.
fn server_config(ctx: &Context, args: ServeArgs) -> Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(database) = args.database {
        config.database_url = database;
    }
    if config.admin_token().is_none() {
        config.admin_token.clone_from(&ctx.admin_token);
    }

    Ok(config)
}
