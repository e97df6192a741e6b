//! `dnsauth config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load()?;

    if let Some(text) = ctx.output_format.structured(&config)? {
        println!("{text}");
        return Ok(());
    }

    let unset = || "(not set)".dimmed().to_string();
    let providers = config.providers();

    println!("{}", "Current Configuration:".bold());
    println!();
    println!(
        "  {} {}",
        "resolver:".bold(),
        config.resolver.clone().unwrap_or_else(unset)
    );
    println!(
        "  {} {}",
        "timeout_secs:".bold(),
        config.timeout_secs.map_or_else(unset, |secs| secs.to_string())
    );
    println!(
        "  {} {}",
        "log_endpoint:".bold(),
        config.log_endpoint.clone().unwrap_or_else(unset)
    );
    println!(
        "  {} {}",
        "admin_token:".bold(),
        config.admin_token.as_deref().map_or_else(unset, mask)
    );
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or(OutputFormat::Pretty)
    );
    println!("  {} {}", "explain_by_default:".bold(), config.explain_by_default);
    println!("  {} {}", "provider_a:".bold(), providers.provider_a);
    println!("  {} {}", "provider_b:".bold(), providers.provider_b);

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    let key = config.set(key, value)?;
    config.save()?;

    let shown = if key == "admin_token" { mask(value) } else { value.to_string() };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());

    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}

/// First and last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcd1234efgh"), "abcd...efgh");
        assert_eq!(mask("short"), "****");
    }
}
