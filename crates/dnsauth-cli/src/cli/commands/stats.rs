//! `dnsauth stats` - usage statistics from the log service.

use anyhow::Result;
use colored::Colorize;
use dnsauth::UsageStats;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::StatsArgs;
use crate::education::Explain;
use crate::output::OutputFormat;

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Checks")]
    count: u64,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Checked at")]
    timestamp: String,
}

pub async fn execute(ctx: Context, args: StatsArgs) -> Result<()> {
    let endpoint = ctx.require_log_endpoint()?;

    if ctx.explain {
        Explain::stats(endpoint).print(ctx.output_format);
    }

    let token = args.token.or_else(|| ctx.admin_token.clone());
    let stats = ctx.log_client(token)?.stats().await?;

    match ctx.output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            if let Some(text) = ctx.output_format.structured(&stats)? {
                println!("{text}");
            }
        }
        OutputFormat::Csv => print!("{}", render_csv(&stats)?),
        OutputFormat::Pretty => print_stats_pretty(&stats),
    }

    Ok(())
}

fn print_stats_pretty(stats: &UsageStats) {
    println!(
        "{} {}",
        "Total checks:".bold(),
        stats.total_checks.to_string().cyan().bold()
    );

    println!();
    println!("{}", "Top Domains:".bold().underline());
    if stats.top_domains.is_empty() {
        println!("  {}", "(none)".dimmed());
    } else {
        let rows: Vec<DomainRow> = stats
            .top_domains
            .iter()
            .map(|d| DomainRow {
                domain: d.domain.clone(),
                count: d.count,
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }

    println!();
    println!("{}", "Recent Checks:".bold().underline());
    if stats.recent_checks.is_empty() {
        println!("  {}", "(none)".dimmed());
    } else {
        let rows: Vec<RecentRow> = stats
            .recent_checks
            .iter()
            .map(|r| RecentRow {
                domain: r.domain.clone(),
                timestamp: r.timestamp.clone(),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
}

/// One `kind,domain,value` row per fact: the total, each top domain, each recent check.
fn render_csv(stats: &UsageStats) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["kind", "domain", "value"])?;
    wtr.write_record(["total", "", stats.total_checks.to_string().as_str()])?;
    for d in &stats.top_domains {
        wtr.write_record(["top", d.domain.as_str(), d.count.to_string().as_str()])?;
    }
    for r in &stats.recent_checks {
        wtr.write_record(["recent", r.domain.as_str(), r.timestamp.as_str()])?;
    }
    let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!("csv: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsauth::{DomainCount, RecentCheck};

    #[test]
    fn test_csv_rows() {
        let stats = UsageStats {
            total_checks: 3,
            recent_checks: vec![RecentCheck {
                domain: "a.example".into(),
                timestamp: "2026-01-01T00:00:00.000Z".into(),
            }],
            top_domains: vec![DomainCount {
                domain: "a.example".into(),
                count: 2,
            }],
        };

        assert_eq!(
            render_csv(&stats).unwrap(),
            "kind,domain,value\n\
             total,,3\n\
             top,a.example,2\n\
             recent,a.example,2026-01-01T00:00:00.000Z\n"
        );
    }
}
