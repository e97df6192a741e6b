//! `dnsauth check` - SPF, DKIM and DMARC for one domain or email address.

use anyhow::{anyhow, Result};
use colored::Colorize;
use dnsauth::{AuthReport, CheckTarget, DkimSelector, LogRequest, SpfProviders, UsageLogClient};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use super::Context;
use crate::cli::args::CheckArgs;
use crate::education::Explain;
use crate::output::{self, OutputFormat};

/// Longest the CLI waits for a dispatched usage log before exiting.
const LOG_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn execute(ctx: Context, args: CheckArgs) -> Result<()> {
    let target = CheckTarget::parse(&args.address)?;

    if ctx.explain {
        Explain::check(&target, &ctx.check.resolver).print(ctx.output_format);
    }

    let checker = ctx.checker()?;

    let spinner = (ctx.output_format == OutputFormat::Pretty).then(|| spinner(&target));
    let result = checker.check(&target).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = result.map_err(|e| anyhow!("Error checking DNS records: {e}"))?;

    match ctx.output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            if let Some(text) = ctx.output_format.structured(&report)? {
                println!("{text}");
            }
        }
        OutputFormat::Csv => print!("{}", render_csv(&report)?),
        OutputFormat::Pretty => print!("{}", PrettyReport::new(&report, &ctx.check.providers)),
    }

    if !args.no_log {
        if let Some(endpoint) = ctx.log_endpoint.as_deref() {
            log_check(endpoint, &report).await;
        }
    }

    Ok(())
}

fn spinner(target: &CheckTarget) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Checking DNS records for {}...", target.domain()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Fire-and-forget report to the log service, bounded by [`LOG_FLUSH_TIMEOUT`].
async fn log_check(endpoint: &str, report: &AuthReport) {
    let client = match UsageLogClient::new(endpoint) {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "usage log disabled");
            return;
        }
    };

    let handle = client.dispatch(LogRequest::from_report(report));
    if tokio::time::timeout(LOG_FLUSH_TIMEOUT, handle).await.is_err() {
        debug!("usage log still in flight, not waiting");
    }
}

/// Human-readable report.
pub struct PrettyReport<'a> {
    report: &'a AuthReport,
    providers: &'a SpfProviders,
}

impl<'a> PrettyReport<'a> {
    pub const fn new(report: &'a AuthReport, providers: &'a SpfProviders) -> Self {
        Self { report, providers }
    }
}

impl fmt::Display for PrettyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        writeln!(f, "{} {}", "Domain:".bold(), report.domain().cyan().bold())?;
        if let Some(email) = report.target.email() {
            writeln!(f, "{} {}", "Email:".bold(), email)?;
        }
        writeln!(f)?;

        // SPF
        let spf = &report.spf;
        writeln!(f, "{}", "SPF".bold().underline())?;
        writeln!(
            f,
            "  {} {}",
            "Single SPF record:".bold(),
            output::status(spf.has_exactly_one, "Yes", "No")
        )?;
        if let (true, Some(record)) = (spf.exists, spf.record.as_deref()) {
            for (provider, present) in [
                (&self.providers.provider_a, spf.has_provider_a),
                (&self.providers.provider_b, spf.has_provider_b),
            ] {
                writeln!(
                    f,
                    "  {} {}",
                    format!("include:{provider}").bold(),
                    output::status(present, "Present", "Missing")
                )?;
            }
            writeln!(f, "  {} {}", "Record:".bold(), record.dimmed())?;
        }
        writeln!(f)?;

        // DKIM
        writeln!(f, "{}", "DKIM".bold().underline())?;
        for selector in DkimSelector::ALL {
            writeln!(
                f,
                "  {} {}",
                format!("{:<4}", selector.label()).bold(),
                output::status(report.dkim.is_present(selector), "Exists", "Missing")
            )?;
        }
        writeln!(f)?;

        // DMARC
        let dmarc = &report.dmarc;
        writeln!(f, "{}", "DMARC".bold().underline())?;
        writeln!(
            f,
            "  {} {}",
            "DMARC record:".bold(),
            output::status(dmarc.exists, "Yes", "No")
        )?;
        if let (true, Some(policy)) = (dmarc.exists, dmarc.policy) {
            let policy = format!("p={}", policy.as_str());
            writeln!(f, "  {} {}", "Policy:".bold(), policy.cyan())?;
        }
        writeln!(f)?;

        writeln!(f, "{} {}", "Score:".bold(), output::score(report.score))
    }
}

/// Header plus one row.
pub fn render_csv(report: &AuthReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record([
        "domain",
        "email",
        "spf",
        "spf_record",
        "spf_provider_a",
        "spf_provider_b",
        "dkim_bh",
        "dkim_ba",
        "dkim_ba2",
        "dkim_hf",
        "dkim_hf2",
        "dmarc",
        "dmarc_policy",
        "score",
    ])?;

    let flag = |b: bool| b.to_string();
    let mut row = vec![
        report.domain().to_string(),
        report.target.email().unwrap_or_default().to_string(),
        flag(report.spf.has_exactly_one),
        report.spf.record.clone().unwrap_or_default(),
        flag(report.spf.has_provider_a),
        flag(report.spf.has_provider_b),
    ];
    row.extend(DkimSelector::ALL.map(|s| flag(report.dkim.is_present(s))));
    row.extend([
        flag(report.dmarc.exists),
        report.dmarc.policy.map(|p| p.as_str().to_string()).unwrap_or_default(),
        report.score.to_string(),
    ]);
    wtr.write_record(&row)?;

    let bytes = wtr.into_inner().map_err(|e| anyhow!("csv: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsauth::{AnswerRecord, DkimVerdict, DmarcPolicy, DmarcVerdict, SpfVerdict};

    fn providers() -> SpfProviders {
        SpfProviders::new("providerA.example", "providerB.example")
    }

    fn report(spf: &[&str], dkim: &[DkimSelector], dmarc: &[&str]) -> AuthReport {
        let answers = |data: &[&str], name: &str| -> Vec<AnswerRecord> {
            data.iter().map(|d| AnswerRecord::txt(name, *d)).collect()
        };
        AuthReport::new(
            CheckTarget::parse("ops@example.com").unwrap(),
            SpfVerdict::from_answers(&answers(spf, "example.com"), &providers()),
            DkimVerdict::from_results(DkimSelector::ALL.map(|s| (s, dkim.contains(&s)))),
            DmarcVerdict::from_answers(&answers(dmarc, "_dmarc.example.com")),
        )
    }

    #[test]
    fn test_pretty_full_report() {
        colored::control::set_override(false);
        let report = report(
            &["\"v=spf1 include:providerA.example -all\""],
            &DkimSelector::ALL,
            &["\"v=DMARC1; p=reject\""],
        );
        let text = PrettyReport::new(&report, &providers()).to_string();

        assert!(text.contains("Domain: example.com"));
        assert!(text.contains("Email: ops@example.com"));
        assert!(text.contains("Single SPF record: Yes"));
        assert!(text.contains("include:providerA.example Present"));
        assert!(text.contains("include:providerB.example Missing"));
        assert!(text.contains("Record: v=spf1 include:providerA.example -all"));
        assert!(text.contains("ba2  Exists"));
        assert!(text.contains("Policy: p=reject"));
        assert!(text.contains("Score: 100/100"));
    }

    #[test]
    fn test_pretty_hides_sections_without_records() {
        colored::control::set_override(false);
        let report = report(&[], &[], &["\"v=DMARC1\""]);
        let text = PrettyReport::new(&report, &providers()).to_string();

        assert!(text.contains("Single SPF record: No"));
        assert!(!text.contains("include:"));
        assert!(!text.contains("Record:"));
        assert!(text.contains("hf2  Missing"));
        assert!(text.contains("DMARC record: Yes"));
        assert!(!text.contains("Policy:"));
        assert!(text.contains("Score: 20/100"));
    }

    #[test]
    fn test_pretty_multiple_spf_still_shows_first_record() {
        colored::control::set_override(false);
        let report = report(
            &["\"v=spf1 -all\"", "\"v=spf1 include:providerB.example ~all\""],
            &[],
            &[],
        );
        let text = PrettyReport::new(&report, &providers()).to_string();
        assert!(text.contains("Single SPF record: No"));
        assert!(text.contains("Record: v=spf1 -all"));
    }

    #[test]
    fn test_csv_header_and_row() {
        let csv = render_csv(&report(
            &["\"v=spf1 include:providerB.example, -all\""],
            &[DkimSelector::Bh],
            &["\"v=DMARC1; p=quarantine\""],
        ))
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("domain,email,spf,spf_record"));
        assert_eq!(
            lines[1],
            "example.com,ops@example.com,true,\
             \"v=spf1 include:providerB.example, -all\",false,true,\
             true,false,false,false,false,true,quarantine,68"
        );
    }

    #[test]
    fn test_report_policy_detection() {
        let r = report(&[], &[], &["\"v=DMARC1; p=none\""]);
        assert_eq!(r.dmarc.policy, Some(DmarcPolicy::None));
    }
}
