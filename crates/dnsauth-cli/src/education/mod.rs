//! Educational features: what each command queries and how the score is built.

use colored::Colorize;
use dnsauth::scoring::{dkim_points, ScoreWeights};
use dnsauth::store::ServerConfig;
use dnsauth::{dmarc_subdomain, CheckTarget, DkimSelector};
use std::fmt;

use crate::output::OutputFormat;

/// Command explanation builder.
pub struct Explain {
    description: String,
    endpoint: Option<String>,
    queries: Vec<(String, String)>,
    what_happens: Vec<String>,
    learn_more: Vec<&'static str>,
}

impl Explain {
    fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            endpoint: None,
            queries: Vec::new(),
            what_happens: Vec::new(),
            learn_more: Vec::new(),
        }
    }

    fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    fn query(mut self, name: impl Into<String>, purpose: impl Into<String>) -> Self {
        self.queries.push((name.into(), purpose.into()));
        self
    }

    fn step(mut self, step: impl Into<String>) -> Self {
        self.what_happens.push(step.into());
        self
    }

    fn rfc(mut self, reference: &'static str) -> Self {
        self.learn_more.push(reference);
        self
    }

    /// Print to stdout for the pretty format, to stderr otherwise so that
    /// structured output stays parseable.
    pub fn print(&self, format: OutputFormat) {
        if format == OutputFormat::Pretty {
            println!("{self}");
        } else {
            eprintln!("{self}");
        }
    }

    // ========================================================================
    // Factory methods for each command
    // ========================================================================

    pub fn check(target: &CheckTarget, resolver: &str) -> Self {
        let domain = target.domain();
        let weights = ScoreWeights::STANDARD;
        let per_selector = dkim_points(weights.dkim, 1, DkimSelector::ALL.len());

        let mut explain = Self::new(format!(
            "Looks up the email authentication records published by {domain} \
             and scores them out of {}.",
            weights.total()
        ))
        .endpoint(resolver)
        .query(domain, "SPF: records starting with v=spf1");

        for selector in DkimSelector::ALL {
            explain = explain.query(
                selector.subdomain(domain),
                format!("DKIM key for selector {selector}"),
            );
        }

        explain
            .query(dmarc_subdomain(domain), "DMARC policy")
            .step("All seven queries run concurrently")
            .step(format!(
                "SPF: exactly one v=spf1 record earns {} points",
                weights.spf
            ))
            .step(format!(
                "DKIM: {} points shared across {} selectors, {per_selector} per selector found",
                weights.dkim,
                DkimSelector::ALL.len()
            ))
            .step(format!(
                "DMARC: any record at _dmarc earns {} points; the p= policy is reported",
                weights.dmarc
            ))
            .step(
                "A failed SPF lookup stops the check; \
                 failed DKIM or DMARC lookups count as missing",
            )
            .rfc("RFC 7208 (SPF)")
            .rfc("RFC 6376 (DKIM)")
            .rfc("RFC 7489 (DMARC)")
    }

    pub fn stats(endpoint: &str) -> Self {
        Self::new(
            "Shows how the checker has been used: total checks, \
             most checked domains and the latest checks.",
        )
            .endpoint(format!("GET {}/stats", endpoint.trim_end_matches('/')))
            .step("Sends the admin token as a bearer token when one is configured")
            .step("Counts come from the append-only usage log")
    }

    pub fn serve(config: &ServerConfig) -> Self {
        Self::new("Runs the usage log service that `dnsauth check` reports to.")
            .endpoint(format!("http://{}", config.listen))
            .step(format!("Stores every POST /log in {}", config.database_url))
            .step(format!(
                "GET /stats returns the total, the {} most recent checks and the top {} domains",
                config.recent_limit, config.top_limit
            ))
            .step(if config.admin_token().is_some() {
                "GET /stats requires the admin bearer token"
            } else {
                "GET /stats is open (no admin token configured)"
            })
    }
}

impl fmt::Display for Explain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", "=== What This Does ===".bold().cyan())?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;

        if let Some(endpoint) = &self.endpoint {
            writeln!(f, "{} {}", "Endpoint:".bold(), endpoint.dimmed())?;
            writeln!(f)?;
        }

        if !self.queries.is_empty() {
            let width = self.queries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
            writeln!(f, "{}", "TXT queries:".bold())?;
            for (name, purpose) in &self.queries {
                writeln!(f, "  {name:<width$}  {}", purpose.dimmed())?;
            }
            writeln!(f)?;
        }

        if !self.what_happens.is_empty() {
            writeln!(f, "{}", "How it works:".bold())?;
            for (i, step) in self.what_happens.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, step)?;
            }
            writeln!(f)?;
        }

        if !self.learn_more.is_empty() {
            let refs = self.learn_more.join(", ");
            writeln!(f, "{} {}", "Learn more:".bold(), refs.cyan())?;
            writeln!(f)?;
        }

        writeln!(f, "{}", "=== Results ===".bold().cyan())
    }
}
