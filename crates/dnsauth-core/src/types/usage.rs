//! Wire and row types for the usage log backend.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::dkim::DkimVerdict;
use super::dmarc::{DmarcPolicy, DmarcVerdict};
use super::report::AuthReport;
use super::spf::SpfVerdict;

/// The three verdicts as sent to `POST /log`. Missing parts default to absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResults {
    /// SPF verdict
    pub spf: SpfVerdict,
    /// DKIM verdict
    pub dkim: DkimVerdict,
    /// DMARC verdict
    pub dmarc: DmarcVerdict,
}

/// Body of `POST /log`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRequest {
    /// Checked domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Checked email address, when the user entered one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Verdicts. Required by the log service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<CheckResults>,

    /// Score, when the caller computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl LogRequest {
    /// Build the log body for a finished check
    #[must_use]
    pub fn from_report(report: &AuthReport) -> Self {
        Self {
            domain: Some(report.domain().to_string()),
            email: report.target.email().map(str::to_string),
            results: Some(CheckResults {
                spf: report.spf.clone(),
                dkim: report.dkim.clone(),
                dmarc: report.dmarc,
            }),
            score: Some(report.score),
        }
    }

    /// Domain to record: `domain` if given, else the part of `email` after its last `@`
    #[must_use]
    pub fn resolved_domain(&self) -> Option<String> {
        let non_empty = |s: &&String| !s.trim().is_empty();
        if let Some(domain) = self.domain.as_ref().filter(non_empty) {
            return Some(domain.trim().to_lowercase());
        }
        self.email
            .as_ref()
            .filter(non_empty)
            .and_then(|email| email.rsplit_once('@'))
            .map(|(_, domain)| domain.trim().to_lowercase())
            .filter(|domain| !domain.is_empty())
    }
}

/// One persisted row: a flattened copy of a check. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    /// Checked domain
    pub domain: String,
    /// Checked email address, if any
    pub email: Option<String>,
    /// Server receive time
    pub timestamp: DateTime<Utc>,
    /// Client IP, or `unknown`
    pub ip_address: String,
    /// Client user agent, or `unknown`
    pub user_agent: String,
    /// SPF correctness (exactly one record)
    pub spf_exists: bool,
    /// SPF record text
    pub spf_record: Option<String>,
    /// DKIM presence per selector
    pub dkim: DkimVerdict,
    /// DMARC record present
    pub dmarc_exists: bool,
    /// DMARC policy
    pub dmarc_policy: Option<DmarcPolicy>,
    /// Score, when the caller sent one
    pub score: Option<u8>,
}

impl UsageLogEntry {
    /// Flatten a log request. Returns `None` when `results` is missing or
    /// neither domain nor email was given.
    #[must_use]
    pub fn from_request(
        request: &LogRequest,
        ip_address: impl Into<String>,
        user_agent: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        let results = request.results.as_ref()?;
        let domain = request.resolved_domain()?;
        Some(Self {
            domain,
            email: request.email.clone(),
            timestamp,
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
            spf_exists: results.spf.has_exactly_one,
            spf_record: results.spf.record.clone(),
            dkim: results.dkim.clone(),
            dmarc_exists: results.dmarc.exists,
            dmarc_policy: results.dmarc.policy,
            score: request.score,
        })
    }

    /// Timestamp in the stored form: RFC 3339, millisecond precision, `Z`
    #[must_use]
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// A recent check as listed by `GET /stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCheck {
    /// Checked domain
    pub domain: String,
    /// Stored timestamp string
    pub timestamp: String,
}

/// Check count for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    /// Domain
    pub domain: String,
    /// Number of checks
    pub count: u64,
}

/// Body of `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    /// Total number of logged checks
    pub total_checks: u64,
    /// Most recent checks, newest first
    pub recent_checks: Vec<RecentCheck>,
    /// Most checked domains, most frequent first
    pub top_domains: Vec<DomainCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckTarget, DkimSelector};

    #[test]
    fn request_from_email_report() {
        let target = CheckTarget::parse("ops@example.com").unwrap();
        let report = AuthReport::new(
            target,
            SpfVerdict::absent(),
            DkimVerdict::from_results([(DkimSelector::Hf, true)]),
            DmarcVerdict::absent(),
        );
        let request = LogRequest::from_report(&report);

        assert_eq!(request.domain.as_deref(), Some("example.com"));
        assert_eq!(request.email.as_deref(), Some("ops@example.com"));
        assert_eq!(request.score, Some(8));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["results"]["dkim"]["hf"], true);
        assert_eq!(json["results"]["spf"]["hasExactlyOne"], false);
    }

    #[test]
    fn partial_body_defaults_missing_results() {
        let body = r#"{"domain":"example.com","results":{"spf":{"hasExactlyOne":true}}}"#;
        let request: LogRequest = serde_json::from_str(body).unwrap();
        let results = request.results.as_ref().unwrap();
        assert!(results.spf.has_exactly_one);
        assert!(!results.dmarc.exists);
        assert_eq!(results.dkim.present_count(), 0);
        assert_eq!(request.score, None);
    }

    #[test]
    fn missing_results_is_not_an_entry() {
        let request: LogRequest = serde_json::from_str(r#"{"domain":"example.com"}"#).unwrap();
        assert!(request.results.is_none());
        assert!(UsageLogEntry::from_request(&request, "ip", "ua", Utc::now()).is_none());
    }

    #[test]
    fn domain_falls_back_to_email() {
        let request = LogRequest {
            email: Some("a@b@Example.org".into()),
            ..LogRequest::default()
        };
        assert_eq!(request.resolved_domain().as_deref(), Some("example.org"));

        let empty = LogRequest {
            domain: Some("  ".into()),
            ..LogRequest::default()
        };
        assert_eq!(empty.resolved_domain(), None);
        assert!(UsageLogEntry::from_request(&empty, "ip", "ua", Utc::now()).is_none());
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = UsageStats {
            total_checks: 3,
            recent_checks: vec![],
            top_domains: vec![DomainCount {
                domain: "example.com".into(),
                count: 3,
            }],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalChecks"], 3);
        assert_eq!(json["topDomains"][0]["count"], 3);
        assert!(json["recentChecks"].as_array().unwrap().is_empty());
    }
}
