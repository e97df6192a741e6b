use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{DnsAuthError, Result};

/// Hostname grammar accepted for a check: dot-separated LDH labels, at least two of them.
const DOMAIN_PATTERN: &str =
    r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9][a-z0-9-]{0,61}[a-z0-9]$";

fn domain_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DOMAIN_PATTERN).expect("domain pattern is valid"))
}

/// Returns true if `domain` (already lowercased) is a checkable hostname
#[must_use]
pub fn is_valid_domain(domain: &str) -> bool {
    domain_regex().is_match(domain)
}

/// A validated, lowercased domain or email address to check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CheckTarget {
    /// A bare domain
    Domain {
        /// The domain
        domain: String,
    },
    /// An email address; the domain is the part after the last `@`
    Email {
        /// Full address as entered, lowercased
        address: String,
        /// Domain part
        domain: String,
    },
}

impl CheckTarget {
    /// Parse user input: trim, lowercase, split an email address, validate the domain
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DnsAuthError::InvalidAddress(
                "please enter a domain name or email address".into(),
            ));
        }

        let email_domain = input
            .rsplit_once('@')
            .map(|(local, domain)| (local.is_empty(), domain.to_string()));

        let target = match email_domain {
            Some((true, _)) => return Err(invalid()),
            Some((false, domain)) => Self::Email {
                address: input,
                domain,
            },
            None => Self::Domain { domain: input },
        };

        if is_valid_domain(target.domain()) {
            Ok(target)
        } else {
            Err(invalid())
        }
    }

    /// Domain whose records are checked
    #[must_use]
    pub fn domain(&self) -> &str {
        match self {
            Self::Domain { domain } | Self::Email { domain, .. } => domain,
        }
    }

    /// The email address, if one was entered
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Domain { .. } => None,
            Self::Email { address, .. } => Some(address),
        }
    }
}

impl fmt::Display for CheckTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain { domain } => f.write_str(domain),
            Self::Email { address, .. } => f.write_str(address),
        }
    }
}

fn invalid() -> DnsAuthError {
    DnsAuthError::InvalidAddress("please enter a valid domain name or email address".into())
}
