//! Configuration management.

use anyhow::Result;
use directories::ProjectDirs;
use dnsauth::{CheckConfig, SpfProviders};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Keys accepted by `dnsauth config set`, with a short description.
pub const KEYS: &[(&str, &str)] = &[
    ("resolver", "DNS-over-HTTPS endpoint (DNS-JSON)"),
    ("timeout_secs", "Per-query DNS timeout in seconds"),
    ("log_endpoint", "Usage log service base URL"),
    ("admin_token", "Bearer token for stats / serve"),
    ("output_format", "Default output format (pretty/json/csv/yaml)"),
    ("explain_by_default", "Always explain commands (true/false)"),
    ("provider_a", "First SPF include domain to look for"),
    ("provider_b", "Second SPF include domain to look for"),
];

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// DNS-over-HTTPS endpoint.
    pub resolver: Option<String>,

    /// Per-query DNS timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Usage log service base URL. Checks are not logged when unset.
    pub log_endpoint: Option<String>,

    /// Admin token for `stats`, and the default token for `serve`.
    pub admin_token: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Always show explanations (as if --explain was passed).
    #[serde(default)]
    pub explain_by_default: bool,

    /// First SPF provider include domain.
    pub provider_a: Option<String>,

    /// Second SPF provider include domain.
    pub provider_b: Option<String>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "dnsauth", "dnsauth")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`; a missing file gives defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set one key. Returns the canonical key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&'static str> {
        let value = value.trim();
        let text = || (!value.is_empty()).then(|| value.to_string());

        let canonical = match key {
            "resolver" => {
                self.resolver = text();
                "resolver"
            }
            "timeout_secs" | "timeout" => {
                self.timeout_secs = match text() {
                    Some(secs) => match secs.parse::<u64>()? {
                        0 => anyhow::bail!("timeout_secs must be at least 1"),
                        secs => Some(secs),
                    },
                    None => None,
                };
                "timeout_secs"
            }
            "log_endpoint" | "log" => {
                self.log_endpoint = text();
                "log_endpoint"
            }
            "admin_token" | "token" => {
                self.admin_token = text();
                "admin_token"
            }
            "output_format" | "output" => {
                self.output_format = Some(value.parse()?);
                "output_format"
            }
            "explain_by_default" | "explain" => {
                self.explain_by_default = value.parse()?;
                "explain_by_default"
            }
            "provider_a" => {
                self.provider_a = text();
                "provider_a"
            }
            "provider_b" => {
                self.provider_b = text();
                "provider_b"
            }
            _ => {
                let available: Vec<String> = KEYS
                    .iter()
                    .map(|(k, desc)| format!("  {k:<20} - {desc}"))
                    .collect();
                anyhow::bail!(
                    "Unknown config key: {}\n\nAvailable keys:\n{}",
                    key,
                    available.join("\n")
                );
            }
        };

        Ok(canonical)
    }

    /// SPF provider pair, keeping defaults for unset halves.
    pub fn providers(&self) -> SpfProviders {
        let defaults = SpfProviders::default();
        SpfProviders::new(
            self.provider_a.clone().unwrap_or(defaults.provider_a),
            self.provider_b.clone().unwrap_or(defaults.provider_b),
        )
    }

    /// Checker settings. `resolver` (flag or env) wins over the file.
    pub fn check_config(&self, resolver: Option<String>) -> CheckConfig {
        let mut check = CheckConfig::default().providers(self.providers());
        if let Some(resolver) = resolver.or_else(|| self.resolver.clone()) {
            check = check.resolver(resolver);
        }
        if let Some(secs) = self.timeout_secs {
            check = check.timeout_secs(secs);
        }
        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut config = Config::default();
        assert_eq!(config.set("log", "https://logs.test").unwrap(), "log_endpoint");
        assert_eq!(config.set("output", "YAML").unwrap(), "output_format");
        config.set("explain", "true").unwrap();
        config.set("provider_a", "mail.example").unwrap();

        assert_eq!(config.log_endpoint.as_deref(), Some("https://logs.test"));
        assert_eq!(config.output_format, Some(OutputFormat::Yaml));
        assert!(config.explain_by_default);

        let providers = config.providers();
        assert_eq!(providers.provider_a, "mail.example");
        assert_eq!(providers.provider_b, SpfProviders::default().provider_b);
    }

    #[test]
    fn test_empty_value_clears() {
        let mut config = Config {
            admin_token: Some("old".into()),
            ..Config::default()
        };
        config.set("admin_token", "").unwrap();
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_unknown_key_lists_available() {
        let err = Config::default().set("api_key", "x").unwrap_err().to_string();
        assert!(err.contains("Unknown config key: api_key"));
        assert!(err.contains("log_endpoint"));
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut config = Config::default();
        assert!(config.set("output_format", "xml").is_err());
        assert!(config.set("explain_by_default", "maybe").is_err());
    }

    #[test]
    fn test_timeout_key() {
        let mut config = Config::default();
        assert_eq!(config.set("timeout", "3").unwrap(), "timeout_secs");
        assert_eq!(config.timeout_secs, Some(3));
        assert!(config.set("timeout_secs", "0").is_err());
        assert!(config.set("timeout_secs", "soon").is_err());
        config.set("timeout_secs", "").unwrap();
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_check_config_precedence() {
        let mut config = Config::default();
        let check = config.check_config(None);
        assert_eq!(check, CheckConfig::default());

        config.set("resolver", "https://file.test/dns-query").unwrap();
        config.set("timeout_secs", "4").unwrap();
        config.set("provider_b", "mail.example").unwrap();

        let check = config.check_config(None);
        assert_eq!(check.resolver, "https://file.test/dns-query");
        assert_eq!(check.timeout_secs, 4);
        assert_eq!(check.providers.provider_b, "mail.example");

        let check = config.check_config(Some("https://flag.test/dns-query".into()));
        assert_eq!(check.resolver, "https://flag.test/dns-query");
        assert_eq!(check.timeout_secs, 4);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("resolver", "https://dns.test/dns-query").unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert_eq!(
            Config::load_from(&dir.path().join("missing.toml")).unwrap(),
            Config::default()
        );
    }
}
