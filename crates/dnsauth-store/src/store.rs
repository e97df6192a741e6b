//! SQLite-backed, append-only usage log.

use dnsauth_core::{DkimSelector, DomainCount, RecentCheck, UsageLogEntry, UsageStats};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use crate::Result;

const CREATE_AUDIT_LOG: &str = r"
    CREATE TABLE IF NOT EXISTS audit_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        domain TEXT NOT NULL,
        email TEXT,
        timestamp TEXT NOT NULL,
        ip_address TEXT NOT NULL,
        user_agent TEXT NOT NULL,
        spf_exists INTEGER NOT NULL DEFAULT 0,
        spf_record TEXT,
        dkim_bh INTEGER NOT NULL DEFAULT 0,
        dkim_ba INTEGER NOT NULL DEFAULT 0,
        dkim_ba2 INTEGER NOT NULL DEFAULT 0,
        dkim_hf INTEGER NOT NULL DEFAULT 0,
        dkim_hf2 INTEGER NOT NULL DEFAULT 0,
        dmarc_exists INTEGER NOT NULL DEFAULT 0,
        dmarc_policy TEXT,
        score INTEGER
    )
";

const CREATE_DOMAIN_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_audit_log_domain ON audit_log (domain)";

const CREATE_TIMESTAMP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_audit_log_timestamp ON audit_log (timestamp)";

/// Usage log over an SQLite pool. Rows are only ever inserted.
#[derive(Debug, Clone)]
pub struct UsageStore {
    db: SqlitePool,
}

impl UsageStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let db = SqlitePoolOptions::new().connect_with(options).await?;
        info!(url, "opened usage log database");
        Self::with_pool(db).await
    }

    /// Private in-memory database. A single long-lived connection keeps it alive.
    pub async fn in_memory() -> Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(db).await
    }

    /// Wrap an existing pool and ensure the schema.
    pub async fn with_pool(db: SqlitePool) -> Result<Self> {
        let store = Self { db };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        for statement in [CREATE_AUDIT_LOG, CREATE_DOMAIN_INDEX, CREATE_TIMESTAMP_INDEX] {
            sqlx::query(statement).execute(&self.db).await?;
        }
        Ok(())
    }

    /// The underlying pool
    pub const fn pool(&self) -> &SqlitePool {
        &self.db
    }

    /// Append one entry and return its row id.
    pub async fn append(&self, entry: &UsageLogEntry) -> Result<i64> {
        let dkim = |selector| entry.dkim.is_present(selector);

        let result = sqlx::query(
            r"
            INSERT INTO audit_log (
                domain, email, timestamp, ip_address, user_agent,
                spf_exists, spf_record,
                dkim_bh, dkim_ba, dkim_ba2, dkim_hf, dkim_hf2,
                dmarc_exists, dmarc_policy, score
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&entry.domain)
        .bind(entry.email.as_deref())
        .bind(entry.timestamp_string())
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.spf_exists)
        .bind(entry.spf_record.as_deref())
        .bind(dkim(DkimSelector::Bh))
        .bind(dkim(DkimSelector::Ba))
        .bind(dkim(DkimSelector::Ba2))
        .bind(dkim(DkimSelector::Hf))
        .bind(dkim(DkimSelector::Hf2))
        .bind(entry.dmarc_exists)
        .bind(entry.dmarc_policy.map(|p| p.as_str()))
        .bind(entry.score.map(i64::from))
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, domain = %entry.domain, "appended usage log entry");
        Ok(id)
    }

    /// Total count, the `recent_limit` newest checks and the `top_limit` most checked domains.
    pub async fn stats(&self, recent_limit: u32, top_limit: u32) -> Result<UsageStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.db)
            .await?;

        let recent = sqlx::query_as::<_, (String, String)>(
            "SELECT domain, timestamp FROM audit_log ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(recent_limit))
        .fetch_all(&self.db)
        .await?;

        let top = sqlx::query_as::<_, (String, i64)>(
            r"
            SELECT domain, COUNT(*) AS count
            FROM audit_log
            GROUP BY domain
            ORDER BY count DESC, domain ASC
            LIMIT ?
            ",
        )
        .bind(i64::from(top_limit))
        .fetch_all(&self.db)
        .await?;

        Ok(UsageStats {
            total_checks: non_negative(total),
            recent_checks: recent
                .into_iter()
                .map(|(domain, timestamp)| RecentCheck { domain, timestamp })
                .collect(),
            top_domains: top
                .into_iter()
                .map(|(domain, count)| DomainCount {
                    domain,
                    count: non_negative(count),
                })
                .collect(),
        })
    }
}

fn non_negative(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dnsauth_core::{DkimVerdict, DmarcPolicy};

    fn entry(domain: &str, second: u32) -> UsageLogEntry {
        UsageLogEntry {
            domain: domain.into(),
            email: None,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, second).unwrap(),
            ip_address: "203.0.113.7".into(),
            user_agent: "test".into(),
            spf_exists: true,
            spf_record: Some("v=spf1 -all".into()),
            dkim: DkimVerdict::from_results([(DkimSelector::Bh, true), (DkimSelector::Hf2, true)]),
            dmarc_exists: true,
            dmarc_policy: Some(DmarcPolicy::Quarantine),
            score: Some(86),
        }
    }

    #[tokio::test]
    async fn test_append_flattens_row() {
        let store = UsageStore::in_memory().await.unwrap();
        let id = store.append(&entry("example.com", 0)).await.unwrap();

        type Row = (String, bool, bool, bool, bool, Option<String>, Option<i64>);
        let row = sqlx::query_as::<_, Row>(
            "SELECT timestamp, spf_exists, dkim_bh, dkim_ba, dkim_hf2, dmarc_policy, score
             FROM audit_log WHERE id = ?",
        )
        .bind(id)
        .fetch_one(store.pool())
        .await
        .unwrap();

        assert_eq!(row.0, "2026-03-01T12:00:00.000Z");
        assert!(row.1);
        assert!(row.2);
        assert!(!row.3);
        assert!(row.4);
        assert_eq!(row.5.as_deref(), Some("quarantine"));
        assert_eq!(row.6, Some(86));
    }

    #[tokio::test]
    async fn test_empty_stats() {
        let store = UsageStore::in_memory().await.unwrap();
        let stats = store.stats(20, 10).await.unwrap();
        assert_eq!(stats, UsageStats::default());
    }

    #[tokio::test]
    async fn test_stats_ordering_and_limits() {
        let store = UsageStore::in_memory().await.unwrap();
        for (i, domain) in ["b.example", "a.example", "b.example", "c.example", "a.example"]
            .into_iter()
            .enumerate()
        {
            store
                .append(&entry(domain, u32::try_from(i).unwrap()))
                .await
                .unwrap();
        }

        let stats = store.stats(3, 2).await.unwrap();
        assert_eq!(stats.total_checks, 5);

        let recent: Vec<_> = stats.recent_checks.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(recent, ["a.example", "c.example", "b.example"]);
        assert_eq!(stats.recent_checks[0].timestamp, "2026-03-01T12:00:04.000Z");

        // a and b tie on count; the tie breaks alphabetically.
        assert_eq!(
            stats.top_domains,
            vec![
                DomainCount { domain: "a.example".into(), count: 2 },
                DomainCount { domain: "b.example".into(), count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_same_timestamp_newest_row_first() {
        let store = UsageStore::in_memory().await.unwrap();
        store.append(&entry("first.example", 0)).await.unwrap();
        store.append(&entry("second.example", 0)).await.unwrap();

        let stats = store.stats(20, 10).await.unwrap();
        assert_eq!(stats.recent_checks[0].domain, "second.example");
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.db");
        let url = format!("sqlite://{}", path.display());

        let store = UsageStore::connect(&url).await.unwrap();
        store.append(&entry("example.com", 0)).await.unwrap();
        assert!(path.exists());

        let reopened = UsageStore::connect(&url).await.unwrap();
        assert_eq!(reopened.stats(20, 10).await.unwrap().total_checks, 1);
    }
}
