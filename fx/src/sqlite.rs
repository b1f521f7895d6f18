//! SQLite-backed rate store.

use async_trait::async_trait;
use ratedesk_common::{CurrencyPair, RateEntry};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, error, info};

use crate::error::{RateError, RateResult};
use crate::store::RateStore;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS currencies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    base TEXT NOT NULL,
    target TEXT NOT NULL,
    rate TEXT NOT NULL,
    UNIQUE (base, target)
)";

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Rates persisted in a `currencies` table.
///
/// Rates are stored as decimal text so a round trip returns the exact value
/// that was written.
#[derive(Clone)]
pub struct SqliteRateStore {
    pool: SqlitePool,
}

impl SqliteRateStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> RateResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(internal)?
            .create_if_missing(true);

        // Every connection to a memory URL opens its own empty database.
        let pool_options = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(internal)?;

        info!(url = %url, "Connected to SQLite rate store");
        Self::from_pool(pool).await
    }

    /// A private in-memory database. One connection, kept open for the
    /// lifetime of the pool.
    pub async fn in_memory() -> RateResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(internal)?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and ensure the schema.
    pub async fn from_pool(pool: SqlitePool) -> RateResult<Self> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(internal)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl RateStore for SqliteRateStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, pair: &CurrencyPair) -> RateResult<Decimal> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT rate FROM currencies WHERE base = ?1 AND target = ?2")
                .bind(pair.base.code())
                .bind(pair.target.code())
                .fetch_optional(&self.pool)
                .await
                .map_err(internal)?;

        match stored {
            Some(text) => {
                debug!(pair = %pair, rate = %text, "Store hit");
                parse_rate(&text)
            }
            None => {
                debug!(pair = %pair, "Store miss");
                Err(RateError::NotFound(pair.clone()))
            }
        }
    }

    async fn put(&self, pair: CurrencyPair, rate: Decimal) -> RateResult<RateEntry> {
        let entry = RateEntry::new(pair, rate)?;

        sqlx::query(
            "INSERT INTO currencies (base, target, rate) VALUES (?1, ?2, ?3)
             ON CONFLICT (base, target) DO UPDATE SET rate = excluded.rate",
        )
        .bind(entry.base().code())
        .bind(entry.target().code())
        .bind(entry.rate.to_string())
        .execute(&self.pool)
        .await
        .map_err(internal)?;

        info!(pair = %entry.pair, rate = %entry.rate, "Stored rate");
        Ok(entry)
    }

    async fn update(&self, pair: CurrencyPair, rate: Decimal) -> RateResult<RateEntry> {
        let entry = RateEntry::new(pair, rate)?;

        let result = sqlx::query("UPDATE currencies SET rate = ?3 WHERE base = ?1 AND target = ?2")
            .bind(entry.base().code())
            .bind(entry.target().code())
            .bind(entry.rate.to_string())
            .execute(&self.pool)
            .await
            .map_err(internal)?;

        if result.rows_affected() == 0 {
            return Err(RateError::NotFound(entry.pair));
        }

        info!(pair = %entry.pair, rate = %entry.rate, "Updated rate");
        Ok(entry)
    }

    async fn remove(&self, pair: &CurrencyPair) -> RateResult<()> {
        let result = sqlx::query("DELETE FROM currencies WHERE base = ?1 AND target = ?2")
            .bind(pair.base.code())
            .bind(pair.target.code())
            .execute(&self.pool)
            .await
            .map_err(internal)?;

        if result.rows_affected() == 0 {
            return Err(RateError::NotFound(pair.clone()));
        }

        info!(pair = %pair, "Removed rate");
        Ok(())
    }

    async fn list(&self) -> RateResult<Vec<RateEntry>> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT base, target, rate FROM currencies ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(internal)?;

        rows.into_iter()
            .map(|(base, target, rate)| {
                let pair = CurrencyPair::from_codes(&base, &target).map_err(|e| {
                    error!(base = %base, target = %target, error = %e, "Corrupt pair in store");
                    RateError::Internal(e.to_string())
                })?;
                Ok(RateEntry {
                    pair,
                    rate: parse_rate(&rate)?,
                })
            })
            .collect()
    }

    async fn len(&self) -> RateResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM currencies")
            .fetch_one(&self.pool)
            .await
            .map_err(internal)?;

        Ok(count as usize)
    }
}

fn parse_rate(text: &str) -> RateResult<Decimal> {
    Decimal::from_str(text).map_err(|e| {
        error!(rate = %text, error = %e, "Corrupt rate in store");
        RateError::Internal(e.to_string())
    })
}

fn internal(e: sqlx::Error) -> RateError {
    error!(error = %e, "SQLite store failure");
    RateError::Internal(e.to_string())
}
