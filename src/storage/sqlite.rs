use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::warn;

use crate::models::{CountryCount, DailyCount, GeoLocation, Visitor};
use crate::storage::{Storage, StorageResult};

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Additively add a column to the visitors table. Deployments upgrading
    /// from the early ip-only schema are missing city, country and
    /// timestamp; a "duplicate column name" failure means the column is
    /// already there and is swallowed. Anything else is logged and ignored,
    /// the process continues with whatever schema it has.
    async fn add_column_if_missing(&self, name: &str, column_type: &str) {
        let query = format!("ALTER TABLE visitors ADD COLUMN {} {}", name, column_type);
        if let Err(err) = sqlx::query(&query).execute(self.pool.as_ref()).await {
            if !err.to_string().contains("duplicate column name") {
                warn!(column = name, error = %err, "failed to add column to visitors table");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS visitors (
                ip TEXT PRIMARY KEY,
                latitude REAL,
                longitude REAL,
                city TEXT,
                country TEXT,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        self.add_column_if_missing("city", "TEXT").await;
        self.add_column_if_missing("country", "TEXT").await;
        self.add_column_if_missing("timestamp", "DATETIME DEFAULT CURRENT_TIMESTAMP")
            .await;

        Ok(())
    }

    async fn record_visit(&self, ip: &str, location: &GeoLocation) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO visitors (ip, latitude, longitude, city, country)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(ip) DO NOTHING
            "#,
        )
        .bind(ip)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.city)
        .bind(&location.country)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list_visitors(&self) -> StorageResult<Vec<Visitor>> {
        let visitors = sqlx::query_as::<_, Visitor>(
            r#"
            SELECT ip,
                   COALESCE(latitude, 0) AS latitude,
                   COALESCE(longitude, 0) AS longitude,
                   COALESCE(city, '') AS city,
                   COALESCE(country, '') AS country
            FROM visitors
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visitors)
    }

    async fn count_unique(&self) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT ip) FROM visitors")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_by_country(&self) -> StorageResult<Vec<CountryCount>> {
        let counts = sqlx::query_as::<_, CountryCount>(
            r#"
            SELECT COALESCE(country, '') AS country, COUNT(*) AS count
            FROM visitors
            GROUP BY country
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }

    async fn count_returning(&self) -> StorageResult<i64> {
        // Always zero while ip is the primary key; see the trait docs.
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(ip) - COUNT(DISTINCT ip) FROM visitors")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn count_by_day(&self) -> StorageResult<Vec<DailyCount>> {
        let counts = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT DATE(timestamp) AS date, COUNT(*) AS count
            FROM visitors
            GROUP BY DATE(timestamp)
            ORDER BY date
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }
}
