use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CountryCount, DailyCount, GeoLocation, Visitor};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create the visitors table, add missing columns)
    async fn init(&self) -> Result<()>;

    /// Record a visit for the given IP. A no-op when a row for that IP
    /// already exists: first-write-wins, coordinates are never refreshed.
    async fn record_visit(&self, ip: &str, location: &GeoLocation) -> StorageResult<()>;

    /// Full scan of all recorded visitors, in storage order
    async fn list_visitors(&self) -> StorageResult<Vec<Visitor>>;

    /// Count of distinct visitor IPs
    async fn count_unique(&self) -> StorageResult<i64>;

    /// Visit counts grouped by country
    async fn count_by_country(&self) -> StorageResult<Vec<CountryCount>>;

    /// `COUNT(ip) - COUNT(DISTINCT ip)`. With `ip` as the primary key this
    /// is structurally always zero; the formula predates the unique-IP
    /// schema and is kept as-is rather than redefined.
    async fn count_returning(&self) -> StorageResult<i64>;

    /// Visit counts grouped by the calendar date of first visit, ascending
    async fn count_by_day(&self) -> StorageResult<Vec<DailyCount>>;
}
