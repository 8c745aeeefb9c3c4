use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded visitor, one row per distinct IP
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Visitor {
    pub ip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

/// Approximate geographic location resolved from an IP address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

impl GeoLocation {
    /// Fixed location substituted whenever resolution cannot complete
    pub fn fallback() -> Self {
        Self {
            latitude: 37.7749,
            longitude: -122.4194,
            city: "San Francisco".to_string(),
            country: "United States".to_string(),
        }
    }
}

/// Visit count for a single country
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CountryCount {
    pub country: String,
    pub count: i64,
}

/// Visit count for a single calendar day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}
