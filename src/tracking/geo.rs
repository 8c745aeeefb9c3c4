//! IP geolocation via the ipinfo.io HTTP API
//!
//! Lookups are best-effort: any failure (missing token, network error,
//! non-2xx, malformed body) degrades to a fixed fallback location and is
//! never surfaced to the caller.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::IpAddr;
use tracing::{debug, warn};

use crate::config::GeoConfig;
use crate::models::GeoLocation;

pub struct GeoResolver {
    client: reqwest::Client,
    config: GeoConfig,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    #[serde(default)]
    loc: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
}

impl GeoResolver {
    pub fn new(config: GeoConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Resolve an IP to an approximate location. Never fails: local or
    /// unresolvable IPs get the fallback location. One outbound GET, no
    /// retries; the call runs on the recording task and blocks it for the
    /// duration of the request.
    pub async fn resolve(&self, ip: &str) -> GeoLocation {
        if ip.is_empty() || is_loopback(ip) {
            debug!(%ip, "local address, using fallback location");
            return GeoLocation::fallback();
        }

        let Some(token) = self.config.token.as_deref() else {
            warn!("IPINFO_TOKEN is not set, using fallback location");
            return GeoLocation::fallback();
        };

        match self.fetch(ip, token).await {
            Ok(location) => {
                debug!(%ip, city = %location.city, country = %location.country, "resolved geolocation");
                location
            }
            Err(err) => {
                warn!(%ip, error = %err, "geolocation lookup failed, using fallback location");
                GeoLocation::fallback()
            }
        }
    }

    async fn fetch(&self, ip: &str, token: &str) -> Result<GeoLocation> {
        let url = format!("{}/{}?token={}", self.config.api_base_url, ip, token);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("geolocation request failed")?
            .error_for_status()?;

        let body: IpInfoResponse = response
            .json()
            .await
            .context("failed to parse geolocation response")?;

        let (latitude, longitude) = parse_loc(&body.loc)?;
        Ok(GeoLocation {
            latitude,
            longitude,
            city: body.city,
            country: body.country,
        })
    }
}

fn is_loopback(ip: &str) -> bool {
    ip.parse::<IpAddr>().map(|a| a.is_loopback()).unwrap_or(false)
}

/// Parse the ipinfo "lat,lon" location string
fn parse_loc(loc: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = loc.split(',').collect();
    if parts.len() != 2 {
        bail!("invalid location format: {loc:?}");
    }
    let latitude = parts[0]
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid latitude: {:?}", parts[0]))?;
    let longitude = parts[1]
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid longitude: {:?}", parts[1]))?;
    Ok((latitude, longitude))
}
