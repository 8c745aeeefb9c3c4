use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::pages::Pages;
use crate::storage::Storage;
use crate::tracking::{extract_client_ip, GeoResolver};

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub geo: Arc<GeoResolver>,
    pub pages: Pages,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub unique_visitors: i64,
}

#[derive(Serialize)]
pub struct StatisticsResponse {
    pub labels: Vec<String>,
    pub counts: Vec<i64>,
}

#[derive(Serialize)]
pub struct VisitorTypesResponse {
    pub unique_visitors: i64,
    pub returning_visitors: i64,
}

#[derive(Serialize)]
pub struct TrendsResponse {
    pub dates: Vec<String>,
    pub visitor_counts: Vec<i64>,
}

fn internal_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Landing page. Serving the page also records the visit: IP extraction,
/// geolocation and the insert run on a spawned task so the response never
/// waits on the lookup and recording failures are logged only.
pub async fn index_page(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Html<String> {
    let ip = extract_client_ip(&headers, addr);
    info!(%ip, "visitor");

    let storage = Arc::clone(&state.storage);
    let geo = Arc::clone(&state.geo);
    tokio::spawn(async move {
        let location = geo.resolve(&ip).await;
        if let Err(err) = storage.record_visit(&ip, &location).await {
            error!(%ip, error = %err, "failed to record visit");
        }
    });

    Html(state.pages.index.clone())
}

/// Statistics dashboard page; the page itself pulls its data from the
/// /api routes client-side.
pub async fn stats_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.pages.stats.clone())
}

pub async fn api_visitors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.list_visitors().await {
        Ok(visitors) => Json(visitors).into_response(),
        Err(err) => {
            error!(error = %err, "failed to list visitors");
            internal_error().into_response()
        }
    }
}

pub async fn api_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.count_unique().await {
        Ok(unique_visitors) => Json(StatsResponse { unique_visitors }).into_response(),
        Err(err) => {
            error!(error = %err, "failed to count unique visitors");
            internal_error().into_response()
        }
    }
}

/// Per-country breakdown as parallel label/count arrays, the shape the
/// dashboard charting code consumes directly.
pub async fn api_statistics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.count_by_country().await {
        Ok(rows) => {
            let mut labels = Vec::with_capacity(rows.len());
            let mut counts = Vec::with_capacity(rows.len());
            for row in rows {
                labels.push(row.country);
                counts.push(row.count);
            }
            Json(StatisticsResponse { labels, counts }).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to count visitors by country");
            internal_error().into_response()
        }
    }
}

pub async fn api_visitor_types(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let unique_visitors = match state.storage.count_unique().await {
        Ok(count) => count,
        Err(err) => {
            error!(error = %err, "failed to count unique visitors");
            return internal_error().into_response();
        }
    };

    // Always zero while ip is the table's primary key; kept because the
    // dashboard still charts the pair. See Storage::count_returning.
    let returning_visitors = match state.storage.count_returning().await {
        Ok(count) => count,
        Err(err) => {
            error!(error = %err, "failed to count returning visitors");
            return internal_error().into_response();
        }
    };

    Json(VisitorTypesResponse {
        unique_visitors,
        returning_visitors,
    })
    .into_response()
}

pub async fn api_trends(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.count_by_day().await {
        Ok(rows) => {
            let mut dates = Vec::with_capacity(rows.len());
            let mut visitor_counts = Vec::with_capacity(rows.len());
            for row in rows {
                dates.push(row.date);
                visitor_counts.push(row.count);
            }
            Json(TrendsResponse {
                dates,
                visitor_counts,
            })
            .into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to count visitors by day");
            internal_error().into_response()
        }
    }
}
