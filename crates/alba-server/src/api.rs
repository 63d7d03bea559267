use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::Method,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use alba_shared::weather::WeatherData;
use alba_shared::Coordinates;

use crate::error::ServerError;
use crate::upstream::Upstream;

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<Upstream>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/weather", get(weather))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Raw query; parsed by hand so a bad value gets the JSON error body.
#[derive(Debug, Deserialize)]
struct WeatherQuery {
    lat: Option<String>,
    lon: Option<String>,
}

impl WeatherQuery {
    fn coordinates(&self) -> Result<Coordinates, ServerError> {
        let (Some(lat), Some(lon)) = (non_empty(&self.lat), non_empty(&self.lon)) else {
            return Err(ServerError::BadRequest(
                "Latitude and longitude are required".into(),
            ));
        };

        let latitude = parse_degrees(lat, 90.0)
            .ok_or_else(|| ServerError::BadRequest(format!("Invalid latitude: {lat}")))?;
        let longitude = parse_degrees(lon, 180.0)
            .ok_or_else(|| ServerError::BadRequest(format!("Invalid longitude: {lon}")))?;

        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_degrees(value: &str, limit: f64) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherData>, ServerError> {
    let coords = query.coordinates()?;
    let data = state.upstream.lookup(coords).await?;

    tracing::debug!(
        city = %data.city,
        temperature = data.temperature,
        weathercode = data.weathercode,
        "weather served"
    );

    Ok(Json(data))
}

/// Start the HTTP API server on the given address.
pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
