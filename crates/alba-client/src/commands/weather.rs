//! Weather widget commands and the HTTP client for the weather proxy.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, warn};

use alba_shared::weather::{WeatherData, WeatherIcon};
use alba_shared::Coordinates;

use crate::error::{CommandError, WeatherError};
use crate::events::{emit_event, AppEvent};
use crate::state::AppState;

/// Client for `GET {base}/api/weather`.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch(&self, coords: Coordinates) -> Result<WeatherData, WeatherError> {
        let url = format!("{}/api/weather", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("lat", coords.latitude), ("lon", coords.longitude)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::from_status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| WeatherError::Decode(e.to_string()))
    }
}

/// What the weather widget should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WeatherStatus {
    Ready {
        weather: WeatherData,
        /// Served from the cache without a network round trip.
        cached: bool,
    },
    Unavailable {
        message: String,
        /// Whether a retry control makes sense.
        retry_allowed: bool,
        /// Previous reading, however old.
        last_known: Option<WeatherData>,
    },
}

impl WeatherStatus {
    /// The reading to display: the current one, or the last known one when
    /// the fetch failed.
    pub fn reading(&self) -> Option<&WeatherData> {
        match self {
            WeatherStatus::Ready { weather, .. } => Some(weather),
            WeatherStatus::Unavailable { last_known, .. } => last_known.as_ref(),
        }
    }

    pub fn icon(&self) -> Option<WeatherIcon> {
        self.reading().map(WeatherData::icon)
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        self.reading().map(WeatherData::suggestion)
    }
}

/// Current weather for the last known location. A fresh cached reading is
/// reused unless `force` is set. Failures never propagate.
pub async fn current_weather(state: &AppState, force: bool) -> WeatherStatus {
    if !force {
        match state.weather_cache.fresh_weather(Utc::now()) {
            Ok(Some(weather)) => {
                debug!(city = %weather.city, "serving cached weather");
                return WeatherStatus::Ready {
                    weather,
                    cached: true,
                };
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "weather cache unreadable"),
        }
    }

    let coords = state.weather_cache.coords().unwrap_or_else(|e| {
        warn!(error = %e, "stored location unreadable, using default");
        Coordinates::default()
    });

    match state.weather.fetch(coords).await {
        Ok(weather) => {
            if let Err(e) = state.weather_cache.store_weather(&weather) {
                warn!(error = %e, "failed to cache weather");
            }
            emit_event(
                &state.events,
                AppEvent::WeatherUpdated {
                    city: weather.city.clone(),
                    temperature: weather.temperature,
                },
            );
            WeatherStatus::Ready {
                weather,
                cached: false,
            }
        }
        Err(e) => {
            error!(error = %e, "weather fetch failed");
            WeatherStatus::Unavailable {
                message: e.to_string(),
                retry_allowed: e.is_retryable(),
                last_known: state.weather_cache.load().ok().flatten(),
            }
        }
    }
}

/// Remember where the user is. The next refresh uses these coordinates.
pub fn set_location(state: &AppState, coords: Coordinates) -> Result<(), CommandError> {
    state.weather_cache.store_coords(coords)?;
    Ok(())
}
