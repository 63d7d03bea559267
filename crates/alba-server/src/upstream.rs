//! Calls to the two public services behind `/api/weather`: Open-Meteo for
//! current conditions and Nominatim for the place name.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use alba_shared::constants::UNKNOWN_LOCATION;
use alba_shared::weather::WeatherData;
use alba_shared::Coordinates;

use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

impl Address {
    /// Most specific non-empty place name.
    fn place_name(self) -> Option<String> {
        [self.city, self.town, self.village, self.state]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
    }
}

/// HTTP client for the forecast and geocoding services.
#[derive(Debug, Clone)]
pub struct Upstream {
    http: Client,
    forecast_url: String,
    geocode_url: String,
}

impl Upstream {
    pub fn new(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            forecast_url: config.open_meteo_url.clone(),
            geocode_url: config.nominatim_url.clone(),
        })
    }

    /// Current conditions merged with the place name. Both services are
    /// queried concurrently; only a forecast failure is an error.
    pub async fn lookup(&self, coords: Coordinates) -> Result<WeatherData, ServerError> {
        let (forecast, city) = tokio::join!(self.forecast(coords), self.city_name(coords));
        let current = forecast?;

        Ok(WeatherData {
            temperature: current.temperature.round() as i32,
            weathercode: current.weathercode,
            city,
            timestamp: Utc::now(),
        })
    }

    async fn forecast(&self, coords: Coordinates) -> Result<CurrentWeather, ServerError> {
        let response = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "forecast request failed");
                ServerError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "forecast service returned an error");
            return Err(ServerError::Upstream(format!("forecast status {status}")));
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "forecast response undecodable");
            ServerError::from(e)
        })?;
        Ok(body.current_weather)
    }

    /// Place name for the coordinates, or the unknown-location label when
    /// geocoding fails in any way.
    async fn city_name(&self, coords: Coordinates) -> String {
        match self.reverse_geocode(coords).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_LOCATION.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "reverse geocoding failed");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Option<String>, reqwest::Error> {
        let body: ReverseResponse = self
            .http
            .get(&self.geocode_url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.address.place_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(city: Option<&str>, town: Option<&str>, village: Option<&str>, state: Option<&str>) -> Address {
        Address {
            city: city.map(String::from),
            town: town.map(String::from),
            village: village.map(String::from),
            state: state.map(String::from),
        }
    }

    #[test]
    fn test_place_name_precedence() {
        assert_eq!(
            address(Some("Lisbon"), Some("Belém"), None, Some("Lisboa")).place_name(),
            Some("Lisbon".into())
        );
        assert_eq!(
            address(None, None, Some("Sintra"), Some("Lisboa")).place_name(),
            Some("Sintra".into())
        );
        assert_eq!(
            address(Some(""), None, None, Some("Minas Gerais")).place_name(),
            Some("Minas Gerais".into())
        );
        assert_eq!(address(None, None, None, None).place_name(), None);
    }

    #[test]
    fn test_reverse_response_without_address() {
        let body: ReverseResponse = serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert_eq!(body.address.place_name(), None);
    }
}
