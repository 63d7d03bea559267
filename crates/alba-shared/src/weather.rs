//! Weather payload shared by the proxy server and the client, plus the
//! rules that turn a reading into a tea suggestion.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::WEATHER_FRESHNESS_SECS;

/// Current conditions as returned by the weather proxy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherData {
    /// Rounded degrees Celsius.
    pub temperature: i32,
    /// WMO weather interpretation code.
    pub weathercode: i32,
    pub city: String,
    pub timestamp: DateTime<Utc>,
}

impl WeatherData {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_code(self.weathercode)
    }

    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::from_code(self.weathercode)
    }

    pub fn suggestion(&self) -> &'static str {
        tea_suggestion(self.temperature, self.weathercode)
    }

    /// Readings younger than the freshness window are reused instead of
    /// refetched. A reading stamped after `now` is never fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        let age = now - self.timestamp;
        age >= Duration::zero() && age < Duration::seconds(WEATHER_FRESHNESS_SECS)
    }

    /// "Weather in Lisbon looks partly cloudy right now."
    pub fn summary(&self) -> String {
        format!(
            "Weather in {} looks {} right now.",
            self.city,
            self.condition().phrase()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    DepositingRimeFog,
    LightDrizzle,
    ModerateDrizzle,
    DenseDrizzle,
    SlightRain,
    ModerateRain,
    HeavyRain,
    SlightRainShowers,
    ModerateRainShowers,
    ViolentRainShowers,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 => Self::Fog,
            48 => Self::DepositingRimeFog,
            51 => Self::LightDrizzle,
            53 => Self::ModerateDrizzle,
            55 => Self::DenseDrizzle,
            61 => Self::SlightRain,
            63 => Self::ModerateRain,
            65 => Self::HeavyRain,
            80 => Self::SlightRainShowers,
            81 => Self::ModerateRainShowers,
            82 => Self::ViolentRainShowers,
            95 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::MainlyClear => "mainly-clear",
            Self::PartlyCloudy => "partly-cloudy",
            Self::Overcast => "overcast",
            Self::Fog => "fog",
            Self::DepositingRimeFog => "depositing-rime-fog",
            Self::LightDrizzle => "light-drizzle",
            Self::ModerateDrizzle => "moderate-drizzle",
            Self::DenseDrizzle => "dense-drizzle",
            Self::SlightRain => "slight-rain",
            Self::ModerateRain => "moderate-rain",
            Self::HeavyRain => "heavy-rain",
            Self::SlightRainShowers => "slight-rain-showers",
            Self::ModerateRainShowers => "moderate-rain-showers",
            Self::ViolentRainShowers => "violent-rain-showers",
            Self::Thunderstorm => "thunderstorm",
            Self::Unknown => "unknown",
        }
    }

    pub fn phrase(&self) -> String {
        self.slug().replace('-', " ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    Sun,
    Rain,
    Cloud,
}

impl WeatherIcon {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 | 1 => Self::Sun,
            61..=82 => Self::Rain,
            _ => Self::Cloud,
        }
    }
}

pub fn tea_suggestion(temperature: i32, weathercode: i32) -> &'static str {
    match weathercode {
        0 | 1 if temperature > 20 => "How about some iced tea to cool down?",
        61..=82 => "Perfect weather for a warm cup of tea!",
        _ => "How about a cup of tea?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: i32, weathercode: i32) -> WeatherData {
        WeatherData {
            temperature,
            weathercode,
            city: "Lisbon".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(tea_suggestion(25, 0), "How about some iced tea to cool down?");
        assert_eq!(tea_suggestion(20, 1), "How about a cup of tea?");
        assert_eq!(tea_suggestion(12, 63), "Perfect weather for a warm cup of tea!");
        assert_eq!(tea_suggestion(30, 3), "How about a cup of tea?");
    }

    #[test]
    fn test_icons() {
        assert_eq!(WeatherIcon::from_code(1), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_code(80), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::from_code(95), WeatherIcon::Cloud);
        assert_eq!(reading(12, 63).icon(), WeatherIcon::Rain);
    }

    #[test]
    fn test_summary_uses_spaced_phrase() {
        assert_eq!(
            reading(18, 2).summary(),
            "Weather in Lisbon looks partly cloudy right now."
        );
        assert_eq!(WeatherCondition::from_code(7), WeatherCondition::Unknown);
    }

    #[test]
    fn test_freshness_window() {
        let data = reading(18, 2);
        assert!(data.is_fresh_at(data.timestamp + Duration::minutes(29)));
        assert!(!data.is_fresh_at(data.timestamp + Duration::minutes(30)));
    }

    #[test]
    fn test_future_reading_is_stale() {
        let data = reading(18, 2);
        assert!(data.is_fresh_at(data.timestamp));
        assert!(!data.is_fresh_at(data.timestamp - Duration::hours(2)));
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"temperature":21,"weathercode":3,"city":"Porto","timestamp":"2025-01-01T10:00:00.000Z"}"#;
        let data: WeatherData = serde_json::from_str(json).unwrap();
        assert_eq!(data.city, "Porto");
        assert_eq!(data.condition(), WeatherCondition::Overcast);
    }
}
