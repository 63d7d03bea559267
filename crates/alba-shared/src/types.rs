use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE};

// Tea identity = random UUID assigned by the store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TeaId(pub Uuid);

impl TeaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TeaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeaId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The closed set of tea kinds. Every tea has exactly one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TeaType {
    Black,
    Green,
    White,
    Oolong,
    Puerh,
}

impl TeaType {
    pub const ALL: [TeaType; 5] = [
        TeaType::Black,
        TeaType::Green,
        TeaType::White,
        TeaType::Oolong,
        TeaType::Puerh,
    ];

    /// Lowercase value used in payloads, query strings and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TeaType::Black => "black",
            TeaType::Green => "green",
            TeaType::White => "white",
            TeaType::Oolong => "oolong",
            TeaType::Puerh => "puerh",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TeaType::Black => "Black",
            TeaType::Green => "Green",
            TeaType::White => "White",
            TeaType::Oolong => "Oolong",
            TeaType::Puerh => "Pu-erh",
        }
    }

    /// Image shown for a tea that has none of its own.
    pub fn default_image(&self) -> &'static str {
        match self {
            TeaType::Black => "/images/teas/black_tea.png",
            TeaType::Green => "/images/teas/green_tea.png",
            TeaType::White => "/images/teas/white_tea.png",
            TeaType::Oolong => "/images/teas/oolong_tea.jpg",
            TeaType::Puerh => "/images/teas/puerh_tea.jpg",
        }
    }
}

impl fmt::Display for TeaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for TeaType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TeaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Collection filter: the five types plus two cross-cutting buckets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "String", into = "String")]
pub enum TeaFilter {
    #[default]
    All,
    Favorite,
    Type(TeaType),
}

impl TeaFilter {
    pub const ALL: [TeaFilter; 7] = [
        TeaFilter::All,
        TeaFilter::Favorite,
        TeaFilter::Type(TeaType::Black),
        TeaFilter::Type(TeaType::Green),
        TeaFilter::Type(TeaType::White),
        TeaFilter::Type(TeaType::Oolong),
        TeaFilter::Type(TeaType::Puerh),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeaFilter::All => "all",
            TeaFilter::Favorite => "favorite",
            TeaFilter::Type(t) => t.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TeaFilter::All => "All",
            TeaFilter::Favorite => "Favorites",
            TeaFilter::Type(t) => t.label(),
        }
    }

    /// Parse the `type` query parameter of the closet view. Absent or
    /// unrecognised values select everything.
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(TeaFilter::All)
    }
}

impl fmt::Display for TeaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeaFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TeaFilter::All),
            "favorite" => Ok(TeaFilter::Favorite),
            other => other.parse().map(TeaFilter::Type),
        }
    }
}

impl TryFrom<String> for TeaFilter {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TeaFilter> for String {
    fn from(filter: TeaFilter) -> Self {
        filter.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProfileLevel {
    Beginner,
    Connoisseur,
    Master,
}

/// Display metadata for a profile level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl ProfileLevel {
    pub fn info(&self) -> LevelInfo {
        match self {
            ProfileLevel::Beginner => LevelInfo {
                label: "Beginner",
                description: "Just starting your tea journey",
                icon: "🌱",
            },
            ProfileLevel::Connoisseur => LevelInfo {
                label: "Connoisseur",
                description: "Developing refined taste",
                icon: "🍃",
            },
            ProfileLevel::Master => LevelInfo {
                label: "Master",
                description: "Expert in tea appreciation",
                icon: "🏆",
            },
        }
    }
}

/// Latitude / longitude in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tea_type_serde_lowercase() {
        let json = serde_json::to_string(&TeaType::Puerh).unwrap();
        assert_eq!(json, "\"puerh\"");
        let back: TeaType = serde_json::from_str("\"oolong\"").unwrap();
        assert_eq!(back, TeaType::Oolong);
    }

    #[test]
    fn test_tea_type_rejects_unknown() {
        assert!("infusion".parse::<TeaType>().is_err());
        assert!(serde_json::from_str::<TeaType>("\"herbal\"").is_err());
        let err = "infusion".parse::<TeaType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown value: infusion");
    }

    #[test]
    fn test_level_info() {
        let info = ProfileLevel::Connoisseur.info();
        assert_eq!(info.label, "Connoisseur");
        assert_eq!(info.description, "Developing refined taste");
        assert_eq!(ProfileLevel::Master.info().label, "Master");
    }

    #[test]
    fn test_filter_from_query() {
        assert_eq!(TeaFilter::from_query(None), TeaFilter::All);
        assert_eq!(TeaFilter::from_query(Some("favorite")), TeaFilter::Favorite);
        assert_eq!(
            TeaFilter::from_query(Some("green")),
            TeaFilter::Type(TeaType::Green)
        );
        assert_eq!(TeaFilter::from_query(Some("bogus")), TeaFilter::All);
    }

    #[test]
    fn test_filter_serializes_as_plain_string() {
        let json = serde_json::to_string(&TeaFilter::Type(TeaType::White)).unwrap();
        assert_eq!(json, "\"white\"");
        let back: TeaFilter = serde_json::from_str("\"favorite\"").unwrap();
        assert_eq!(back, TeaFilter::Favorite);
    }

    #[test]
    fn test_filter_labels() {
        assert_eq!(TeaFilter::Favorite.label(), "Favorites");
        assert_eq!(TeaFilter::Type(TeaType::Puerh).label(), "Pu-erh");
        assert_eq!(TeaFilter::ALL.len(), 7);
    }

    #[test]
    fn test_tea_id_parse_round_trip() {
        let id = TeaId::new();
        let parsed: TeaId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<TeaId>().is_err());
    }

    #[test]
    fn test_default_coordinates() {
        let c = Coordinates::default();
        assert_eq!(c.latitude, DEFAULT_LATITUDE);
        assert_eq!(c.longitude, DEFAULT_LONGITUDE);
    }
}
