/// Durable storage slot keys
pub const SLOT_TEAS: &str = "alba_teas";
pub const SLOT_PROFILE: &str = "alba_profile";
pub const SLOT_PREFERENCES: &str = "alba_preferences";
pub const SLOT_WEATHER: &str = "alba_weather";
pub const SLOT_COORDS: &str = "alba_coords";

/// Schema version tag written alongside the persisted tea collection
pub const TEAS_SCHEMA_VERSION: u32 = 1;

/// Form limits
pub const MAX_NAME_WORDS: usize = 5;
pub const MAX_DESCRIPTION_WORDS: usize = 30;
pub const MIN_BREW_TIME: i64 = 0;
pub const MAX_BREW_TIME: i64 = 30;

/// Cached weather stays fresh for 30 minutes
pub const WEATHER_FRESHNESS_SECS: i64 = 30 * 60;

/// Fallback coordinates (Rio de Janeiro) when no location is known
pub const DEFAULT_LATITUDE: f64 = -22.9068;
pub const DEFAULT_LONGITUDE: f64 = -43.1729;

/// City name used when reverse geocoding yields nothing
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Viewport width (px) from which secondary actions open as overlays
pub const BREAKPOINT_DESKTOP: u32 = 1024;

/// Id and display defaults of the built-in profile
pub const DEFAULT_PROFILE_ID: &str = "lucca";
pub const DEFAULT_PROFILE_NAME: &str = "Tea Lover";
pub const DEFAULT_PROFILE_PHOTO: &str = "/images/profile/generic-profile.png";
