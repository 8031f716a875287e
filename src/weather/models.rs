use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ============================================================================
// OpenWeatherMap 2.5 Responses (Internal)
// Every field is optional so that a missing field surfaces as a typed
// validation error in the shaper instead of a generic decode failure.
// ============================================================================

/// `cod` / `message` pair present on both success and error bodies
#[derive(Debug, Default, Deserialize)]
pub struct StatusEnvelope {
    pub cod: Option<Value>,
    pub message: Option<Value>,
}

impl StatusEnvelope {
    /// `cod` as a string; the API sends it as a number on success and as a
    /// string on errors
    pub fn code(&self) -> Option<String> {
        match self.cod.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherPayload {
    pub name: Option<String>,
    pub main: Option<MainPayload>,
    #[serde(default)]
    pub weather: Vec<ConditionPayload>,
    pub wind: Option<WindPayload>,
    pub sys: Option<SysPayload>,
    /// Shift in seconds from UTC
    pub timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct MainPayload {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u32>,
    pub pressure: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionPayload {
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WindPayload {
    pub speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SysPayload {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// 5 day / 3 hour forecast
#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub list: Option<Vec<ForecastItemPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastItemPayload {
    pub dt: Option<i64>,
    pub main: Option<ForecastMainPayload>,
    #[serde(default)]
    pub weather: Vec<ConditionPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastMainPayload {
    pub temp: Option<f64>,
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

/// Current conditions plus the next forecast entries for one city
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Percent
    pub humidity: u32,
    /// hPa
    pub pressure: u32,
    pub description: String,
    /// Icon image URL
    pub icon: String,
    /// m/s
    pub wind_speed: f64,
    /// `hh:mm AM`, displayed in UTC
    pub sunrise: String,
    /// `hh:mm PM`, displayed in UTC
    pub sunset: String,
    /// Seconds east of UTC
    pub timezone_offset: i32,
    /// At most 8 entries, all in the future, in upstream order
    pub forecast: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastEntry {
    /// Unix seconds, UTC
    pub timestamp: i64,
    /// Local wall-clock time, `hh:mm AM`
    pub time: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}
