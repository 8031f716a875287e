//! Renders the weather context and user question into a single prompt.

use chrono::{DateTime, Offset, Utc};
use std::fmt;

use super::models::{ForecastContextEntry, WeatherContext};
use crate::clock;

pub const FORECAST_HEADER: &str =
    "Here is the forecast for the next 24 hours (3-hour intervals):";

pub const FORECAST_FALLBACK: &str = "No detailed forecast data available for the next 24 hours.";

pub const INSTRUCTIONS: &str = "Answer the user's question concisely and accurately based on the \
provided current and forecast weather information. If the question asks about a time beyond the \
provided forecast, state that. If the question is not directly about weather or the provided data, \
politely state that you can only answer weather-related questions based on the available data. \
Answer in the same language as the user's question if possible.";

/// Prompt for one question; render with `to_string()`.
pub struct WeatherPrompt<'a> {
    pub question: &'a str,
    pub weather: &'a WeatherContext,
    pub forecast: &'a [ForecastContextEntry],
    /// Processing instant, used for the city's current local time
    pub now: DateTime<Utc>,
}

impl fmt::Display for WeatherPrompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.weather;
        // Offsets are checked during request validation
        let offset = w.utc_offset().unwrap_or_else(|| Utc.fix());
        let local_now = clock::date_clock_time(&self.now.with_timezone(&offset));

        writeln!(
            f,
            "You are a helpful weather assistant. Here is the current weather information for {}, {}:",
            w.city, w.country
        )?;
        writeln!(
            f,
            "Current Temperature: {}°C (feels like {}°C)",
            w.temperature, w.feels_like
        )?;
        writeln!(f, "Current Description: {}", w.description)?;
        writeln!(f, "Humidity: {}%", w.humidity)?;
        writeln!(f, "Pressure: {} hPa", w.pressure)?;
        writeln!(f, "Wind Speed: {} m/s", w.wind_speed)?;
        writeln!(f, "Sunrise: {}", w.sunrise)?;
        writeln!(f, "Sunset: {}", w.sunset)?;
        writeln!(f, "Current Local Time in {}: {}.", w.city, local_now)?;
        writeln!(f)?;
        writeln!(f, "{}", FORECAST_HEADER)?;

        if self.forecast.is_empty() {
            writeln!(f, "{}", FORECAST_FALLBACK)?;
        } else {
            for entry in self.forecast {
                writeln!(
                    f,
                    "- At {}: Temperature {}°C, Description: {}",
                    entry.time, entry.temperature, entry.description
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "User's question: \"{}\"", self.question)?;
        writeln!(f)?;
        write!(f, "{}", INSTRUCTIONS)
    }
}
