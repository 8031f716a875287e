//! Turns raw OpenWeatherMap payloads into a [`WeatherReport`].
//!
//! Pure functions only; the caller supplies the processing instant so the
//! forecast window is deterministic under test.

use chrono::{DateTime, FixedOffset, Utc};

use super::models::*;
use super::service::WeatherError;
use crate::clock;

const ICON_URL_BASE: &str = "http://openweathermap.org/img/wn";

/// Maximum forecast entries returned (8 x 3h = 24h)
pub const MAX_FORECAST_ENTRIES: usize = 8;

pub fn icon_url(icon_code: &str) -> String {
    format!("{}/{}@2x.png", ICON_URL_BASE, icon_code)
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, WeatherError> {
    value.ok_or_else(|| WeatherError::MalformedResponse(format!("missing field `{}`", field)))
}

/// Validate the current-weather payload and build a report with an empty
/// forecast.
///
/// Sunrise and sunset are displayed in UTC, not shifted by the city's
/// offset, unlike forecast times.
pub fn shape_current(payload: CurrentWeatherPayload) -> Result<WeatherReport, WeatherError> {
    let main = required(payload.main, "main")?;
    let condition = required(payload.weather.into_iter().next(), "weather[0]")?;
    let wind = required(payload.wind, "wind")?;
    let sys = required(payload.sys, "sys")?;
    let timezone_offset = required(payload.timezone, "timezone")?;

    // Offsets outside ±24h cannot be applied to forecast times later on
    offset_for(timezone_offset)?;

    let sunrise = sun_time(required(sys.sunrise, "sys.sunrise")?, "sys.sunrise")?;
    let sunset = sun_time(required(sys.sunset, "sys.sunset")?, "sys.sunset")?;

    Ok(WeatherReport {
        city: required(payload.name, "name")?,
        country: required(sys.country, "sys.country")?,
        temperature: required(main.temp, "main.temp")?,
        feels_like: required(main.feels_like, "main.feels_like")?,
        humidity: required(main.humidity, "main.humidity")?,
        pressure: required(main.pressure, "main.pressure")?,
        description: required(condition.description, "weather[0].description")?,
        icon: icon_url(&required(condition.icon, "weather[0].icon")?),
        wind_speed: required(wind.speed, "wind.speed")?,
        sunrise,
        sunset,
        timezone_offset,
        forecast: Vec::new(),
    })
}

fn sun_time(timestamp: i64, field: &str) -> Result<String, WeatherError> {
    let instant = required(clock::from_unix(timestamp), field)?;
    Ok(clock::clock_time(&instant))
}

fn offset_for(seconds: i32) -> Result<FixedOffset, WeatherError> {
    clock::utc_offset(seconds).ok_or_else(|| {
        WeatherError::MalformedResponse(format!("timezone offset out of range: {}", seconds))
    })
}

/// Select up to [`MAX_FORECAST_ENTRIES`] entries strictly after `now`,
/// keeping upstream order, with display times in the city's local time.
pub fn upcoming_forecast(
    payload: ForecastPayload,
    now: DateTime<Utc>,
    timezone_offset: i32,
) -> Result<Vec<ForecastEntry>, WeatherError> {
    let offset = offset_for(timezone_offset)?;
    let items = required(payload.list, "list")?;

    let mut entries = Vec::with_capacity(MAX_FORECAST_ENTRIES);
    for item in items {
        if entries.len() >= MAX_FORECAST_ENTRIES {
            break;
        }

        let timestamp = required(item.dt, "list[].dt")?;
        let instant = required(clock::from_unix(timestamp), "list[].dt")?;
        if instant <= now {
            continue;
        }

        let main = required(item.main, "list[].main")?;
        let condition = required(item.weather.into_iter().next(), "list[].weather[0]")?;

        entries.push(ForecastEntry {
            timestamp,
            time: clock::local_clock_time(&instant, offset),
            temperature: required(main.temp, "list[].main.temp")?,
            description: required(condition.description, "list[].weather[0].description")?,
            icon: icon_url(&required(condition.icon, "list[].weather[0].icon")?),
        });
    }

    Ok(entries)
}
