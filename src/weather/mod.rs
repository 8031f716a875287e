pub mod handlers;
pub mod models;
pub mod service;
pub mod shaper;

pub use models::{ForecastEntry, WeatherReport};
pub use service::{WeatherError, WeatherService};
