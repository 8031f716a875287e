use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// Gemini (generative language) API key
    pub gemini_api_key: String,

    /// Gemini model used for `/ask-ai`
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Base URL of the OpenWeatherMap 2.5 data API
    #[serde(default = "default_weather_api_url")]
    pub weather_api_url: String,

    /// Base URL of the generative language API
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Timeout applied to every outbound request
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Timeout applied to every inbound request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_weather_api_url() -> String {
    "http://api.openweathermap.org/data/2.5".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("gemini_model", default_gemini_model())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // SKYCHAT_GEMINI_API_KEY -> gemini_api_key
            .add_source(
                Environment::with_prefix("SKYCHAT")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openweathermap_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "openweathermap_api_key must not be empty".to_string(),
            ));
        }
        if self.gemini_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "gemini_api_key must not be empty".to_string(),
            ));
        }
        if self.upstream_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Configuration with default settings and the given keys.
    pub fn with_keys(openweathermap_api_key: &str, gemini_api_key: &str) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            openweathermap_api_key: openweathermap_api_key.to_string(),
            gemini_api_key: gemini_api_key.to_string(),
            gemini_model: default_gemini_model(),
            weather_api_url: default_weather_api_url(),
            gemini_api_url: default_gemini_api_url(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
