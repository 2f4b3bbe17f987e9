use std::{env, fmt};

use chrono::Duration;
use url::Url;

use crate::error::RelayError;

pub const DEFAULT_API_BASE_URL: &str = "https://api2.arduino.cc/iot";
pub const DEFAULT_LOOKBACK_MINUTES: i64 = 100;

#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub audience: String,
    pub token_url: Url,
    pub thing_id: String,
    pub property_id: String,
    pub sensor_id: String,
    pub post_url: Url,
    pub api_base_url: Url,
    pub lookback: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(RelayError::MissingConfig(key))
        };
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let client_id = required("clientID")?;
        let client_secret = required("clientSecret")?;
        let audience = required("audience")?;
        let token_url = parse_url("tokenUrl", &required("tokenUrl")?)?;
        let thing_id = required("thingID")?;
        let property_id = required("pid")?;
        let sensor_id = required("sensorID")?;
        let post_url = parse_url("postUrl", &required("postUrl")?)?;

        let api_base_url = parse_url(
            "apiBaseUrl",
            optional("apiBaseUrl")
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;

        let lookback = match optional("lookbackMinutes") {
            Some(raw) => parse_lookback(&raw)?,
            None => Duration::minutes(DEFAULT_LOOKBACK_MINUTES),
        };

        Ok(Self {
            client_id,
            client_secret,
            audience,
            token_url,
            thing_id,
            property_id,
            sensor_id,
            post_url,
            api_base_url,
            lookback,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("audience", &self.audience)
            .field("token_url", &self.token_url.as_str())
            .field("thing_id", &self.thing_id)
            .field("property_id", &self.property_id)
            .field("sensor_id", &self.sensor_id)
            .field("post_url", &self.post_url.as_str())
            .field("api_base_url", &self.api_base_url.as_str())
            .field("lookback", &self.lookback)
            .finish()
    }
}

fn parse_lookback(raw: &str) -> Result<Duration, RelayError> {
    let invalid = |reason: String| RelayError::InvalidConfig {
        field: "lookbackMinutes",
        reason,
    };
    let minutes = raw.parse::<i64>().map_err(|e| invalid(e.to_string()))?;
    if minutes <= 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Duration::try_minutes(minutes).ok_or_else(|| invalid(format!("{minutes} minutes is out of range")))
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, RelayError> {
    Url::parse(raw).map_err(|e| RelayError::InvalidConfig {
        field,
        reason: e.to_string(),
    })
}
