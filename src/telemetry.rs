use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Device {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Thing {
    pub id: String,
    pub name: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TimeseriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TimeseriesResponse {
    #[serde(default)]
    pub data: Vec<TimeseriesPoint>,
}
