use chrono::{DateTime, Duration, Utc};
use log::info;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    auth::Token,
    error::RelayError,
    telemetry::{Device, Thing, TimeseriesResponse},
};

/// Layout the time-series endpoint expects for its `from` bound.
pub const FROM_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Lower bound of the time-series window ending at `now`.
pub fn from_bound(now: DateTime<Utc>, lookback: Duration) -> Result<String, RelayError> {
    now.checked_sub_signed(lookback)
        .map(|from| from.format(FROM_FORMAT).to_string())
        .ok_or_else(|| RelayError::InvalidConfig {
            field: "lookbackMinutes",
            reason: format!("window of {lookback} reaches before the earliest representable time"),
        })
}

pub struct IotClient<'a> {
    http: &'a Client,
    base: Url,
    token: &'a Token,
}

impl<'a> IotClient<'a> {
    pub fn new(http: &'a Client, base: Url, token: &'a Token) -> Self {
        Self { http, base, token }
    }

    pub async fn list_devices(&self) -> Result<Vec<Device>, RelayError> {
        let url = self.endpoint(&["v2", "devices"])?;
        self.get_json("devices", url, &[]).await
    }

    pub async fn show_thing(&self, thing_id: &str) -> Result<Thing, RelayError> {
        let url = self.endpoint(&["v2", "things", thing_id])?;
        self.get_json(format!("thing {thing_id}"), url, &[]).await
    }

    pub async fn property_timeseries(
        &self,
        thing_id: &str,
        property_id: &str,
        from: &str,
    ) -> Result<TimeseriesResponse, RelayError> {
        let url = self.endpoint(&[
            "v2",
            "things",
            thing_id,
            "properties",
            property_id,
            "timeseries",
        ])?;
        let series: TimeseriesResponse = self
            .get_json(format!("prop {property_id}"), url, &[("from", from)])
            .await?;
        match series.data.last() {
            Some(last) => info!(
                "Prop found, {} samples since {from}, last value {} at {}",
                series.data.len(),
                last.value,
                last.time
            ),
            None => info!("Prop found, no samples since {from}"),
        }
        Ok(series)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RelayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::Encode(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        call: impl Into<String>,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, RelayError> {
        let call = call.into();
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| RelayError::api(&call, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::api(
                call,
                format!("status {status}: {}", body.trim()),
            ));
        }

        response.json().await.map_err(|e| RelayError::api(call, e))
    }
}
