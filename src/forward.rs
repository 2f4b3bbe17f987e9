use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::{multipart::Form, Client, StatusCode};
use url::Url;

use crate::error::RelayError;

/// Measurement type code the receiving service expects for this sensor.
pub const MEASUREMENT_TYPE: &str = "2";

/// The five form fields, kept in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    fields: Vec<(&'static str, String)>,
}

impl FormSubmission {
    pub fn new(thing_id: &str, sensor_id: &str, mean: f64, timestamp: DateTime<Utc>) -> Self {
        let scaled = (mean * 10.0).trunc() as i64;
        Self {
            fields: vec![
                ("apikey", thing_id.to_string()),
                ("iddevice", sensor_id.to_string()),
                ("value", scaled.to_string()),
                ("type", MEASUREMENT_TYPE.to_string()),
                ("timestamp", timestamp.timestamp().to_string()),
            ],
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    fn into_form(self) -> Form {
        self.fields
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
    }
}

pub struct Forwarder<'a> {
    http: &'a Client,
    url: Url,
}

impl<'a> Forwarder<'a> {
    pub fn new(http: &'a Client, url: Url) -> Self {
        Self { http, url }
    }

    /// Posts the submission once. A non-2xx answer is logged and handed back, not
    /// treated as a failure.
    pub async fn submit(&self, submission: FormSubmission) -> Result<StatusCode, RelayError> {
        let response = self
            .http
            .post(self.url.clone())
            .multipart(submission.into_form())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Response status: {status}");
        } else {
            warn!("Response status: {status}");
        }
        Ok(status)
    }
}
