use chrono::{DateTime, Utc};
use log::info;
use reqwest::{Client, StatusCode};

use crate::{
    aggregate, auth,
    config::Config,
    error::RelayError,
    forward::{FormSubmission, Forwarder},
    iot::{self, IotClient},
};

#[derive(Debug)]
pub struct RunReport {
    pub devices: usize,
    pub thing_id: String,
    pub samples: usize,
    pub mean: f64,
    pub status: StatusCode,
}

/// One pass: token, devices, thing, series, mean, post. Stops at the first error.
pub async fn run<C>(config: &Config, clock: C) -> Result<RunReport, RelayError>
where
    C: Fn() -> DateTime<Utc>,
{
    let http = Client::new();

    let token = auth::fetch_token(&http, config).await?;
    match token.expiry {
        Some(at) => info!("Got an access token, will expire on {at}"),
        None => info!("Got an access token, no expiry given"),
    }
    let iot = IotClient::new(&http, config.api_base_url.clone(), &token);

    let devices = iot.list_devices().await?;
    if devices.is_empty() {
        info!("No device found");
    } else {
        for device in &devices {
            info!("Device found: {} ({})", device.name, device.id);
        }
    }

    let thing = iot.show_thing(&config.thing_id).await?;
    info!(
        "Thing found: {} ({}), bound to device {}",
        thing.id,
        thing.name.as_deref().unwrap_or("unnamed"),
        thing.device_id.as_deref().unwrap_or("none")
    );

    let from = iot::from_bound(clock(), config.lookback)?;
    let series = iot
        .property_timeseries(&config.thing_id, &config.property_id, &from)
        .await?;

    let mean = aggregate::mean(&series.data)?;
    info!("Mean over {} samples: {mean}", series.data.len());

    let submission = FormSubmission::new(&thing.id, &config.sensor_id, mean, clock());
    info!(
        "Forwarding value {} for sensor {}",
        submission.get("value").unwrap_or_default(),
        config.sensor_id
    );
    let status = Forwarder::new(&http, config.post_url.clone())
        .submit(submission)
        .await?;

    Ok(RunReport {
        devices: devices.len(),
        thing_id: thing.id,
        samples: series.data.len(),
        mean,
        status,
    })
}
