use std::process::ExitCode;

use chrono::Utc;
use config::Config;
use dotenv::dotenv;
use log::{error, info};

mod aggregate;
mod auth;
mod config;
mod error;
mod forward;
mod iot;
mod pipeline;
mod telemetry;
#[cfg(test)]
mod testutil;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&config, Utc::now).await {
        Ok(report) => {
            info!(
                "Relayed mean {} of {} samples from thing {} ({}), {} devices listed",
                report.mean, report.samples, report.thing_id, report.status, report.devices
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
