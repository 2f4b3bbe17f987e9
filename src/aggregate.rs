use crate::{error::RelayError, telemetry::TimeseriesPoint};

/// Arithmetic mean of the sample values. An empty series has no mean.
pub fn mean(samples: &[TimeseriesPoint]) -> Result<f64, RelayError> {
    if samples.is_empty() {
        return Err(RelayError::NoSamples);
    }
    let sum: f64 = samples.iter().map(|s| s.value).sum();
    Ok(sum / samples.len() as f64)
}
