use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing required setting {0}")]
    MissingConfig(&'static str),

    #[error("invalid setting {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Error retrieving access token, {0}")]
    Auth(String),

    #[error("Error getting {call}, {reason}")]
    Api { call: String, reason: String },

    #[error("time-series returned no samples, nothing to forward")]
    NoSamples,

    #[error("Error encoding request: {0}")]
    Encode(String),

    #[error("Error sending request: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    pub(crate) fn api(call: impl Into<String>, reason: impl ToString) -> Self {
        RelayError::Api {
            call: call.into(),
            reason: reason.to_string(),
        }
    }
}
