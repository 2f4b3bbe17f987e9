use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{config::Config, error::RelayError};

#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub expiry: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// Client-credentials grant. The audience goes along as an extra form parameter.
pub async fn fetch_token(client: &Client, config: &Config) -> Result<Token, RelayError> {
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("audience", config.audience.as_str()),
    ];

    let response = client
        .post(config.token_url.clone())
        .form(&params)
        .send()
        .await
        .map_err(|e| RelayError::Auth(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RelayError::Auth(format!(
            "token endpoint returned {status}: {}",
            body.trim()
        )));
    }

    let payload: TokenResponse = response
        .json()
        .await
        .map_err(|e| RelayError::Auth(format!("undecodable token response: {e}")))?;

    let access_token = payload
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RelayError::Auth("response carried no access_token".to_string()))?;
    let expiry = payload
        .expires_in
        .and_then(Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl));

    Ok(Token {
        access_token,
        expiry,
    })
}
