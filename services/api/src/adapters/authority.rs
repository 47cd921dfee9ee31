//! services/api/src/adapters/authority.rs
//!
//! The `AuthorityService` implementation that asks the external auth service
//! whether a bearer token is valid.

use async_trait::async_trait;
use neurone_profile_core::ports::{AuthVerdict, AuthorityService, PortError, PortResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The answer the authority gives when a token is accepted.
const GRANTED_MESSAGE: &str = "OK";

#[derive(Serialize)]
struct CheckAuthRequest<'a> {
    jwt: &'a str,
}

#[derive(Deserialize)]
struct CheckAuthResponse {
    #[serde(default)]
    message: String,
}

/// Posts `{"jwt": <token>}` to the configured check endpoint.
#[derive(Clone)]
pub struct HttpAuthority {
    client: Client,
    check_url: String,
}

impl HttpAuthority {
    pub fn new(check_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            check_url: check_url.into(),
        })
    }
}

#[async_trait]
impl AuthorityService for HttpAuthority {
    async fn check_token(&self, token: &str) -> PortResult<AuthVerdict> {
        let response = self
            .client
            .post(&self.check_url)
            .json(&CheckAuthRequest { jwt: token })
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("auth authority unreachable: {}", e)))?;

        // Only a 2xx answer can grant; a rejection's message is kept for the log.
        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<CheckAuthResponse>().await {
                Ok(body) if !body.message.is_empty() => body.message,
                _ => status.to_string(),
            };
            return Ok(AuthVerdict::Denied(reason));
        }
        let body: CheckAuthResponse = response.json().await.map_err(|e| {
            PortError::Unexpected(format!(
                "unreadable auth authority response ({}): {}",
                status, e
            ))
        })?;

        if body.message == GRANTED_MESSAGE {
            Ok(AuthVerdict::Granted)
        } else {
            Ok(AuthVerdict::Denied(body.message))
        }
    }
}
