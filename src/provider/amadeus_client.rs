use super::{ProviderClient, ProviderError, ProviderRequest};
use crate::models::Credentials;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const TOKEN_PATH: &str = "/v1/security/oauth2/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct AmadeusClient {
    base_url: Url,
    client: reqwest::Client,
}

impl AmadeusClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("travel-api-explorer/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { base_url, client })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn access_token(&self, credentials: &Credentials) -> Result<String, ProviderError> {
        let url = self.endpoint(TOKEN_PATH.trim_start_matches('/').split('/'))?;
        let response = self
            .client
            .post(url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.key.as_str()),
                ("client_secret", credentials.secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unauthorized {
                status: status.as_u16(),
                description: error_description(&body),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl ProviderClient for AmadeusClient {
    async fn call(&self, credentials: &Credentials, request: &ProviderRequest) -> Result<Value, ProviderError> {
        let token = self.access_token(credentials).await?;
        let url = self.endpoint(request.segments.iter().map(String::as_str))?;

        debug!(operation = request.operation, path = %request.path(), "calling provider");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&request.query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let description = error_description(&body);
            return Err(if status == StatusCode::UNAUTHORIZED {
                ProviderError::Unauthorized {
                    status: status.as_u16(),
                    description,
                }
            } else {
                ProviderError::Rejected {
                    status: status.as_u16(),
                    description,
                }
            });
        }

        Ok(response.json().await?)
    }
}

/// Pulls a human-readable reason out of an error body. The REST API uses
/// `{ errors: [{ detail, title }] }`; the token endpoint uses
/// `{ error_description }`.
fn error_description(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let first_error = value["errors"].get(0);
    [
        first_error.and_then(|e| e["detail"].as_str()),
        first_error.and_then(|e| e["title"].as_str()),
        value["error_description"].as_str(),
    ]
    .into_iter()
    .flatten()
    .find(|text| !text.trim().is_empty())
    .map(str::to_string)
}
