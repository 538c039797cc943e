//! HTTP client for the remote garapon API.

use crate::errors::ApiError;
use crate::models::{GaraponResponse, UserProfile};
use axum::http::StatusCode;
use reqwest::{
    header::{HeaderValue, ACCEPT},
    Client,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    pub async fn fetch_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.get_json("user", token).await
    }

    pub async fn fetch_garapon(&self, token: &str) -> Result<GaraponResponse, ApiError> {
        self.get_json("garapon", token).await
    }

    /// GETs `path` with the bearer token and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        if !is_sendable_token(token) {
            return Err(ApiError::InvalidToken);
        }

        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(ACCEPT, "*/*")
            .send()
            .await?;

        let status = response.status();
        debug!(%url, %status, "remote API responded");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| {
            error!(%url, "could not decode remote payload: {err}");
            ApiError::Malformed(err)
        })
    }
}

/// Whether `token` can be carried in an `Authorization: Bearer` header.
pub fn is_sendable_token(token: &str) -> bool {
    HeaderValue::from_str(&format!("Bearer {token}")).is_ok()
}
