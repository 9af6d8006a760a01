//! HTTP client for the relay endpoints

use crate::error::ClientError;
use log::debug;
use reqwest::Client;
use shared::{
    ActionPayload, StatusResponse, UpdateResponse, ACTION_PATH, HEALTH_PATH, REGISTER_PATH,
    UPDATES_PATH,
};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper over `reqwest::Client` bound to one relay server
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(RelayClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches the plain-text liveness message
    pub async fn health(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .get(self.url(HEALTH_PATH))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    /// Pushes an action payload for the server to stamp and buffer
    pub async fn push_action(&self, payload: &ActionPayload) -> Result<StatusResponse, ClientError> {
        debug!("Pushing action to {}", self.base_url);
        let response = self
            .http
            .post(self.url(ACTION_PATH))
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Asks for the summary of the most recent action
    pub async fn latest_update(&self) -> Result<UpdateResponse, ClientError> {
        let response = self
            .http
            .get(self.url(UPDATES_PATH))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Sends player registration data
    pub async fn register(&self, player: &ActionPayload) -> Result<StatusResponse, ClientError> {
        let response = self
            .http
            .post(self.url(REGISTER_PATH))
            .json(player)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
