use anyhow::anyhow;
use inews_core::{Error, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;

use crate::Channel;

/// The UI side of the bridge: invokes channels on a running server.
pub struct BridgeClient {
    client: Client,
    base_url: String,
}

impl BridgeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn channels(&self) -> Result<Vec<String>> {
        let names = self
            .client
            .get(format!("{}/ipc", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(names)
    }

    /// Send one request and wait for its response
    pub async fn invoke(&self, channel: Channel, args: Vec<Value>) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/ipc/{}", self.base_url, channel))
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if status.is_success() {
            return Ok(body);
        }

        let message = body["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        if status == StatusCode::BAD_REQUEST {
            return Err(Error::InvalidArgument(message));
        }
        Err(Error::External(anyhow!(
            "{} failed with {}: {}",
            channel,
            status,
            message
        )))
    }
}

impl fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeClient")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
