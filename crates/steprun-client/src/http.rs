//! Envelope-aware JSON RPC client.

use serde::de::DeserializeOwned;
use serde::Serialize;
use steprun_proto::Envelope;
use tracing::debug;

use crate::error::ClientError;

/// HTTP client for the coordinator's RPC endpoints.
#[derive(Debug, Clone)]
pub struct RpcClient {
    inner: reqwest::Client,
    base_url: String,
}

impl RpcClient {
    /// Create a new client for a coordinator base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the coordinator is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "Checking health");

        let response = self.inner.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// POST a request to `path` and unwrap the response envelope.
    pub async fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST request");

        let response = self.inner.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                path: path.to_string(),
            });
        }

        let envelope: Envelope<Resp> = response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))?;

        if envelope.is_error() {
            return Err(ClientError::Rpc(envelope.error));
        }

        envelope
            .data
            .ok_or_else(|| ClientError::MissingData(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RpcClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_unreachable_coordinator_is_http_error() {
        // Port 9 (discard) is not listening in test environments.
        let client = RpcClient::new("http://127.0.0.1:9");
        let result: Result<bool, _> = client.call("/v1/agent/list-task", &()).await;
        assert!(matches!(result, Err(ClientError::Http(_))));
    }
}
