//! Connectivity probe and dispatch client seams.

use async_trait::async_trait;
use pantry_common::{AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;

/// Connectivity signal consulted before a send is attempted.
///
/// This is a pre-flight probe, not a guarantee: a send can still fail
/// mid-flight after the probe reports online.
pub trait Connectivity: Send + Sync {
    /// Whether the network currently looks reachable.
    fn is_online(&self) -> bool;
}

/// Acknowledgement from the dispatch endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DispatchAck {
    /// Whether the service accepted the request.
    #[serde(default)]
    pub ok: bool,
    /// Destinations delivered to.
    #[serde(default)]
    pub sent: u32,
    /// Destinations that failed.
    #[serde(default)]
    pub errors: u32,
}

/// Client for the remote notification dispatch endpoint.
#[async_trait]
pub trait DispatchClient: Send + Sync {
    /// Submit one notification request body for dispatch.
    ///
    /// An `Err` means the request never reached the dispatcher (or the
    /// dispatcher rejected it outright); per-transport failures inside a
    /// successful dispatch arrive as counts in the ack instead.
    async fn dispatch(&self, body: &Value) -> AppResult<DispatchAck>;
}

/// HTTP [`DispatchClient`] posting to the MTS endpoint.
#[derive(Clone)]
pub struct HttpDispatchClient {
    endpoint: String,
    auth_token: Option<String>,
    http_client: reqwest::Client,
}

impl HttpDispatchClient {
    /// Create a client for the given endpoint URL, with an optional bearer
    /// token attached to every request.
    #[must_use]
    #[allow(clippy::expect_used)] // Client build only fails with incompatible TLS settings
    pub fn new(endpoint: impl Into<String>, auth_token: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into(),
            auth_token,
            http_client,
        }
    }
}

#[async_trait]
impl DispatchClient for HttpDispatchClient {
    async fn dispatch(&self, body: &Value) -> AppResult<DispatchAck> {
        let mut request = self.http_client.post(&self.endpoint).json(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Dispatch request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Dispatch rejected: {status}: {text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid dispatch response: {e}")))
    }
}
