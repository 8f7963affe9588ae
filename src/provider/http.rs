//! HTTP broker driver
//!
//! Fronts an external per-cloud resource broker speaking REST. The broker
//! owns the vendor SDK calls; this driver maps broker responses and failures
//! onto the gateway contract. One instance is registered per provider, with
//! the connection binding carried in each request payload.

use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::driver::{ConnectionConfig, DriverNlb, DriverNlbSpec, NlbDriver};
use super::error::{DriverError, Result};
use crate::errors::Error as CrateError;

/// Maximum length of a broker error body carried into error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

fn truncate_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LENGTH {
        format!("{}... [truncated, {} bytes total]", &body[..MAX_ERROR_BODY_LENGTH], body.len())
    } else {
        body.to_string()
    }
}

/// Wire shape of a broker NLB payload.
#[derive(Debug, Deserialize)]
struct BrokerNlbResponse {
    #[serde(rename = "cspNLBId")]
    csp_nlb_id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl From<BrokerNlbResponse> for DriverNlb {
    fn from(wire: BrokerNlbResponse) -> Self {
        Self {
            csp_nlb_id: wire.csp_nlb_id,
            name: wire.name,
            description: wire.description,
            tags: wire.tags,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrokerCreateRequest<'a> {
    connection_name: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    tags: &'a HashMap<String, String>,
}

/// Driver that provisions through an external resource broker.
#[derive(Debug, Clone)]
pub struct HttpDriver {
    provider: String,
    base_url: Url,
    client: Client,
}

impl HttpDriver {
    /// Create a broker driver for one provider.
    pub fn new(base_url: &str, provider: impl Into<String>) -> std::result::Result<Self, CrateError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CrateError::config(format!("invalid broker URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("flotilla/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CrateError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { provider: provider.into(), base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(&format!("{}/{}", self.provider, path))
            .map_err(|e| DriverError::unavailable(format!("failed to build broker URL: {}", e)))
    }

    /// Map a non-success broker status onto a driver error kind.
    fn failure(status: StatusCode, body: &str) -> DriverError {
        let message = format!("{}: {}", status, truncate_body(body));
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                DriverError::rejected(message)
            }
            StatusCode::TOO_MANY_REQUESTS => DriverError::quota_exceeded(message),
            _ => DriverError::unavailable(message),
        }
    }
}

#[async_trait::async_trait]
impl NlbDriver for HttpDriver {
    fn provider(&self) -> &str {
        &self.provider
    }

    #[instrument(skip(self, spec), fields(provider = %self.provider, connection = %connection.name, name = %spec.name), name = "driver_create_nlb")]
    async fn create(
        &self,
        connection: &ConnectionConfig,
        spec: &DriverNlbSpec,
    ) -> Result<DriverNlb> {
        let url = self.endpoint("nlb")?;
        debug!(url = %url, "POST broker create");

        let body = BrokerCreateRequest {
            connection_name: &connection.name,
            name: &spec.name,
            description: spec.description.as_deref(),
            tags: &spec.tags,
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DriverError::unavailable(format!("broker request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DriverError::unavailable(format!("failed to read broker response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::failure(status, &text));
        }

        let wire: BrokerNlbResponse = serde_json::from_str(&text)
            .map_err(|e| DriverError::unavailable(format!("malformed broker response: {}", e)))?;

        Ok(wire.into())
    }

    #[instrument(skip(self), fields(provider = %self.provider, connection = %connection.name, csp_nlb_id = %csp_nlb_id), name = "driver_describe_nlb")]
    async fn describe(
        &self,
        connection: &ConnectionConfig,
        csp_nlb_id: &str,
    ) -> Result<Option<DriverNlb>> {
        let mut url = self.endpoint(&format!("nlb/{}", csp_nlb_id))?;
        url.query_pairs_mut().append_pair("connectionName", &connection.name);
        debug!(url = %url, "GET broker describe");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DriverError::unavailable(format!("broker request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .map_err(|e| DriverError::unavailable(format!("failed to read broker response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::failure(status, &text));
        }

        let wire: BrokerNlbResponse = serde_json::from_str(&text)
            .map_err(|e| DriverError::unavailable(format!("malformed broker response: {}", e)))?;

        Ok(Some(wire.into()))
    }

    #[instrument(skip(self), fields(provider = %self.provider, connection = %connection.name, csp_nlb_id = %csp_nlb_id), name = "driver_delete_nlb")]
    async fn delete(&self, connection: &ConnectionConfig, csp_nlb_id: &str) -> Result<()> {
        let mut url = self.endpoint(&format!("nlb/{}", csp_nlb_id))?;
        url.query_pairs_mut().append_pair("connectionName", &connection.name);
        debug!(url = %url, "DELETE broker teardown");

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| DriverError::unavailable(format!("broker request failed: {}", e)))?;

        let status = response.status();
        // Deleting an already-absent resource is a success
        if status == StatusCode::NOT_FOUND || status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(Self::failure(status, &text))
    }
}
