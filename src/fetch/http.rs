use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::error::{VizError, VizResult};

use super::{Transport, TransportResponse};

/// Blocking HTTP transport against a dashboard backend.
///
/// Hosts running a UI loop should call it off the UI thread and feed the
/// result back through the chart's ticket API.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> VizResult<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| VizError::Transport {
                endpoint: base_url.clone(),
                reason: format!("failed to build http client: {err}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, path: &str) -> VizResult<TransportResponse> {
        let url = format!("{}{path}", self.base_url);
        let transport_error = |err: reqwest::Error| VizError::Transport {
            endpoint: path.to_owned(),
            reason: err.to_string(),
        };

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        Ok(TransportResponse { status, body })
    }
}
