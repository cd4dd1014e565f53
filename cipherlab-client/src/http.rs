// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-over-HTTP transport to the computation service.
use cipherlab_core::Endpoint;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::backend::Backend;

/// Default address of a locally running computation service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base URL the endpoint paths get appended to.
    pub base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(HttpConfig::default())
    }
}

impl Backend for HttpBackend {
    type Error = HttpBackendError;

    async fn health(&self) -> Result<(), HttpBackendError> {
        self.client
            .get(self.url(Endpoint::Health))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn post<Req, Res>(&self, endpoint: Endpoint, body: &Req) -> Result<Res, HttpBackendError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned + Send,
    {
        let url = self.url(endpoint);
        trace!(%url, "post request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Res>().await?)
    }
}

#[derive(Debug, Error)]
#[error("http request to computation service failed: {0}")]
pub struct HttpBackendError(#[from] reqwest::Error);
