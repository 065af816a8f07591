use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::Config,
    error::RequestFailure,
    services::api_client::{ApiRequest, ApiResponse, ApiTransport},
};

/// `reqwest`-backed transport; on wasm32 this goes through `fetch`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_base_url)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait(?Send)]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RequestFailure> {
        let url = self.url(&request.path);
        let mut builder = self.client.post(&url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            RequestFailure::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!("POST {} -> {}", url, status);

        Ok(ApiResponse { status, body })
    }
}
