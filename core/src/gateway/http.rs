use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::config::{ClientConfig, SERVICE_PATH};
use crate::gateway::traits::{GatewayError, HttpGateway, HttpRequest, HttpResponse, Method};

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// `HttpGateway` over a shared `reqwest::Client`. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestGateway {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, SERVICE_PATH, path)
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        let url = self.url_for(&request.path);
        debug!(method = %request.method, url = %url, query = ?request.query, "sending request");

        let mut builder = self.client.request(request.method.into(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            // Also sets Content-Type: application/json, bare strings and numbers included.
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| classify(&url, e))?;
        let status = response.status();
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| classify(&final_url, e))?;

        debug!(status = status.as_u16(), url = %final_url, "received response");
        Ok(HttpResponse {
            url: final_url,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn classify(url: &str, err: reqwest::Error) -> GatewayError {
    if err.is_builder() {
        GatewayError::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else {
        GatewayError::Connect {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
