use super::{HttpClient, HttpResponse, PostRequest};
use crate::error::{MindbreezeError, Result};
use std::time::Duration;

/// Blocking reqwest transport
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MindbreezeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post(&self, url: &str, request: PostRequest) -> Result<HttpResponse> {
        let mut builder = self.client.post(url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let t0 = std::time::Instant::now();
        let response = builder
            .send()
            .map_err(|e| MindbreezeError::Transport(format!("POST {} failed: {}", url, e)))?;
        let status = response.status().as_u16();
        let text = response.text().map_err(|e| {
            MindbreezeError::Transport(format!("Failed to read response body: {}", e))
        })?;

        tracing::debug!(
            "POST {} -> {} ({} bytes in {}ms)",
            url,
            status,
            text.len(),
            t0.elapsed().as_millis()
        );

        Ok(HttpResponse::from_text(status, &text))
    }
}
