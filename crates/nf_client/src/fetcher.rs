use async_trait::async_trait;
use nf_core::Result;
use reqwest::{Client, StatusCode};
use std::fmt;

use crate::config::ApiConfig;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Single GET. Returns the body of a 200 response, or an empty string
    /// for any other status. Transport failures are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("client", &"<reqwest::Client>")
            .finish()
    }
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if url.is_empty() {
            return Ok(String::new());
        }

        tracing::debug!("GET {}", redact_api_key(url));
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Unexpected status {} from {}", status, redact_api_key(url));
            return Ok(String::new());
        }

        let body = response.text().await?;
        tracing::debug!("Received {} bytes", body.len());
        Ok(body)
    }
}

/// Strip the key value from a URL before it reaches the logs.
pub(crate) fn redact_api_key(url: &str) -> String {
    match url.find("api-key=") {
        Some(start) => {
            let value_start = start + "api-key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}<redacted>{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}
