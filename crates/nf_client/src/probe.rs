use async_trait::async_trait;
use nf_core::{ConnectivityProbe, Error, Result};
use std::time::Duration;
use tokio::net::TcpStream;
use url::Url;

/// Considers the network up when a TCP connection to the API host succeeds.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    /// Probe the host and port the given API root points at.
    pub fn for_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("{}: no host", base_url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::InvalidUrl(format!("{}: no port", base_url)))?;
        Ok(Self::new(format!("{}:{}", host, port), timeout))
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_connected(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("Connectivity check to {} failed: {}", self.address, e);
                false
            }
            Err(_) => {
                tracing::debug!("Connectivity check to {} timed out", self.address);
                false
            }
        }
    }
}

/// Probe with a fixed answer, for forced offline mode and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

#[async_trait]
impl ConnectivityProbe for StaticProbe {
    async fn is_connected(&self) -> bool {
        self.0
    }
}
