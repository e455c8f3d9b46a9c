use async_trait::async_trait;

/// Reports whether outbound network access is currently available.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_connected(&self) -> bool;
}
