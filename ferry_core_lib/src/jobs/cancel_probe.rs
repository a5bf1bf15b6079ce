use async_trait::async_trait;

/// Asked between chunks whether the transfer should stop.
#[async_trait]
pub trait CancelProbe: Send + Sync {
    async fn is_cancelled(&self) -> bool;
}

/// Probe for inline transfers, which cannot be cancelled.
pub struct NeverCancel;

#[async_trait]
impl CancelProbe for NeverCancel {
    async fn is_cancelled(&self) -> bool {
        false
    }
}
