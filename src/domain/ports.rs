use crate::domain::model::{PairStatus, UpdateStatus, ValidatedRequest, VerifiedRequest};
use crate::utils::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn lookup_url(&self) -> &str;
    fn update_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn not_found_sentinel(&self) -> &str;
    fn success_sentinel(&self) -> &str;
    fn exists_sentinel(&self) -> Option<&str>;
}

/// Confirms a barcode/phone pair with the remote lookup service. One attempt, no retry.
#[async_trait]
pub trait RemoteVerifier: Send + Sync {
    async fn verify(&self, request: &ValidatedRequest) -> Result<PairStatus, TransportError>;
}

/// Persists an availability window. One attempt, no retry.
#[async_trait]
pub trait RemoteUpdater: Send + Sync {
    async fn update(&self, request: &VerifiedRequest) -> Result<UpdateStatus, TransportError>;
}
