// Port to the oven controller backend
use crate::domain::oven::{OvenStatus, StartCommand};
use crate::domain::profile::Profile;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend answered with status {0}")]
    Status(u16),

    #[error("malformed backend response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait OvenBackend: Send + Sync {
    /// List the stored solder profiles, in backend order
    async fn fetch_profiles(&self) -> Result<Vec<Profile>, BackendError>;

    /// Current reading, target and running flag
    async fn fetch_status(&self) -> Result<OvenStatus, BackendError>;

    async fn start(&self, command: StartCommand) -> Result<(), BackendError>;

    async fn stop(&self) -> Result<(), BackendError>;
}
