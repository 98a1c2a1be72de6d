//! Object storage port used by the live show store.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("storage request failed: {0}")]
    Transport(String),
    #[error("storage responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage name `{0}`")]
    InvalidName(String),
}

impl ObjectStoreError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Container/object storage holding whole documents.
///
/// Writes overwrite unconditionally; there is no concurrency check.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Host or location reported in dependency telemetry.
    fn target(&self) -> String;

    /// Full address of an object, reported in dependency telemetry.
    fn object_uri(&self, container: &str, name: &str) -> String;

    async fn container_exists(&self, container: &str) -> Result<bool, ObjectStoreError>;

    async fn create_container_if_not_exists(&self, container: &str)
    -> Result<(), ObjectStoreError>;

    /// Fetch an object, returning `None` when it does not exist.
    async fn get_object(
        &self,
        container: &str,
        name: &str,
    ) -> Result<Option<Bytes>, ObjectStoreError>;

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        payload: Bytes,
    ) -> Result<(), ObjectStoreError>;
}
