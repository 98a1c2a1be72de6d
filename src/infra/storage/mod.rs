//! Object storage backends and connection-string handling.

mod blob;
mod fs;
mod memory;

pub use blob::BlobObjectStore;
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;

use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use thiserror::Error;
use url::Url;

use crate::application::storage::ObjectStore;

use super::error::InfraError;

const BLOB_ENDPOINT_KEY: &str = "BlobEndpoint";
const SAS_KEY: &str = "SharedAccessSignature";
const FILE_SCHEME: &str = "file://";
const MEMORY: &str = "memory";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("connection string is empty")]
    Empty,
    #[error("segment `{0}` is not a key=value pair")]
    MalformedSegment(String),
    #[error("missing `{0}`")]
    Missing(&'static str),
    #[error("`BlobEndpoint` is not a valid URL: {0}")]
    InvalidEndpoint(String),
    #[error("file storage path is empty")]
    EmptyPath,
}

/// Where the live show document lives, parsed from the configured connection string.
///
/// - `BlobEndpoint=https://acct.blob.core.windows.net;SharedAccessSignature=sv=...`
/// - `file:///var/lib/onair`
/// - `memory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConnection {
    Blob { endpoint: Url, sas: String },
    Filesystem { root: PathBuf },
    Memory,
}

impl FromStr for StorageConnection {
    type Err = ConnectionStringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConnectionStringError::Empty);
        }

        if value.eq_ignore_ascii_case(MEMORY) || value.eq_ignore_ascii_case("memory://") {
            return Ok(Self::Memory);
        }

        if let Some(path) = value.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(ConnectionStringError::EmptyPath);
            }
            return Ok(Self::Filesystem {
                root: PathBuf::from(path),
            });
        }

        let mut endpoint = None;
        let mut sas = None;
        for segment in value.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, val) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionStringError::MalformedSegment(segment.to_string()))?;
            match key.trim() {
                BLOB_ENDPOINT_KEY => endpoint = Some(val.trim()),
                SAS_KEY => sas = Some(val.trim()),
                _ => {}
            }
        }

        let endpoint = endpoint.ok_or(ConnectionStringError::Missing(BLOB_ENDPOINT_KEY))?;
        let sas = sas.ok_or(ConnectionStringError::Missing(SAS_KEY))?;
        let endpoint = Url::parse(endpoint)
            .map_err(|err| ConnectionStringError::InvalidEndpoint(err.to_string()))?;

        Ok(Self::Blob {
            endpoint,
            sas: sas.to_string(),
        })
    }
}

impl StorageConnection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Blob { .. } => "blob",
            Self::Filesystem { .. } => "filesystem",
            Self::Memory => MEMORY,
        }
    }
}

/// Construct the backend selected by the connection.
pub fn connect(
    connection: &StorageConnection,
    request_timeout: Duration,
) -> Result<Arc<dyn ObjectStore>, InfraError> {
    let store: Arc<dyn ObjectStore> = match connection {
        StorageConnection::Blob { endpoint, sas } => Arc::new(
            BlobObjectStore::new(endpoint.clone(), sas, request_timeout)
                .map_err(|err| InfraError::storage(err.to_string()))?,
        ),
        StorageConnection::Filesystem { root } => Arc::new(FsObjectStore::new(root.clone())?),
        StorageConnection::Memory => Arc::new(InMemoryObjectStore::new()),
    };
    Ok(store)
}
