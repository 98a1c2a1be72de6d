//! Blob-service object storage over HTTP, authenticated with a shared access signature.
//!
//! Speaks the Azure Blob REST dialect: containers are probed and created with
//! `restype=container`, objects are written as block blobs in a single `PUT`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use crate::application::storage::{ObjectStore, ObjectStoreError};

const BLOB_TYPE_HEADER: &str = "x-ms-blob-type";
const BLOCK_BLOB: &str = "BlockBlob";
const VERSION_HEADER: &str = "x-ms-version";
const SERVICE_VERSION: &str = "2021-08-06";
const JSON_CONTENT_TYPE: &str = "application/json";
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct BlobObjectStore {
    client: Client,
    endpoint: Url,
    sas: String,
}

impl BlobObjectStore {
    pub fn new(endpoint: Url, sas: &str, timeout: Duration) -> Result<Self, ObjectStoreError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(ObjectStoreError::transport)?;

        Ok(Self {
            client,
            endpoint,
            sas: sas.trim_start_matches('?').to_string(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("onair/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, segments: &[&str], restype_container: bool) -> Result<Url, ObjectStoreError> {
        let mut url = self.endpoint.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ObjectStoreError::InvalidName(format!("endpoint `{}` cannot be a base", self.endpoint))
            })?;
            path.pop_if_empty();
            for segment in segments {
                if segment.is_empty() || segment.contains('/') {
                    return Err(ObjectStoreError::InvalidName((*segment).to_string()));
                }
                path.push(segment);
            }
        }

        let query = match (restype_container, self.sas.is_empty()) {
            (true, true) => Some("restype=container".to_string()),
            (true, false) => Some(format!("restype=container&{}", self.sas)),
            (false, true) => None,
            (false, false) => Some(self.sas.clone()),
        };
        url.set_query(query.as_deref());
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ObjectStoreError> {
        request
            .header(VERSION_HEADER, SERVICE_VERSION)
            .send()
            .await
            .map_err(ObjectStoreError::transport)
    }
}

async fn status_error(response: Response) -> ObjectStoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    ObjectStoreError::status(status, message)
}

#[async_trait]
impl ObjectStore for BlobObjectStore {
    fn target(&self) -> String {
        self.endpoint.host_str().unwrap_or_default().to_string()
    }

    fn object_uri(&self, container: &str, name: &str) -> String {
        // Reported to telemetry, so the signature must not leak into it.
        let mut url = self.endpoint.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(container).push(name);
        }
        url.to_string()
    }

    async fn container_exists(&self, container: &str) -> Result<bool, ObjectStoreError> {
        let url = self.url(&[container], true)?;
        let response = self.send(self.client.get(url)).await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(status_error(response).await),
        }
    }

    async fn create_container_if_not_exists(
        &self,
        container: &str,
    ) -> Result<(), ObjectStoreError> {
        let url = self.url(&[container], true)?;
        let response = self.send(self.client.put(url)).await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Ok(()),
            _ => Err(status_error(response).await),
        }
    }

    async fn get_object(
        &self,
        container: &str,
        name: &str,
    ) -> Result<Option<Bytes>, ObjectStoreError> {
        let url = self.url(&[container, name], false)?;
        let response = self.send(self.client.get(url)).await?;
        match response.status() {
            status if status.is_success() => response
                .bytes()
                .await
                .map(Some)
                .map_err(ObjectStoreError::transport),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(status_error(response).await),
        }
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        payload: Bytes,
    ) -> Result<(), ObjectStoreError> {
        let url = self.url(&[container, name], false)?;
        let request = self
            .client
            .put(url)
            .header(BLOB_TYPE_HEADER, BLOCK_BLOB)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(payload);

        let response = self.send(request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }
}
