//! Read-through/write-through access to the single live show document.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::storage::{ObjectStore, ObjectStoreError};
use crate::application::telemetry::{DependencyRecord, StorageOperation, Telemetry};
use crate::cache::{Cache, LIVE_SHOW_DETAILS_CACHE_KEY};
use crate::domain::live_show::LiveShowDetails;

#[derive(Debug, Error)]
pub enum LiveShowStoreError {
    #[error("invalid argument: `{0}` is required")]
    InvalidArgument(&'static str),
    #[error(transparent)]
    Storage(#[from] ObjectStoreError),
    #[error("stored live show document is malformed: {0}")]
    Deserialization(#[source] serde_json::Error),
    #[error("failed to serialize live show document: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Container and object name of the persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    pub container: String,
    pub object: String,
}

impl DocumentLocation {
    pub fn new(container: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            object: object.into(),
        }
    }
}

pub type LiveShowCache = dyn Cache<Option<LiveShowDetails>>;

/// Storage-backed accessor for the live show document, fronted by a single cache entry.
///
/// Loads populate the cache (an absent document is cached as `None`) and never expire;
/// saves overwrite storage then the cache. Only [`LiveShowStore::invalidate`] forces
/// the next load back to storage.
#[derive(Clone)]
pub struct LiveShowStore {
    storage: Arc<dyn ObjectStore>,
    cache: Arc<LiveShowCache>,
    telemetry: Arc<dyn Telemetry>,
    location: DocumentLocation,
}

impl LiveShowStore {
    pub fn new(
        storage: Arc<dyn ObjectStore>,
        cache: Arc<LiveShowCache>,
        telemetry: Arc<dyn Telemetry>,
        location: DocumentLocation,
    ) -> Self {
        Self {
            storage,
            cache,
            telemetry,
            location,
        }
    }

    pub fn location(&self) -> &DocumentLocation {
        &self.location
    }

    pub async fn load(&self) -> Result<Option<LiveShowDetails>, LiveShowStoreError> {
        if let Some(cached) = self.cache.get(LIVE_SHOW_DETAILS_CACHE_KEY) {
            return Ok(cached);
        }

        let details = self.load_from_storage().await?;
        self.cache
            .set(LIVE_SHOW_DETAILS_CACHE_KEY, details.clone(), None);

        Ok(details)
    }

    /// Persist `details`, replacing whatever is stored.
    ///
    /// `None` is rejected before any storage call. The cache is only updated once the
    /// upload succeeded.
    pub async fn save(&self, details: Option<LiveShowDetails>) -> Result<(), LiveShowStoreError> {
        let details = details.ok_or(LiveShowStoreError::InvalidArgument("details"))?;
        let DocumentLocation { container, object } = &self.location;

        self.storage.create_container_if_not_exists(container).await?;

        let payload = serde_json::to_vec(&details).map_err(LiveShowStoreError::Serialization)?;
        let size_bytes = payload.len() as u64;

        let timer = DependencyTimer::start();
        let result = self
            .storage
            .put_object(container, object, Bytes::from(payload))
            .await;
        self.track(StorageOperation::Upload, size_bytes, timer, result.is_ok());
        result?;

        self.cache
            .set(LIVE_SHOW_DETAILS_CACHE_KEY, Some(details), None);

        info!(
            target = "onair::live_show::store",
            container = %container,
            object = %object,
            size_bytes,
            "Live show details saved"
        );
        Ok(())
    }

    /// Drop the cached entry; storage is left untouched.
    pub fn invalidate(&self) {
        self.cache.remove(LIVE_SHOW_DETAILS_CACHE_KEY);
        info!(
            target = "onair::live_show::store",
            "Live show cache entry invalidated"
        );
    }

    async fn load_from_storage(&self) -> Result<Option<LiveShowDetails>, LiveShowStoreError> {
        let DocumentLocation { container, object } = &self.location;

        if !self.storage.container_exists(container).await? {
            debug!(
                target = "onair::live_show::store",
                container = %container,
                "Container missing, no live show details yet"
            );
            return Ok(None);
        }

        let timer = DependencyTimer::start();
        let payload = match self.storage.get_object(container, object).await {
            Ok(Some(payload)) => {
                self.track(
                    StorageOperation::Download,
                    payload.len() as u64,
                    timer,
                    true,
                );
                payload
            }
            Ok(None) => {
                debug!(
                    target = "onair::live_show::store",
                    container = %container,
                    object = %object,
                    "Object missing, no live show details yet"
                );
                return Ok(None);
            }
            Err(err) => {
                self.track(StorageOperation::Download, 0, timer, false);
                return Err(err.into());
            }
        };

        let details = serde_json::from_slice::<LiveShowDetails>(&payload)
            .map_err(LiveShowStoreError::Deserialization)?;
        Ok(Some(details))
    }

    fn track(
        &self,
        operation: StorageOperation,
        size_bytes: u64,
        timer: DependencyTimer,
        success: bool,
    ) {
        if !self.telemetry.is_enabled() {
            return;
        }

        let DocumentLocation { container, object } = &self.location;
        self.telemetry.track_dependency(DependencyRecord {
            target: self.storage.target(),
            name: object.clone(),
            uri: self.storage.object_uri(container, object),
            operation,
            size_bytes,
            started_at: timer.started_at,
            duration: timer.started.elapsed(),
            success,
        });
    }
}

struct DependencyTimer {
    started_at: DateTime<Utc>,
    started: Instant,
}

impl DependencyTimer {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::application::testing::RecordingTelemetry;
    use crate::cache::{CacheConfig, MemoryCache};
    use crate::infra::storage::InMemoryObjectStore;

    const CONTAINER: &str = "liveshow";
    const OBJECT: &str = "liveshowdetails.json";

    struct Harness {
        storage: Arc<InMemoryObjectStore>,
        telemetry: Arc<RecordingTelemetry>,
        store: LiveShowStore,
    }

    fn harness() -> Harness {
        let storage = Arc::new(InMemoryObjectStore::new());
        let telemetry = Arc::new(RecordingTelemetry::enabled());
        let cache: Arc<LiveShowCache> = Arc::new(MemoryCache::new(&CacheConfig::default()));
        let store = LiveShowStore::new(
            storage.clone(),
            cache,
            telemetry.clone(),
            DocumentLocation::new(CONTAINER, OBJECT),
        );
        Harness {
            storage,
            telemetry,
            store,
        }
    }

    fn details(url: &str, message: &str) -> LiveShowDetails {
        LiveShowDetails {
            live_show_embed_url: Some(url.to_string()),
            admin_message: Some(message.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let h = harness();
        h.storage.insert(
            CONTAINER,
            OBJECT,
            serde_json::to_vec(&details("https://a", "hi")).unwrap(),
        );

        let first = h.store.load().await.unwrap();
        let second = h.store.load().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.unwrap().admin_message.as_deref(), Some("hi"));
        assert_eq!(h.storage.downloads(), 1);
    }

    #[tokio::test]
    async fn save_writes_through_to_cache() {
        let h = harness();
        let saved = details("https://a", "saved");

        h.store.save(Some(saved.clone())).await.unwrap();
        let loaded = h.store.load().await.unwrap();

        assert_eq!(loaded, Some(saved));
        assert_eq!(h.storage.downloads(), 0);
        assert_eq!(h.storage.uploads(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_exactly_one_refetch() {
        let h = harness();
        h.store.save(Some(details("https://a", "x"))).await.unwrap();

        h.store.invalidate();
        h.store.load().await.unwrap();
        h.store.load().await.unwrap();

        assert_eq!(h.storage.downloads(), 1);
    }

    #[tokio::test]
    async fn absent_document_loads_as_none_and_is_cached() {
        let h = harness();
        assert_eq!(h.store.load().await.unwrap(), None);

        // Container exists but the object does not.
        h.storage.create_container_if_not_exists(CONTAINER).await.unwrap();
        h.store.invalidate();
        assert_eq!(h.store.load().await.unwrap(), None);
        assert_eq!(h.store.load().await.unwrap(), None);
        assert_eq!(h.storage.downloads(), 1);
    }

    #[tokio::test]
    async fn absent_container_skips_download() {
        let h = harness();
        assert_eq!(h.store.load().await.unwrap(), None);
        assert_eq!(h.storage.downloads(), 0);
        assert!(h.telemetry.dependencies().is_empty());
    }

    #[tokio::test]
    async fn cached_none_hides_out_of_band_writes_until_invalidated() {
        let h = harness();
        assert_eq!(h.store.load().await.unwrap(), None);

        h.storage.insert(
            CONTAINER,
            OBJECT,
            serde_json::to_vec(&details("https://a", "elsewhere")).unwrap(),
        );
        assert_eq!(h.store.load().await.unwrap(), None);

        h.store.invalidate();
        let loaded = h.store.load().await.unwrap().expect("document");
        assert_eq!(loaded.admin_message.as_deref(), Some("elsewhere"));
    }

    #[tokio::test]
    async fn save_rejects_none_without_writing() {
        let h = harness();
        let err = h.store.save(None).await.expect_err("none rejected");
        assert!(matches!(err, LiveShowStoreError::InvalidArgument("details")));
        assert_eq!(h.storage.uploads(), 0);
        assert!(!h.storage.container_exists(CONTAINER).await.unwrap());
    }

    #[tokio::test]
    async fn save_creates_container_and_stores_json() {
        let h = harness();
        h.store.save(Some(details("https://a", "x"))).await.unwrap();

        let raw = h.storage.peek(CONTAINER, OBJECT).expect("stored object");
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["LiveShowEmbedUrl"], "https://a");
        assert!(json["NextShowDateUtc"].is_null());
    }

    #[tokio::test]
    async fn malformed_document_is_a_deserialization_error() {
        let h = harness();
        h.storage.insert(CONTAINER, OBJECT, &b"{not json"[..]);

        let err = h.store.load().await.expect_err("malformed");
        assert!(matches!(err, LiveShowStoreError::Deserialization(_)));

        // Nothing was cached, so the next load tries storage again.
        let _ = h.store.load().await;
        assert_eq!(h.storage.downloads(), 2);
    }

    #[tokio::test]
    async fn storage_calls_are_tracked() {
        let h = harness();
        h.store.save(Some(details("https://a", "x"))).await.unwrap();
        h.store.invalidate();
        h.store.load().await.unwrap();

        let records = h.telemetry.dependencies();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].operation, StorageOperation::Upload);
        assert_eq!(records[1].operation, StorageOperation::Download);
        assert!(records.iter().all(|r| r.success && r.name == OBJECT));
        assert_eq!(records[0].size_bytes, records[1].size_bytes);
        assert_eq!(records[0].target, "memory");
    }

    #[tokio::test]
    async fn disabled_telemetry_records_nothing() {
        let storage = Arc::new(InMemoryObjectStore::new());
        let telemetry = Arc::new(RecordingTelemetry::disabled());
        let store = LiveShowStore::new(
            storage,
            Arc::new(MemoryCache::new(&CacheConfig::default())),
            telemetry.clone(),
            DocumentLocation::new(CONTAINER, OBJECT),
        );

        store.save(Some(details("https://a", "x"))).await.unwrap();
        assert!(telemetry.dependencies().is_empty());
    }

    /// Accepts container operations but fails every upload after the first `allowed`.
    struct FlakyUploads {
        inner: InMemoryObjectStore,
        allowed: Mutex<usize>,
    }

    #[async_trait]
    impl ObjectStore for FlakyUploads {
        fn target(&self) -> String {
            self.inner.target()
        }

        fn object_uri(&self, container: &str, name: &str) -> String {
            self.inner.object_uri(container, name)
        }

        async fn container_exists(&self, container: &str) -> Result<bool, ObjectStoreError> {
            self.inner.container_exists(container).await
        }

        async fn create_container_if_not_exists(
            &self,
            container: &str,
        ) -> Result<(), ObjectStoreError> {
            self.inner.create_container_if_not_exists(container).await
        }

        async fn get_object(
            &self,
            container: &str,
            name: &str,
        ) -> Result<Option<Bytes>, ObjectStoreError> {
            self.inner.get_object(container, name).await
        }

        async fn put_object(
            &self,
            container: &str,
            name: &str,
            payload: Bytes,
        ) -> Result<(), ObjectStoreError> {
            {
                let mut allowed = self.allowed.lock().unwrap();
                if *allowed == 0 {
                    return Err(ObjectStoreError::status(403, "AuthorizationFailure"));
                }
                *allowed -= 1;
            }
            self.inner.put_object(container, name, payload).await
        }
    }

    #[tokio::test]
    async fn failed_save_propagates_and_keeps_cached_value() {
        let storage = Arc::new(FlakyUploads {
            inner: InMemoryObjectStore::new(),
            allowed: Mutex::new(1),
        });
        let telemetry = Arc::new(RecordingTelemetry::enabled());
        let store = LiveShowStore::new(
            storage.clone(),
            Arc::new(MemoryCache::new(&CacheConfig::default())),
            telemetry.clone(),
            DocumentLocation::new(CONTAINER, OBJECT),
        );

        let original = details("https://a", "original");
        store.save(Some(original.clone())).await.unwrap();

        let err = store
            .save(Some(details("https://b", "lost")))
            .await
            .expect_err("upload fails");
        assert!(matches!(
            err,
            LiveShowStoreError::Storage(ObjectStoreError::Status { status: 403, .. })
        ));

        assert_eq!(store.load().await.unwrap(), Some(original));
        assert_eq!(storage.inner.downloads(), 0);

        let records = telemetry.dependencies();
        assert_eq!(records.len(), 2);
        assert!(!records[1].success);
    }
}
