//! Process-local object store, for tests and throwaway local runs.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use crate::application::storage::{ObjectStore, ObjectStoreError};

type Containers = HashMap<String, HashMap<String, Bytes>>;

/// Object store held in memory; counts reads and writes so callers can observe traffic.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    containers: Mutex<Containers>,
    downloads: AtomicUsize,
    uploads: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the counters.
    pub fn insert(&self, container: &str, name: &str, payload: impl Into<Bytes>) {
        self.with_containers(|containers| {
            containers
                .entry(container.to_string())
                .or_default()
                .insert(name.to_string(), payload.into());
        });
    }

    /// Read an object directly, bypassing the counters.
    pub fn peek(&self, container: &str, name: &str) -> Option<Bytes> {
        self.with_containers(|containers| {
            containers
                .get(container)
                .and_then(|objects| objects.get(name).cloned())
        })
    }

    /// Number of `get_object` calls served so far.
    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    /// Number of `put_object` calls served so far.
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    fn with_containers<R>(&self, f: impl FnOnce(&mut Containers) -> R) -> R {
        let mut guard = match self.containers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    target_module = "infra::storage::memory",
                    result = "poisoned_recovered",
                    "Recovered from poisoned storage lock"
                );
                poisoned.into_inner()
            }
        };
        f(&mut guard)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn target(&self) -> String {
        "memory".to_string()
    }

    fn object_uri(&self, container: &str, name: &str) -> String {
        format!("memory:///{container}/{name}")
    }

    async fn container_exists(&self, container: &str) -> Result<bool, ObjectStoreError> {
        Ok(self.with_containers(|containers| containers.contains_key(container)))
    }

    async fn create_container_if_not_exists(
        &self,
        container: &str,
    ) -> Result<(), ObjectStoreError> {
        self.with_containers(|containers| {
            containers.entry(container.to_string()).or_default();
        });
        Ok(())
    }

    async fn get_object(
        &self,
        container: &str,
        name: &str,
    ) -> Result<Option<Bytes>, ObjectStoreError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self.peek(container, name))
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        payload: Bytes,
    ) -> Result<(), ObjectStoreError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.with_containers(|containers| match containers.get_mut(container) {
            Some(objects) => {
                objects.insert(name.to_string(), payload);
                Ok(())
            }
            None => Err(ObjectStoreError::status(
                404,
                format!("container `{container}` does not exist"),
            )),
        })
    }
}
