//! Filesystem-backed object storage: containers are directories, objects are files.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::application::storage::{ObjectStore, ObjectStoreError};

#[derive(Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_path(&self, container: &str) -> Result<PathBuf, ObjectStoreError> {
        Ok(self.root.join(single_component(container)?))
    }

    fn object_path(&self, container: &str, name: &str) -> Result<PathBuf, ObjectStoreError> {
        Ok(self.container_path(container)?.join(single_component(name)?))
    }
}

/// Accept only names that stay inside their parent directory.
fn single_component(name: &str) -> Result<&Path, ObjectStoreError> {
    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(ObjectStoreError::InvalidName(name.to_string())),
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    fn target(&self) -> String {
        "localhost".to_string()
    }

    fn object_uri(&self, container: &str, name: &str) -> String {
        format!("file://{}", self.root.join(container).join(name).display())
    }

    async fn container_exists(&self, container: &str) -> Result<bool, ObjectStoreError> {
        let path = self.container_path(container)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(ObjectStoreError::Io(err)),
        }
    }

    async fn create_container_if_not_exists(
        &self,
        container: &str,
    ) -> Result<(), ObjectStoreError> {
        let path = self.container_path(container)?;
        fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn get_object(
        &self,
        container: &str,
        name: &str,
    ) -> Result<Option<Bytes>, ObjectStoreError> {
        let path = self.object_path(container, name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ObjectStoreError::Io(err)),
        }
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        payload: Bytes,
    ) -> Result<(), ObjectStoreError> {
        let path = self.object_path(container, name)?;
        let staging = self
            .container_path(container)?
            .join(format!(".{name}.{}.tmp", Uuid::new_v4()));

        let mut file = fs::File::create(&staging).await?;
        if let Err(err) = write_all(&mut file, &payload).await {
            drop(file);
            let _ = fs::remove_file(&staging).await;
            return Err(ObjectStoreError::Io(err));
        }
        drop(file);

        if let Err(err) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(ObjectStoreError::Io(err));
        }
        Ok(())
    }
}

async fn write_all(file: &mut fs::File, payload: &[u8]) -> Result<(), std::io::Error> {
    file.write_all(payload).await?;
    file.flush().await?;
    file.sync_all().await
}
