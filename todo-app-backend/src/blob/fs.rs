use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use todo_app_shared::{validate_key, FileObject, TodoError};
use tokio::fs;
use tracing::{debug, error};

use super::{describe, BlobStore, StoredFile};

const OBJECTS_DIR: &str = "objects";
const META_DIR: &str = "meta";

/// Stores objects on the local filesystem.
///
/// Layout under the root directory:
///
/// - `objects/<key>`: the body, gzip compressed
/// - `meta/<key>.json`: the [`FileObject`] describing it
///
/// The metadata file is written last and removed first, so an object is only
/// visible once its body is fully on disk.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, TodoError> {
        let root = root.into();
        for dir in [OBJECTS_DIR, META_DIR] {
            fs::create_dir_all(root.join(dir)).await.map_err(|err| {
                TodoError::Configuration(format!(
                    "Failed to create blob directory {}: {err}",
                    root.join(dir).display()
                ))
            })?;
        }
        debug!("Blob store at {}", root.display());
        Ok(Self { root })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, TodoError> {
        validate_key(key)?;
        Ok(self.root.join(OBJECTS_DIR).join(key))
    }

    fn meta_path(&self, key: &str) -> Result<PathBuf, TodoError> {
        validate_key(key)?;
        Ok(self.root.join(META_DIR).join(format!("{key}.json")))
    }

    async fn read_meta(path: &Path) -> Result<Option<FileObject>, TodoError> {
        match fs::read(path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn compress(body: &[u8]) -> Result<Vec<u8>, TodoError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(body)
        .map_err(|e| TodoError::Storage(format!("Failed to compress file data: {e}")))?;
    encoder
        .finish()
        .map_err(|e| TodoError::Storage(format!("Failed to finish compression: {e}")))
}

fn decompress(data: &[u8]) -> Result<Vec<u8>, TodoError> {
    let mut decoder = GzDecoder::new(data);
    let mut body = Vec::new();
    decoder
        .read_to_end(&mut body)
        .map_err(|e| TodoError::Storage(format!("Failed to decompress file data: {e}")))?;
    Ok(body)
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<FileObject, TodoError> {
        let object_path = self.object_path(key)?;
        let meta_path = self.meta_path(key)?;
        let object = describe(key, content_type, &body);

        fs::write(&object_path, compress(&body)?)
            .await
            .inspect_err(|err| error!("Failed to write {}: {:?}", object_path.display(), err))?;
        fs::write(&meta_path, serde_json::to_vec_pretty(&object)?).await?;

        debug!("Stored {} ({} bytes)", key, object.size);
        Ok(object)
    }

    async fn get(&self, key: &str) -> Result<Option<StoredFile>, TodoError> {
        let Some(object) = Self::read_meta(&self.meta_path(key)?).await? else {
            return Ok(None);
        };
        let data = match fs::read(self.object_path(key)?).await {
            Ok(data) => data,
            // deleted between the two reads
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(StoredFile {
            object,
            body: decompress(&data)?,
        }))
    }

    async fn head(&self, key: &str) -> Result<Option<FileObject>, TodoError> {
        Self::read_meta(&self.meta_path(key)?).await
    }

    async fn exists(&self, key: &str) -> Result<bool, TodoError> {
        Ok(fs::try_exists(self.meta_path(key)?).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, TodoError> {
        let meta_path = self.meta_path(key)?;
        let object_path = self.object_path(key)?;
        match fs::remove_file(&meta_path).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        }
        match fs::remove_file(&object_path).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        debug!("Deleted {}", key);
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<FileObject>, TodoError> {
        let mut entries = fs::read_dir(self.root.join(META_DIR)).await?;
        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(object) = Self::read_meta(&path).await? {
                objects.push(object);
            }
        }
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}
