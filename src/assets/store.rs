use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;

use crate::foundation::error::{FrameError, FrameResult};

/// Read access to source images (base art, frame overlays, masks).
pub trait AssetSource: Send + Sync {
    /// Read the encoded bytes of the image at `path`.
    fn read(&self, path: &str) -> FrameResult<Vec<u8>>;
}

/// Blob storage for composited artifacts, addressed by namespace + filename.
///
/// No listing or deletion is required; superseded artifacts are never evicted.
pub trait ArtifactStore: Send + Sync {
    /// Make sure `namespace` exists. Must be idempotent.
    fn ensure_namespace(&self, namespace: &str) -> FrameResult<()>;

    /// Write `bytes` as `namespace/filename`, overwriting in place, and return the stored path.
    fn put(&self, namespace: &str, filename: &str, bytes: &[u8]) -> FrameResult<String>;

    /// Read back a previously stored artifact.
    fn read(&self, path: &str) -> FrameResult<Vec<u8>>;
}

/// Drop a trailing `?query` / `#fragment` (cache-busting suffixes).
pub fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Normalize and validate store-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments and any query suffix, and
/// rejects absolute paths or parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> FrameResult<String> {
    let s = strip_query(source).replace('\\', "/");
    if s.starts_with('/') {
        return Err(FrameError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(FrameError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FrameError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(FrameError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Reads source images relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn read(&self, path: &str) -> FrameResult<Vec<u8>> {
        let rel = normalize_rel_path(path).map_err(|e| FrameError::asset_load(path, e))?;
        let full = self.root.join(rel);
        std::fs::read(&full)
            .map_err(|e| FrameError::asset_load(path, format!("read '{}': {e}", full.display())))
    }
}

/// Directory-backed artifact store; returned paths are relative to the root.
#[derive(Clone, Debug)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for FsArtifactStore {
    fn ensure_namespace(&self, namespace: &str) -> FrameResult<()> {
        let rel = normalize_rel_path(namespace)?;
        let dir = self.root.join(rel);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create artifact namespace '{}'", dir.display()))
            .map_err(|e| FrameError::store_write(format!("{e:#}")))
    }

    fn put(&self, namespace: &str, filename: &str, bytes: &[u8]) -> FrameResult<String> {
        let rel = normalize_rel_path(&format!("{namespace}/{filename}"))?;
        let full = self.root.join(&rel);
        std::fs::write(&full, bytes)
            .with_context(|| format!("write artifact '{}'", full.display()))
            .map_err(|e| FrameError::store_write(format!("{e:#}")))?;
        Ok(rel)
    }

    fn read(&self, path: &str) -> FrameResult<Vec<u8>> {
        let rel = normalize_rel_path(path)?;
        let full = self.root.join(rel);
        std::fs::read(&full).map_err(|e| FrameError::asset_load(path, e))
    }
}

impl AssetSource for FsArtifactStore {
    fn read(&self, path: &str) -> FrameResult<Vec<u8>> {
        ArtifactStore::read(self, path)
    }
}

/// In-memory blob map usable both as an [`AssetSource`] and an [`ArtifactStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: Mutex<Vec<String>>,
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a blob at `path` (normalized).
    pub fn insert(&self, path: &str, bytes: Vec<u8>) -> FrameResult<()> {
        let key = normalize_rel_path(path)?;
        self.lock_blobs().insert(key, bytes);
        Ok(())
    }

    /// Return `true` if `path` holds a blob.
    pub fn contains(&self, path: &str) -> bool {
        normalize_rel_path(path)
            .map(|k| self.lock_blobs().contains_key(&k))
            .unwrap_or(false)
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.lock_blobs().keys().cloned().collect()
    }

    /// Namespaces passed to [`ArtifactStore::ensure_namespace`], deduplicated.
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Make every subsequent `put` fail with [`FrameError::StoreWrite`].
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    fn lock_blobs(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AssetSource for MemoryStore {
    fn read(&self, path: &str) -> FrameResult<Vec<u8>> {
        let key = normalize_rel_path(path).map_err(|e| FrameError::asset_load(path, e))?;
        self.lock_blobs()
            .get(&key)
            .cloned()
            .ok_or_else(|| FrameError::asset_load(path, "not found"))
    }
}

impl ArtifactStore for MemoryStore {
    fn ensure_namespace(&self, namespace: &str) -> FrameResult<()> {
        let ns = normalize_rel_path(namespace)?;
        let mut namespaces = self.namespaces.lock().unwrap_or_else(|e| e.into_inner());
        if !namespaces.contains(&ns) {
            namespaces.push(ns);
        }
        Ok(())
    }

    fn put(&self, namespace: &str, filename: &str, bytes: &[u8]) -> FrameResult<String> {
        if *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(FrameError::store_write(format!(
                "memory store rejected '{namespace}/{filename}'"
            )));
        }
        let key = normalize_rel_path(&format!("{namespace}/{filename}"))?;
        self.lock_blobs().insert(key.clone(), bytes.to_vec());
        Ok(key)
    }

    fn read(&self, path: &str) -> FrameResult<Vec<u8>> {
        AssetSource::read(self, path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
