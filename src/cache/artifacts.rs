use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::notify::NotificationGate;
use crate::assets::store::{ArtifactStore, strip_query};
use crate::cache::key::CacheKey;
use crate::cache::namespace::CacheNamespace;
use crate::foundation::error::FrameResult;
use crate::scene::settings::ArtifactFormat;

/// A stored artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Slot key.
    pub key: CacheKey,
    /// Store path, without cache-busting suffix.
    pub path: String,
    /// Path to display, with a cache-busting suffix appended.
    pub display_path: String,
}

/// Writes encoded artifacts into the cache namespace of an [`ArtifactStore`].
#[derive(Clone)]
pub struct ArtifactWriter {
    store: Arc<dyn ArtifactStore>,
    namespace: CacheNamespace,
    format: ArtifactFormat,
    gate: NotificationGate,
}

impl ArtifactWriter {
    /// Create a writer.
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        namespace: CacheNamespace,
        format: ArtifactFormat,
        gate: NotificationGate,
    ) -> Self {
        Self {
            store,
            namespace,
            format,
            gate,
        }
    }

    /// Namespace written to.
    pub fn namespace(&self) -> &CacheNamespace {
        &self.namespace
    }

    /// Encoding of written artifacts.
    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Store `bytes` under `key`, overwriting the slot, with notifications suppressed.
    pub fn write(&self, key: &CacheKey, bytes: &[u8]) -> FrameResult<Artifact> {
        let folder = self.namespace.folder();
        self.store.ensure_namespace(folder)?;

        let filename = key.file_name(self.format);
        let path = {
            let _quiet = self.gate.acquire();
            self.store.put(folder, &filename, bytes)?
        };
        tracing::debug!(key = %key, path = %path, bytes = bytes.len(), "artifact stored");

        Ok(Artifact {
            key: key.clone(),
            display_path: cache_busted(&path),
            path,
        })
    }
}

/// Append a `?v=<millis>` suffix so URL-keyed caches refetch.
pub fn cache_busted(path: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{}?v={millis}", strip_query(path))
}

#[cfg(test)]
#[path = "../../tests/unit/cache/artifacts.rs"]
mod tests;
