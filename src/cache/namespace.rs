use serde::{Deserialize, Serialize};

use crate::assets::store::strip_query;

/// Folder artifacts are written to unless settings say otherwise.
pub const DEFAULT_CACHE_FOLDER: &str = "token-frames";

/// Strategy for recognising a displayed-image path as an artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePathMatch {
    /// Path contains the configured or default folder name anywhere.
    ///
    /// Approximate: an asset folder whose name contains the cache folder name is misclassified.
    #[default]
    Substring,
    /// Path starts with `<folder>/` after normalization.
    Prefix,
}

/// The artifact namespace plus the rule deciding what lives inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheNamespace {
    folder: String,
    mode: CachePathMatch,
}

impl CacheNamespace {
    /// Namespace rooted at `folder`.
    pub fn new(folder: impl Into<String>, mode: CachePathMatch) -> Self {
        let folder = folder.into();
        let folder = folder.trim_matches('/').to_owned();
        Self { folder, mode }
    }

    /// Folder artifacts are written to.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Matching strategy.
    pub fn mode(&self) -> CachePathMatch {
        self.mode
    }

    /// `true` when `path` looks like an artifact in this namespace (or the default one).
    pub fn contains(&self, path: &str) -> bool {
        let path = strip_query(path).replace('\\', "/");
        let folders = [self.folder.as_str(), DEFAULT_CACHE_FOLDER];
        match self.mode {
            CachePathMatch::Substring => folders
                .iter()
                .any(|f| !f.is_empty() && path.contains(f)),
            CachePathMatch::Prefix => {
                let path = path.trim_start_matches("./").trim_start_matches('/');
                folders.iter().any(|f| {
                    !f.is_empty()
                        && path
                            .strip_prefix(f)
                            .is_some_and(|rest| rest.starts_with('/'))
                })
            }
        }
    }
}

impl Default for CacheNamespace {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FOLDER, CachePathMatch::Substring)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/namespace.rs"]
mod tests;
