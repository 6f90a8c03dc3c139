use std::fmt;

use crate::assets::store::strip_query;
use crate::foundation::core::{EntityId, Role};
use crate::scene::settings::ArtifactFormat;

/// Prefix shared by every cache key and artifact filename.
pub const KEY_PREFIX: &str = "frame";

/// Deterministic identity of one cached artifact slot.
///
/// Same role, entity, and base filename always map to the same key; the slot is overwritten in
/// place on regeneration.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Borrow the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Artifact filename for this key in `format`.
    pub fn file_name(&self, format: ArtifactFormat) -> String {
        format!("{}.{}", self.0, format.extension())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(k: CacheKey) -> Self {
        k.0
    }
}

/// Derive the cache key for `(role, entity, base image)`.
pub fn derive_key(base_image: &str, entity: &EntityId, role: Role) -> CacheKey {
    let stem = sanitize_stem(base_stem(base_image));
    CacheKey(format!(
        "{KEY_PREFIX}_{}_{}_{stem}",
        role.key_segment(),
        entity.as_str()
    ))
}

/// File name of `path` without directory, extension, or query suffix.
pub fn base_stem(path: &str) -> &str {
    let path = strip_query(path);
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/cache/key.rs"]
mod tests;
