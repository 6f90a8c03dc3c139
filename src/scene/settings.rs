use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::namespace::{CacheNamespace, CachePathMatch, DEFAULT_CACHE_FOLDER};
use crate::foundation::error::{FrameError, FrameResult};

/// Encoded artifact format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// WebP (lossless with the `image` encoder).
    #[default]
    Webp,
    /// PNG.
    Png,
    /// JPEG; honours `quality`, drops alpha.
    Jpeg,
}

impl ArtifactFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Process-wide frame cache settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameSettings {
    /// Artifact namespace folder.
    pub cache_folder: String,
    /// Side length of stored artifacts in pixels.
    pub output_size: u32,
    /// Side length of in-memory previews in pixels.
    pub preview_size: u32,
    /// Encoder quality in `0..=1`.
    pub quality: f32,
    /// Artifact encoding.
    pub format: ArtifactFormat,
    /// How displayed-image paths are recognised as artifacts.
    pub cache_path_match: CachePathMatch,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            cache_folder: DEFAULT_CACHE_FOLDER.to_owned(),
            output_size: 512,
            preview_size: 200,
            quality: 0.92,
            format: ArtifactFormat::Webp,
            cache_path_match: CachePathMatch::Substring,
        }
    }
}

impl FrameSettings {
    /// Parse settings from a JSON reader and validate them.
    pub fn from_reader<R: std::io::Read>(r: R) -> FrameResult<Self> {
        let settings: Self = serde_json::from_reader(r)
            .map_err(|e| FrameError::validation(format!("parse frame settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FrameResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FrameError::validation(format!("open frame settings '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check ranges.
    pub fn validate(&self) -> FrameResult<()> {
        if self.cache_folder.trim().is_empty() {
            return Err(FrameError::validation("cacheFolder must be non-empty"));
        }
        if self.output_size == 0 || self.preview_size == 0 {
            return Err(FrameError::validation(
                "outputSize and previewSize must be > 0",
            ));
        }
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(FrameError::validation("quality must be within 0..=1"));
        }
        Ok(())
    }

    /// Namespace matcher for these settings.
    pub fn namespace(&self) -> CacheNamespace {
        CacheNamespace::new(self.cache_folder.clone(), self.cache_path_match)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/settings.rs"]
mod tests;
