use std::sync::Arc;

use image::RgbaImage;

use crate::cache::artifacts::{Artifact, ArtifactWriter};
use crate::cache::key::derive_key;
use crate::cache::namespace::CacheNamespace;
use crate::foundation::core::{EntityId, Role};
use crate::foundation::error::FrameResult;
use crate::render::compositor::Compositor;
use crate::scene::model::FrameConfig;
use crate::scene::settings::FrameSettings;
use crate::sync::host::TextureCache;

/// Compositor + artifact writer: turns a base image and config into a stored artifact.
#[derive(Clone)]
pub struct FramePipeline {
    settings: FrameSettings,
    compositor: Compositor,
    writer: ArtifactWriter,
    textures: Arc<dyn TextureCache>,
}

impl FramePipeline {
    /// Assemble a pipeline.
    pub fn new(
        settings: FrameSettings,
        compositor: Compositor,
        writer: ArtifactWriter,
        textures: Arc<dyn TextureCache>,
    ) -> Self {
        Self {
            settings,
            compositor,
            writer,
            textures,
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &FrameSettings {
        &self.settings
    }

    /// Artifact namespace.
    pub fn namespace(&self) -> &CacheNamespace {
        self.writer.namespace()
    }

    /// Composite, store under the derived key, and drop any stale texture for that slot.
    ///
    /// Always regenerates: the key is stable across configuration edits, so a cached slot
    /// can be out of date even when it exists.
    #[tracing::instrument(level = "debug", skip(self, config, entity), fields(entity = %entity))]
    pub fn produce(
        &self,
        base_image: &str,
        config: &FrameConfig,
        entity: &EntityId,
        role: Role,
    ) -> FrameResult<Artifact> {
        let key = derive_key(base_image, entity, role);
        let bytes = self.compositor.composite(
            base_image,
            config,
            self.settings.output_size,
            self.writer.format(),
            self.settings.quality,
        )?;
        let artifact = self.writer.write(&key, &bytes)?;
        self.textures.invalidate(&artifact.path);
        Ok(artifact)
    }

    /// Low-resolution in-memory render for the configuration UI.
    pub fn preview(&self, base_image: &str, config: &FrameConfig) -> FrameResult<RgbaImage> {
        self.compositor
            .render(base_image, config, self.settings.preview_size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
