//! Configuration-driven frame operations: apply, restore, template generation, and preview.

use std::sync::Arc;

use image::RgbaImage;

use crate::assets::notify::NotificationGate;
use crate::assets::store::{ArtifactStore, AssetSource};
use crate::cache::artifacts::{Artifact, ArtifactWriter};
use crate::cache::namespace::CacheNamespace;
use crate::foundation::core::{EntityId, Role};
use crate::foundation::error::{FrameError, FrameResult};
use crate::render::compositor::Compositor;
use crate::render::pipeline::FramePipeline;
use crate::scene::model::{Change, Entity, EntityPatch, FrameConfig};
use crate::scene::settings::FrameSettings;
use crate::sync::controller::{InterceptionController, UpdateOutcome};
use crate::sync::host::{EntityStore, NoopTextureCache, TextureCache, UpdateOptions};

/// External collaborators the frame core talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Host entity store.
    pub entities: Arc<dyn EntityStore>,
    /// Source of base, frame, and mask images.
    pub assets: Arc<dyn AssetSource>,
    /// Destination of generated artifacts.
    pub artifacts: Arc<dyn ArtifactStore>,
    /// Client-side texture cache.
    pub textures: Arc<dyn TextureCache>,
    /// Upload notification suppression.
    pub notifications: NotificationGate,
}

impl Collaborators {
    /// Collaborators with no texture cache and silent notifications.
    pub fn new(
        entities: Arc<dyn EntityStore>,
        assets: Arc<dyn AssetSource>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            entities,
            assets,
            artifacts,
            textures: Arc::new(NoopTextureCache),
            notifications: NotificationGate::silent(),
        }
    }

    /// Builder-style texture cache setter.
    pub fn with_textures(mut self, textures: Arc<dyn TextureCache>) -> Self {
        self.textures = textures;
        self
    }

    /// Builder-style notification gate setter.
    pub fn with_notifications(mut self, gate: NotificationGate) -> Self {
        self.notifications = gate;
        self
    }
}

/// Result of [`FrameService::apply_frame`].
#[derive(Clone, Debug, PartialEq)]
pub enum ApplyOutcome {
    /// A fresh artifact is displayed.
    Applied {
        /// Committed entity.
        entity: Entity,
        /// Artifact now displayed.
        artifact: Artifact,
    },
    /// The configuration is inactive; the entity was restored instead.
    Restored(RestoreOutcome),
    /// Generation failed; the entity is unchanged apart from a newly recorded original image.
    Failed {
        /// Failure description.
        reason: String,
    },
}

/// Result of [`FrameService::restore`].
#[derive(Clone, Debug, PartialEq)]
pub enum RestoreOutcome {
    /// The original image is displayed again and frame state is cleared.
    Restored(Entity),
    /// No original image was recorded; nothing changed.
    NothingToRestore,
}

/// Entry point for frame operations on live entities and templates.
pub struct FrameService {
    controller: InterceptionController,
}

impl FrameService {
    /// Validate `settings` and wire a service around `hosts`.
    pub fn new(settings: FrameSettings, hosts: Collaborators) -> FrameResult<Self> {
        settings.validate()?;
        let writer = ArtifactWriter::new(
            hosts.artifacts,
            settings.namespace(),
            settings.format,
            hosts.notifications,
        );
        let pipeline = FramePipeline::new(
            settings,
            Compositor::new(hosts.assets),
            writer,
            hosts.textures,
        );
        Ok(Self {
            controller: InterceptionController::new(hosts.entities, pipeline),
        })
    }

    /// Interception controller every entity write goes through.
    pub fn controller(&self) -> &InterceptionController {
        &self.controller
    }

    /// Active settings.
    pub fn settings(&self) -> &FrameSettings {
        self.pipeline().settings()
    }

    /// Artifact namespace.
    pub fn namespace(&self) -> &CacheNamespace {
        self.pipeline().namespace()
    }

    pub(crate) fn pipeline(&self) -> &FramePipeline {
        self.controller.pipeline()
    }

    pub(crate) fn store(&self) -> &Arc<dyn EntityStore> {
        self.controller.store()
    }

    fn entity(&self, id: &EntityId) -> FrameResult<Entity> {
        self.store()
            .get(id)
            .ok_or_else(|| FrameError::entity(format!("unknown entity '{id}'")))
    }

    /// Route a host update through interception.
    pub fn submit(
        &self,
        id: &EntityId,
        patch: EntityPatch,
        opts: UpdateOptions,
    ) -> FrameResult<UpdateOutcome> {
        self.controller.submit(id, patch, opts)
    }

    fn commit_own(&self, id: &EntityId, patch: EntityPatch) -> FrameResult<Entity> {
        self.controller
            .submit(id, patch, UpdateOptions::default().frame_write_for(id))
            .map(UpdateOutcome::into_entity)
    }

    /// (Re)generate the artifact for an entity's current configuration and display it.
    ///
    /// An inactive configuration restores the entity instead. The artifact is always
    /// regenerated; `force_regenerate` is recorded for diagnostics only.
    #[tracing::instrument(skip(self), fields(entity = %id))]
    pub fn apply_frame(&self, id: &EntityId, force_regenerate: bool) -> FrameResult<ApplyOutcome> {
        let entity = self.entity(id)?;
        let Some(config) = entity.active_config().cloned() else {
            tracing::debug!(entity = %id, "frame inactive; restoring");
            return self.restore(id).map(ApplyOutcome::Restored);
        };

        let original = match (&entity.frame.original_image, &entity.image) {
            (Some(original), _) => original.clone(),
            (None, Some(current)) if !self.namespace().contains(current) => {
                let patch = EntityPatch {
                    original_image: Change::Set(current.clone()),
                    ..EntityPatch::default()
                };
                self.commit_own(id, patch)?;
                current.clone()
            }
            (None, Some(current)) => {
                tracing::warn!(entity = %id, image = %current, "original image lost; cannot frame");
                return Ok(ApplyOutcome::Failed {
                    reason: format!("displayed image '{current}' is already an artifact"),
                });
            }
            (None, None) => {
                return Ok(ApplyOutcome::Failed {
                    reason: "entity has no image".to_owned(),
                });
            }
        };

        let artifact = match self.pipeline().produce(&original, &config, id, entity.role) {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::error!(entity = %id, error = %err, "frame application failed");
                return Ok(ApplyOutcome::Failed {
                    reason: err.to_string(),
                });
            }
        };

        let committed = self.commit_own(id, display_patch(&artifact, entity.role))?;
        tracing::info!(entity = %id, key = %artifact.key, "frame applied");
        Ok(ApplyOutcome::Applied {
            entity: committed,
            artifact,
        })
    }

    /// Display the recorded original image again and drop all frame state and configuration.
    #[tracing::instrument(skip(self), fields(entity = %id))]
    pub fn restore(&self, id: &EntityId) -> FrameResult<RestoreOutcome> {
        let entity = self.entity(id)?;
        let Some(original) = entity.frame.original_image else {
            tracing::debug!(entity = %id, "no original image recorded");
            return Ok(RestoreOutcome::NothingToRestore);
        };
        let committed = self.commit_own(id, EntityPatch::restore_to(original))?;
        tracing::info!(entity = %id, "frame removed");
        Ok(RestoreOutcome::Restored(committed))
    }

    /// Produce an artifact for a template that has no live instance. No entity is modified.
    #[tracing::instrument(skip(self, config), fields(template = %template_id))]
    pub fn generate_for_template(
        &self,
        base_image: &str,
        config: &FrameConfig,
        template_id: &EntityId,
    ) -> FrameResult<Artifact> {
        if !config.is_active() {
            return Err(FrameError::config_invalid(
                "frame is disabled or has no frame image",
            ));
        }
        self.pipeline()
            .produce(base_image, config, template_id, Role::Prototype)
            .inspect_err(|err| {
                tracing::error!(template = %template_id, error = %err, "template frame failed");
            })
    }

    /// Low-resolution render for the configuration UI; nothing is stored.
    pub fn preview(&self, base_image: &str, config: &FrameConfig) -> FrameResult<RgbaImage> {
        self.pipeline().preview(base_image, config)
    }
}

/// Patch displaying `artifact` and recording its key.
pub(crate) fn display_patch(artifact: &Artifact, role: Role) -> EntityPatch {
    EntityPatch {
        image: Some(artifact.display_path.clone()),
        current_cache_key: Change::Set(artifact.key.to_string()),
        cached_artifact_path: match role {
            Role::Prototype => Change::Set(artifact.path.clone()),
            Role::Instance => Change::Keep,
        },
        ..EntityPatch::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/service.rs"]
mod tests;
