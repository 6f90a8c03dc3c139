use crate::cache::namespace::CacheNamespace;
use crate::scene::model::{ConfigChange, Entity, EntityPatch, FrameConfig, effective_config};
use crate::sync::host::UpdateOptions;

/// What to do with a proposed update.
#[derive(Clone, Debug, PartialEq)]
pub enum Staleness {
    /// Unrelated to framing, or the frame core's own write: apply unmodified.
    Pass,
    /// A new base image would overwrite the frame; intercept and regenerate.
    SuppressAndRegenerate {
        /// Incoming base image.
        base_image: String,
        /// Configuration in effect once the update lands.
        config: FrameConfig,
    },
    /// The update disables or removes the configuration; apply unmodified.
    Restore,
}

/// Classifies updates against the entity's current frame state.
#[derive(Clone, Debug, Default)]
pub struct StalenessDetector {
    namespace: CacheNamespace,
}

impl StalenessDetector {
    /// Detector treating paths inside `namespace` as artifacts.
    pub fn new(namespace: CacheNamespace) -> Self {
        Self { namespace }
    }

    /// Artifact namespace.
    pub fn namespace(&self) -> &CacheNamespace {
        &self.namespace
    }

    /// Decide how `patch` must be handled for `entity`.
    pub fn classify(
        &self,
        entity: &Entity,
        patch: &EntityPatch,
        opts: &UpdateOptions,
    ) -> Staleness {
        if opts.is_frame_write_for(&entity.id) {
            return Staleness::Pass;
        }

        let effective = match effective_config(entity.config.as_ref(), patch.config.as_ref()) {
            Ok(cfg) => cfg,
            Err(err) => {
                // The host rejects the malformed config on commit; nothing to regenerate.
                tracing::debug!(entity = %entity.id, error = %err, "unmergeable config in update");
                return Staleness::Pass;
            }
        };

        if let Some(change) = &patch.config {
            let disables = match change {
                ConfigChange::Clear => true,
                _ => !effective.as_ref().is_some_and(|c| c.enabled),
            };
            if disables {
                return Staleness::Restore;
            }
        }

        let Some(image) = patch.image.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Staleness::Pass;
        };
        if self.namespace.contains(image) {
            return Staleness::Pass;
        }
        match effective {
            Some(config) if config.is_active() => Staleness::SuppressAndRegenerate {
                base_image: image.to_owned(),
                config,
            },
            _ => Staleness::Pass,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/detector.rs"]
mod tests;
