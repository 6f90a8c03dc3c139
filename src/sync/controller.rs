use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cache::artifacts::Artifact;
use crate::foundation::core::{EntityId, Role};
use crate::foundation::error::{FrameError, FrameResult};
use crate::render::pipeline::FramePipeline;
use crate::scene::model::{Change, Entity, EntityPatch, FrameConfig};
use crate::sync::detector::{Staleness, StalenessDetector};
use crate::sync::host::{EntityStore, UpdateOptions};

/// Per-entity interception phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterceptState {
    /// No interception pending.
    #[default]
    Idle,
    /// Original update cancelled; artifact being generated.
    Intercepted,
    /// Artifact ready; replacement update being committed.
    Reissuing,
    /// Generation failed; original update being committed as-is.
    Fallback,
}

/// What happened to a submitted update.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// Committed unmodified.
    Committed(Entity),
    /// Committed unmodified; it disabled or removed the frame configuration.
    Restored(Entity),
    /// Intercepted and replaced by an update pointing at a fresh artifact.
    Reissued {
        /// Committed entity.
        entity: Entity,
        /// Artifact now displayed.
        artifact: Artifact,
    },
    /// Intercepted, generation failed, original update committed instead.
    FellBack {
        /// Committed entity.
        entity: Entity,
        /// Generation failure.
        reason: String,
    },
}

impl UpdateOutcome {
    /// Entity as committed.
    pub fn entity(&self) -> &Entity {
        match self {
            Self::Committed(e) | Self::Restored(e) => e,
            Self::Reissued { entity, .. } | Self::FellBack { entity, .. } => entity,
        }
    }

    /// Consume into the committed entity.
    pub fn into_entity(self) -> Entity {
        match self {
            Self::Committed(e) | Self::Restored(e) => e,
            Self::Reissued { entity, .. } | Self::FellBack { entity, .. } => entity,
        }
    }
}

type StateMap = Mutex<HashMap<EntityId, InterceptState>>;

/// Tracks one interception cycle; the entity returns to `Idle` when dropped.
struct Cycle<'a> {
    states: &'a StateMap,
    id: EntityId,
}

impl<'a> Cycle<'a> {
    fn begin(states: &'a StateMap, id: &EntityId) -> Self {
        let cycle = Self {
            states,
            id: id.clone(),
        };
        cycle.set(InterceptState::Intercepted);
        cycle
    }

    fn set(&self, state: InterceptState) {
        tracing::debug!(entity = %self.id, ?state, "interception state");
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(self.id.clone(), state);
    }
}

impl Drop for Cycle<'_> {
    fn drop(&mut self) {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

/// Routes entity updates through the staleness detector and defers image changes until their
/// framed artifact exists, so the frame and its base image commit together.
pub struct InterceptionController {
    store: Arc<dyn EntityStore>,
    pipeline: FramePipeline,
    detector: StalenessDetector,
    states: StateMap,
    flights: Mutex<HashMap<EntityId, Arc<Mutex<()>>>>,
}

impl InterceptionController {
    /// Controller committing to `store` and rendering with `pipeline`.
    pub fn new(store: Arc<dyn EntityStore>, pipeline: FramePipeline) -> Self {
        let detector = StalenessDetector::new(pipeline.namespace().clone());
        Self {
            store,
            pipeline,
            detector,
            states: Mutex::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Host entity store.
    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    /// Render pipeline.
    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    /// Staleness detector.
    pub fn detector(&self) -> &StalenessDetector {
        &self.detector
    }

    /// Current interception phase of `id`.
    pub fn state(&self, id: &EntityId) -> InterceptState {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    /// Submit an update. Updates to one entity are serialized; different entities proceed
    /// independently.
    #[tracing::instrument(level = "debug", skip(self, patch, opts), fields(entity = %id))]
    pub fn submit(
        &self,
        id: &EntityId,
        patch: EntityPatch,
        opts: UpdateOptions,
    ) -> FrameResult<UpdateOutcome> {
        let flight = self.flight(id);
        let _serialized = flight.lock().unwrap_or_else(|e| e.into_inner());
        self.dispatch(id, patch, &opts)
    }

    fn flight(&self, id: &EntityId) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(flights.entry(id.clone()).or_default())
    }

    fn dispatch(
        &self,
        id: &EntityId,
        patch: EntityPatch,
        opts: &UpdateOptions,
    ) -> FrameResult<UpdateOutcome> {
        let entity = self
            .store
            .get(id)
            .ok_or_else(|| FrameError::entity(format!("unknown entity '{id}'")))?;

        match self.detector.classify(&entity, &patch, opts) {
            Staleness::Pass => self
                .store
                .commit(id, &patch, opts)
                .map(UpdateOutcome::Committed),
            Staleness::Restore => {
                tracing::debug!(entity = %id, "frame configuration disabled by update");
                self.store
                    .commit(id, &patch, opts)
                    .map(UpdateOutcome::Restored)
            }
            Staleness::SuppressAndRegenerate { base_image, config } => {
                self.intercept(&entity, patch, opts, &base_image, &config)
            }
        }
    }

    fn intercept(
        &self,
        entity: &Entity,
        patch: EntityPatch,
        opts: &UpdateOptions,
        base_image: &str,
        config: &FrameConfig,
    ) -> FrameResult<UpdateOutcome> {
        let id = &entity.id;
        let cycle = Cycle::begin(&self.states, id);
        tracing::info!(entity = %id, base = base_image, "image update intercepted");

        match self.pipeline.produce(base_image, config, id, entity.role) {
            Ok(artifact) => {
                cycle.set(InterceptState::Reissuing);
                let replacement = reissue_patch(patch, base_image, &artifact, entity.role);
                let committed = self
                    .dispatch(id, replacement, &opts.frame_write_for(id))?
                    .into_entity();
                tracing::info!(entity = %id, key = %artifact.key, "framed image reissued");
                Ok(UpdateOutcome::Reissued {
                    entity: committed,
                    artifact,
                })
            }
            Err(err) => {
                tracing::warn!(
                    entity = %id,
                    error = %err,
                    "frame generation failed; applying original update"
                );
                cycle.set(InterceptState::Fallback);
                let fallback = fallback_patch(patch, base_image, entity);
                let committed = self.store.commit(id, &fallback, opts)?;
                Ok(UpdateOutcome::FellBack {
                    entity: committed,
                    reason: err.to_string(),
                })
            }
        }
    }
}

/// The original update with its image swapped for the artifact and frame state recorded.
///
/// All other fields of `original` are carried over unchanged.
fn reissue_patch(
    original: EntityPatch,
    base_image: &str,
    artifact: &Artifact,
    role: Role,
) -> EntityPatch {
    EntityPatch {
        image: Some(artifact.display_path.clone()),
        original_image: Change::Set(base_image.to_owned()),
        current_cache_key: Change::Set(artifact.key.to_string()),
        cached_artifact_path: match role {
            Role::Prototype => Change::Set(artifact.path.clone()),
            Role::Instance => original.cached_artifact_path,
        },
        ..original
    }
}

/// The original update, plus frame bookkeeping that no longer describes the displayed image.
///
/// A raw base image is about to be displayed, so any previous artifact key is dropped and the new
/// base becomes the recorded original. Entities that were never framed get the update unchanged.
fn fallback_patch(original: EntityPatch, base_image: &str, entity: &Entity) -> EntityPatch {
    if entity.frame.is_empty() {
        return original;
    }
    EntityPatch {
        original_image: Change::Set(base_image.to_owned()),
        current_cache_key: Change::Clear,
        cached_artifact_path: match entity.role {
            Role::Prototype => Change::Clear,
            Role::Instance => original.cached_artifact_path,
        },
        ..original
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/controller.rs"]
mod tests;
