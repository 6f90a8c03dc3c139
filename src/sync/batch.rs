use crate::foundation::error::{FrameError, FrameResult};
use crate::scene::model::{Change, Entity, FrameConfig};
use crate::sync::host::{Actor, Confirmation, UpdateOptions};
use crate::sync::service::{FrameService, display_patch};

/// Counts from one regeneration sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entities whose artifact was regenerated and committed.
    pub processed: usize,
    /// Entities skipped because their original image is unknown.
    pub skipped: usize,
    /// Entities whose regeneration or commit failed.
    pub failed: usize,
}

enum Sweep {
    Processed,
    Skipped,
    Failed,
}

pub(crate) const MAINTENANCE_PROMPT: &str =
    "Regenerate every framed template and token? This may take a while.";

impl FrameService {
    /// Regenerate artifacts for every template and live entity with an active frame.
    ///
    /// Best effort: item failures are logged and counted, never propagated.
    #[tracing::instrument(skip(self))]
    pub fn regenerate_all(&self) -> BatchReport {
        let store = self.store();
        let mut report = BatchReport::default();
        for entity in store.templates().into_iter().chain(store.instances()) {
            let Some(config) = entity.active_config() else {
                continue;
            };
            match self.sweep_one(&entity, config) {
                Sweep::Processed => report.processed += 1,
                Sweep::Skipped => report.skipped += 1,
                Sweep::Failed => report.failed += 1,
            }
        }
        tracing::info!(
            processed = report.processed,
            skipped = report.skipped,
            failed = report.failed,
            "frame regeneration sweep finished"
        );
        report
    }

    fn sweep_one(&self, entity: &Entity, config: &FrameConfig) -> Sweep {
        let id = &entity.id;
        let Some(original) = entity
            .frame
            .original_image
            .clone()
            .or_else(|| entity.image.clone())
        else {
            tracing::warn!(entity = %id, "no base image; skipping");
            return Sweep::Skipped;
        };
        if self.namespace().contains(&original) {
            tracing::warn!(entity = %id, image = %original, "original image lost; skipping");
            return Sweep::Skipped;
        }

        let artifact = match self.pipeline().produce(&original, config, id, entity.role) {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::error!(entity = %id, error = %err, "regeneration failed");
                return Sweep::Failed;
            }
        };
        let mut patch = display_patch(&artifact, entity.role);
        patch.original_image = Change::Set(original);
        match self.submit(id, patch, UpdateOptions::default().frame_write_for(id)) {
            Ok(_) => Sweep::Processed,
            Err(err) => {
                tracing::error!(entity = %id, error = %err, "commit of regenerated frame failed");
                Sweep::Failed
            }
        }
    }

    /// Privileged, confirmed entry point to [`FrameService::regenerate_all`].
    ///
    /// Returns `Ok(None)` when the actor declines the confirmation.
    pub fn run_maintenance(
        &self,
        actor: &Actor,
        confirmation: &dyn Confirmation,
    ) -> FrameResult<Option<BatchReport>> {
        if !actor.privileged {
            tracing::warn!(actor = %actor.name, "maintenance refused");
            return Err(FrameError::permission_denied(format!(
                "'{}' may not regenerate frames",
                actor.name
            )));
        }
        if !confirmation.confirm(MAINTENANCE_PROMPT) {
            tracing::info!(actor = %actor.name, "maintenance declined");
            return Ok(None);
        }
        Ok(Some(self.regenerate_all()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/batch.rs"]
mod tests;
