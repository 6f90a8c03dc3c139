//! Seams to the host application: entity store, texture cache, and confirmation prompts.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::assets::store::strip_query;
use crate::foundation::core::{EntityId, Role};
use crate::foundation::error::{FrameError, FrameResult};
use crate::scene::model::{Entity, EntityPatch};

/// Marks an update as written by the frame core itself for one specific entity.
///
/// Lives only in [`UpdateOptions`] for a single call; it is never persisted with the entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameWrite {
    entity: EntityId,
}

/// Non-persisted options travelling with one update call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Originating user or system actor.
    pub actor: Option<String>,
    frame_write: Option<FrameWrite>,
}

impl UpdateOptions {
    /// Options for an update made by `actor`.
    pub fn by(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
            frame_write: None,
        }
    }

    /// Same options, tagged as the frame core's own write to `entity`.
    pub fn frame_write_for(&self, entity: &EntityId) -> Self {
        Self {
            actor: self.actor.clone(),
            frame_write: Some(FrameWrite {
                entity: entity.clone(),
            }),
        }
    }

    /// `true` when tagged as the frame core's own write to `entity`.
    pub fn is_frame_write_for(&self, entity: &EntityId) -> bool {
        self.frame_write
            .as_ref()
            .is_some_and(|w| &w.entity == entity)
    }

    /// `true` when tagged as any frame-core write.
    pub fn is_frame_write(&self) -> bool {
        self.frame_write.is_some()
    }
}

/// Host entity store.
///
/// `commit` persists a patch as-is; interception happens before it is called.
pub trait EntityStore: Send + Sync {
    /// Current state of an entity.
    fn get(&self, id: &EntityId) -> Option<Entity>;

    /// All live instances.
    fn instances(&self) -> Vec<Entity>;

    /// All templates/prototypes.
    fn templates(&self) -> Vec<Entity>;

    /// Persist `patch` and return the committed entity.
    fn commit(&self, id: &EntityId, patch: &EntityPatch, opts: &UpdateOptions)
    -> FrameResult<Entity>;
}

/// Client-side texture cache keyed by image path.
pub trait TextureCache: Send + Sync {
    /// Forget any cached texture for `path`.
    fn invalidate(&self, path: &str);
}

/// Texture cache that caches nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTextureCache;

impl TextureCache for NoopTextureCache {
    fn invalidate(&self, _path: &str) {}
}

/// Texture cache that records invalidations.
#[derive(Debug, Default)]
pub struct RecordingTextureCache {
    invalidated: Mutex<Vec<String>>,
}

impl RecordingTextureCache {
    /// Paths invalidated so far, in order.
    pub fn invalidated(&self) -> Vec<String> {
        self.invalidated
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl TextureCache for RecordingTextureCache {
    fn invalidate(&self, path: &str) {
        self.invalidated
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(strip_query(path).to_owned());
    }
}

/// Interactive yes/no prompt.
pub trait Confirmation {
    /// Ask the user; `true` means proceed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Who is asking for a privileged operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    /// Display name.
    pub name: String,
    /// Whether the actor may run maintenance operations.
    pub privileged: bool,
}

impl Actor {
    /// Privileged actor.
    pub fn privileged(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: true,
        }
    }

    /// Regular actor.
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: false,
        }
    }
}

/// One persisted commit and the options it was made with.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitRecord {
    /// Target entity.
    pub id: EntityId,
    /// Patch that was persisted.
    pub patch: EntityPatch,
    /// Call options (never persisted on the entity).
    pub opts: UpdateOptions,
}

#[derive(Default)]
struct StoreState {
    entities: BTreeMap<EntityId, Entity>,
    log: Vec<CommitRecord>,
}

/// In-memory [`EntityStore`] with a commit log.
#[derive(Default)]
pub struct InMemoryEntityStore {
    state: Mutex<StoreState>,
}

impl InMemoryEntityStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity without going through `commit`.
    pub fn insert(&self, entity: Entity) {
        self.lock().entities.insert(entity.id.clone(), entity);
    }

    /// Commits so far, oldest first.
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.lock().log.clone()
    }

    /// Commits targeting `id`.
    pub fn commits_for(&self, id: &EntityId) -> Vec<CommitRecord> {
        self.lock()
            .log
            .iter()
            .filter(|c| &c.id == id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn by_role(&self, role: Role) -> Vec<Entity> {
        self.lock()
            .entities
            .values()
            .filter(|e| e.role == role)
            .cloned()
            .collect()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn get(&self, id: &EntityId) -> Option<Entity> {
        self.lock().entities.get(id).cloned()
    }

    fn instances(&self) -> Vec<Entity> {
        self.by_role(Role::Instance)
    }

    fn templates(&self) -> Vec<Entity> {
        self.by_role(Role::Prototype)
    }

    fn commit(
        &self,
        id: &EntityId,
        patch: &EntityPatch,
        opts: &UpdateOptions,
    ) -> FrameResult<Entity> {
        let mut state = self.lock();
        let entity = state
            .entities
            .get_mut(id)
            .ok_or_else(|| FrameError::entity(format!("unknown entity '{id}'")))?;
        entity.apply(patch)?;
        let committed = entity.clone();
        state.log.push(CommitRecord {
            id: id.clone(),
            patch: patch.clone(),
            opts: opts.clone(),
        });
        Ok(committed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/host.rs"]
mod tests;
