//! Tokenframe composites decorative frames onto token artwork and keeps the framed artifacts in
//! step with the entities that display them.
//!
//! The moving parts:
//!
//! - A [`Compositor`] that layers background, masked base image, and frame into one square image
//! - Deterministic [`CacheKey`]s so each `(role, entity, base image)` owns one artifact slot
//! - An [`InterceptionController`] that holds back image updates until their framed artifact is
//!   stored, then reissues them pointing at the artifact
//! - A [`FrameService`] exposing apply/restore, template generation, previews, and a batch sweep
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Asset reading, decoding, and artifact storage.
pub mod assets;
/// Cache keys, artifact namespace, and artifact writes.
pub mod cache;
pub(crate) mod effects;
/// Frame compositing.
pub mod render;
/// Entity and settings model.
pub mod scene;
/// Update interception and frame operations.
pub mod sync;

pub use crate::foundation::core::{EntityId, Placement, Rgb, Rgba8Premul, Role};
pub use crate::foundation::error::{FrameError, FrameResult};

pub use crate::assets::notify::{NotificationGate, SuppressionGuard};
pub use crate::assets::store::{
    ArtifactStore, AssetSource, FsArtifactStore, FsAssetSource, MemoryStore,
};
pub use crate::cache::artifacts::{Artifact, ArtifactWriter};
pub use crate::cache::key::{CacheKey, derive_key};
pub use crate::cache::namespace::{CacheNamespace, CachePathMatch, DEFAULT_CACHE_FOLDER};
pub use crate::render::compositor::Compositor;
pub use crate::render::pipeline::FramePipeline;
pub use crate::scene::model::{
    Change, ConfigChange, Entity, EntityPatch, FrameConfig, FrameState, effective_config,
};
pub use crate::scene::settings::{ArtifactFormat, FrameSettings};
pub use crate::sync::batch::BatchReport;
pub use crate::sync::controller::{InterceptState, InterceptionController, UpdateOutcome};
pub use crate::sync::detector::{Staleness, StalenessDetector};
pub use crate::sync::host::{
    Actor, CommitRecord, Confirmation, EntityStore, InMemoryEntityStore, NoopTextureCache,
    RecordingTextureCache, TextureCache, UpdateOptions,
};
pub use crate::sync::service::{ApplyOutcome, Collaborators, FrameService, RestoreOutcome};
