use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::foundation::core::{EntityId, Rgb, Role};
use crate::foundation::error::{FrameError, FrameResult};

/// Per-entity frame configuration produced by the configuration UI.
///
/// Offsets are fractions of the output size so previews and full renders line up. Every field
/// has a default, so partial JSON objects deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameConfig {
    /// Master switch; a disabled configuration is inert.
    pub enabled: bool,
    /// Frame overlay drawn above everything.
    pub frame_image: Option<String>,
    /// Optional luminance/alpha mask; a circle is synthesized when absent.
    pub mask_image: Option<String>,
    /// Base image scale relative to the output size.
    pub base_scale: f32,
    /// Horizontal base offset.
    pub base_offset_x: f32,
    /// Vertical base offset.
    pub base_offset_y: f32,
    /// Circular mask radius as a fraction of half the output size.
    pub mask_radius: f32,
    /// Mask image scale relative to the output size.
    pub mask_scale: f32,
    /// Horizontal mask offset.
    pub mask_offset_x: f32,
    /// Vertical mask offset.
    pub mask_offset_y: f32,
    /// Frame image scale relative to the output size.
    pub frame_scale: f32,
    /// Horizontal frame offset.
    pub frame_offset_x: f32,
    /// Vertical frame offset.
    pub frame_offset_y: f32,
    /// Fill the masked region behind the base image.
    pub background_enabled: bool,
    /// Fill color used when `background_enabled`.
    pub background_color: Rgb,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frame_image: None,
            mask_image: None,
            base_scale: 1.0,
            base_offset_x: 0.0,
            base_offset_y: 0.0,
            mask_radius: 1.0,
            mask_scale: 1.0,
            mask_offset_x: 0.0,
            mask_offset_y: 0.0,
            frame_scale: 1.0,
            frame_offset_x: 0.0,
            frame_offset_y: 0.0,
            background_enabled: false,
            background_color: Rgb::new(0, 0, 0),
        }
    }
}

impl FrameConfig {
    /// Enabled configuration pointing at `frame_image`.
    pub fn enabled_with(frame_image: impl Into<String>) -> Self {
        Self {
            enabled: true,
            frame_image: Some(frame_image.into()),
            ..Self::default()
        }
    }

    /// Frame image path when set and non-blank.
    pub fn frame_image_path(&self) -> Option<&str> {
        non_blank(self.frame_image.as_deref())
    }

    /// Mask image path when set and non-blank.
    pub fn mask_image_path(&self) -> Option<&str> {
        non_blank(self.mask_image.as_deref())
    }

    /// `true` when enabled and a frame image is set; anything else is inert.
    pub fn is_active(&self) -> bool {
        self.enabled && self.frame_image_path().is_some()
    }

    /// Check that every scale and offset is finite and within drawable bounds.
    pub fn validate(&self) -> FrameResult<()> {
        for (name, v) in [
            ("baseScale", self.base_scale),
            ("maskScale", self.mask_scale),
            ("frameScale", self.frame_scale),
        ] {
            if !(v.is_finite() && v > 0.0 && v <= MAX_SCALE) {
                return Err(FrameError::config_invalid(format!(
                    "{name} must be in (0, {MAX_SCALE}], got {v}"
                )));
            }
        }
        if !(self.mask_radius.is_finite() && (0.0..=MAX_SCALE).contains(&self.mask_radius)) {
            return Err(FrameError::config_invalid(format!(
                "maskRadius must be in [0, {MAX_SCALE}], got {}",
                self.mask_radius
            )));
        }
        for (name, v) in [
            ("baseOffsetX", self.base_offset_x),
            ("baseOffsetY", self.base_offset_y),
            ("maskOffsetX", self.mask_offset_x),
            ("maskOffsetY", self.mask_offset_y),
            ("frameOffsetX", self.frame_offset_x),
            ("frameOffsetY", self.frame_offset_y),
        ] {
            if !(v.is_finite() && v.abs() <= MAX_OFFSET) {
                return Err(FrameError::config_invalid(format!(
                    "{name} must be within +/-{MAX_OFFSET}, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Largest accepted scale or mask radius.
pub const MAX_SCALE: f32 = 8.0;
/// Largest accepted offset magnitude, as a fraction of the output size.
pub const MAX_OFFSET: f32 = 4.0;

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Frame bookkeeping attached to an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameState {
    /// Last known pre-frame base image; source of truth for regeneration.
    pub original_image: Option<String>,
    /// Key of the artifact currently displayed, if any.
    pub current_cache_key: Option<String>,
    /// Pre-staged artifact for prototypes.
    pub cached_artifact_path: Option<String>,
}

impl FrameState {
    /// `true` when no frame bookkeeping is recorded.
    pub fn is_empty(&self) -> bool {
        self.original_image.is_none()
            && self.current_cache_key.is_none()
            && self.cached_artifact_path.is_none()
    }
}

/// Host entity as seen by the frame core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Entity id.
    pub id: EntityId,
    /// Instance or prototype.
    #[serde(default)]
    pub role: Role,
    /// Displayed image path.
    #[serde(default)]
    pub image: Option<String>,
    /// Frame configuration, if one was ever saved.
    #[serde(default)]
    pub config: Option<FrameConfig>,
    /// Frame bookkeeping.
    #[serde(default)]
    pub frame: FrameState,
    /// Every other attribute, untouched by the frame core.
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    /// New entity with no configuration.
    pub fn new(id: impl Into<EntityId>, role: Role, image: Option<String>) -> Self {
        Self {
            id: id.into(),
            role,
            image,
            config: None,
            frame: FrameState::default(),
            extra: Map::new(),
        }
    }

    /// Builder-style configuration setter.
    pub fn with_config(mut self, config: FrameConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Active configuration, if any.
    pub fn active_config(&self) -> Option<&FrameConfig> {
        self.config.as_ref().filter(|c| c.is_active())
    }

    /// Apply a committed patch to this entity.
    pub fn apply(&mut self, patch: &EntityPatch) -> FrameResult<()> {
        let config = effective_config(self.config.as_ref(), patch.config.as_ref())?;
        if let Some(image) = &patch.image {
            self.image = Some(image.clone());
        }
        self.config = config;
        patch.original_image.apply_to(&mut self.frame.original_image);
        patch
            .current_cache_key
            .apply_to(&mut self.frame.current_cache_key);
        patch
            .cached_artifact_path
            .apply_to(&mut self.frame.cached_artifact_path);
        for (k, v) in &patch.extra {
            self.extra.insert(k.clone(), v.clone());
        }
        Ok(())
    }
}

/// Tri-state change to an optional attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Change<T> {
    /// Leave the attribute as-is.
    #[default]
    Keep,
    /// Set the attribute.
    Set(T),
    /// Remove the attribute.
    Clear,
}

impl<T: Clone> Change<T> {
    /// Apply to a stored optional value.
    pub fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(v) => *slot = Some(v.clone()),
            Self::Clear => *slot = None,
        }
    }

    /// `true` unless this is [`Change::Keep`].
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Keep)
    }
}

/// Change to the frame configuration carried by an update.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigChange {
    /// Merge individual camelCase fields into the existing configuration.
    Merge(Map<String, Value>),
    /// Replace the whole configuration.
    Replace(FrameConfig),
    /// Remove the configuration entirely.
    Clear,
}

/// Proposed partial update to an entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityPatch {
    /// New displayed image.
    pub image: Option<String>,
    /// Configuration change.
    pub config: Option<ConfigChange>,
    /// Change to `originalImage`.
    pub original_image: Change<String>,
    /// Change to `currentCacheKey`.
    pub current_cache_key: Change<String>,
    /// Change to `cachedArtifactPath`.
    pub cached_artifact_path: Change<String>,
    /// Unrelated attributes, carried through untouched.
    pub extra: Map<String, Value>,
}

impl EntityPatch {
    /// Patch that only sets the displayed image.
    pub fn image(path: impl Into<String>) -> Self {
        Self {
            image: Some(path.into()),
            ..Self::default()
        }
    }

    /// Patch that only changes configuration.
    pub fn config(change: ConfigChange) -> Self {
        Self {
            config: Some(change),
            ..Self::default()
        }
    }

    /// Builder: set the configuration change.
    pub fn with_config(mut self, change: ConfigChange) -> Self {
        self.config = Some(change);
        self
    }

    /// Builder: add an unrelated attribute.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Patch resetting the entity to `original` and dropping all frame state and configuration.
    pub fn restore_to(original: impl Into<String>) -> Self {
        Self {
            image: Some(original.into()),
            config: Some(ConfigChange::Clear),
            original_image: Change::Clear,
            current_cache_key: Change::Clear,
            cached_artifact_path: Change::Clear,
            extra: Map::new(),
        }
    }

    /// `true` when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.config.is_none()
            && !self.original_image.is_change()
            && !self.current_cache_key.is_change()
            && !self.cached_artifact_path.is_change()
            && self.extra.is_empty()
    }
}

/// Configuration an entity would have after `change` is applied.
pub fn effective_config(
    current: Option<&FrameConfig>,
    change: Option<&ConfigChange>,
) -> FrameResult<Option<FrameConfig>> {
    match change {
        None => Ok(current.cloned()),
        Some(ConfigChange::Clear) => Ok(None),
        Some(ConfigChange::Replace(cfg)) => Ok(Some(cfg.clone())),
        Some(ConfigChange::Merge(fields)) => {
            let base = current.cloned().unwrap_or_default();
            let mut value = serde_json::to_value(base)
                .map_err(|e| FrameError::validation(format!("serialize frame config: {e}")))?;
            let Value::Object(obj) = &mut value else {
                return Err(FrameError::validation("frame config is not an object"));
            };
            for (k, v) in fields {
                obj.insert(k.clone(), v.clone());
            }
            serde_json::from_value(value)
                .map(Some)
                .map_err(|e| FrameError::validation(format!("merge frame config: {e}")))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
