/// Convenience result type used across tokenframe.
pub type FrameResult<T> = Result<T, FrameError>;

/// Top-level error taxonomy used by compositing, storage, and update APIs.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// A base, frame, or mask image could not be read or decoded.
    #[error("asset load error: '{path}': {reason}")]
    AssetLoad {
        /// Path of the asset that failed to load.
        path: String,
        /// Underlying read/decode failure.
        reason: String,
    },

    /// An artifact could not be written to the artifact store.
    #[error("store write error: {0}")]
    StoreWrite(String),

    /// The frame configuration is disabled or has no frame image.
    #[error("invalid frame configuration: {0}")]
    ConfigInvalid(String),

    /// Invalid user-provided settings, patches, or JSON.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown entity or failed commit in the host entity store.
    #[error("entity error: {0}")]
    Entity(String),

    /// A privileged operation was requested by a non-privileged actor.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameError {
    /// Build a [`FrameError::AssetLoad`] value.
    pub fn asset_load(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`FrameError::StoreWrite`] value.
    pub fn store_write(msg: impl Into<String>) -> Self {
        Self::StoreWrite(msg.into())
    }

    /// Build a [`FrameError::ConfigInvalid`] value.
    pub fn config_invalid(msg: impl Into<String>) -> Self {
        Self::ConfigInvalid(msg.into())
    }

    /// Build a [`FrameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameError::Entity`] value.
    pub fn entity(msg: impl Into<String>) -> Self {
        Self::Entity(msg.into())
    }

    /// Build a [`FrameError::PermissionDenied`] value.
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
