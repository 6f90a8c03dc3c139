/// Entities, frame configuration, and update patches.
pub mod model;
/// Process-wide settings.
pub mod settings;
