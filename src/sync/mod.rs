/// Batch regeneration and the maintenance entry point.
pub mod batch;
/// Per-entity update interception.
pub mod controller;
/// Staleness classification of proposed updates.
pub mod detector;
/// Host application seams.
pub mod host;
/// Apply, restore, template, and preview operations.
pub mod service;
