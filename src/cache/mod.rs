/// Artifact writes and cache busting.
pub mod artifacts;
/// Cache key derivation.
pub mod key;
/// Recognition of artifact paths.
pub mod namespace;
