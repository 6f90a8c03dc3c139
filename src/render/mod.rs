/// Layer placement, masking, and encoding.
pub mod compositor;
/// Compositor plus artifact writer.
pub mod pipeline;
pub(crate) mod surface;
