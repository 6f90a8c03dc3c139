/// Color parsing for configuration JSON.
pub mod color;
/// Image decoding and alpha premultiplication.
pub mod decode;
/// Reference-counted upload notification suppression.
pub mod notify;
/// Asset sources and artifact stores.
pub mod store;
