//! # Vertex Core
//!
//! Packed, variable-layout vertex storage for the rendering pipeline.
//!
//! A vertex's render attributes live in one contiguous raw block whose shape
//! (how many UV channels, how many color channels) is decided when the vertex
//! format is created, not at compile time:
//!
//! - [`VertexFormat`] - layout descriptor and the authoritative offset math
//! - [`VertexInfo`] - per-vertex bookkeeping kept outside the packed block
//! - [`VertexView`] / [`VertexViewMut`] - non-owning typed accessors over a block
//! - [`VertexArray`] - contiguous block pool with parallel [`VertexInfo`] storage
//!
//! The view types never allocate or free the underlying storage; they are
//! format-aware accessors over externally owned memory. Mesh building hands
//! the raw bytes to the GPU upload layer via [`VertexArray::vertex_bytes`],
//! using the offsets in [`format`] to describe the layout to the graphics API.

pub mod array;
pub mod format;
pub mod info;
pub mod math;
pub mod vertex;

pub use array::{VertexArray, VertexArrayError};
pub use format::{VertexFormat, MAX_CHANNELS};
pub use info::{VertexFlags, VertexInfo, SIMULATION_INDEX_NONE};
pub use vertex::{VertexView, VertexViewMut};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version. Call once at startup.
pub fn init() {
    log::info!("vertex-core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
