//! Vertex format descriptor and the packed block layout contract.
//!
//! Every vertex owns one contiguous raw block laid out as:
//!
//! ```text
//! offset 0   position  [f32; 3]
//! offset 12  normal    [f32; 3]
//! offset 24  tangent   [f32; 4]
//! offset 40  uv[0..N]  [f32; 2] each   (N = uv_count)
//! then       color[0..M]  [u8; 4] each (M = color_count)
//! ```
//!
//! The offset functions below are the authoritative layout definition: the
//! GPU upload layer describes this exact byte layout to the graphics API
//! without re-deriving it, and [`VertexView`](crate::VertexView) computes
//! its accessor offsets from the same formulas.

/// Maximum number of UV or color channels a format can carry.
pub const MAX_CHANNELS: u8 = 8;

/// Byte offset of the position field within a block.
pub const POSITION_OFFSET: usize = 0;

/// Byte offset of the normal field within a block.
pub const NORMAL_OFFSET: usize = 12;

/// Byte offset of the tangent field within a block.
pub const TANGENT_OFFSET: usize = 24;

/// Size in bytes of the fixed header (position + normal + tangent).
pub const HEADER_SIZE: usize = 40;

/// Size in bytes of one UV slot (`[f32; 2]`).
pub const UV_SLOT_SIZE: usize = 8;

/// Size in bytes of one packed color slot (`[u8; 4]`).
pub const COLOR_SLOT_SIZE: usize = 4;

/// Describes the shape of a packed vertex block: how many UV channels and
/// how many color channels follow the fixed header.
///
/// Created once per distinct layout (typically one per mesh/material
/// combination) and copied freely afterwards. Two formats compare equal iff
/// both channel counts match; format equality is the compatibility check
/// for cross-vertex operations such as
/// [`VertexView::close_to`](crate::VertexView::close_to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexFormat {
    /// Number of UV channels (0..=[`MAX_CHANNELS`]).
    pub uv_count: u8,
    /// Number of color channels (0..=[`MAX_CHANNELS`]).
    pub color_count: u8,
}

impl VertexFormat {
    /// Create a format with the given channel counts.
    pub fn new(uv_count: u8, color_count: u8) -> Self {
        debug_assert!(uv_count <= MAX_CHANNELS);
        debug_assert!(color_count <= MAX_CHANNELS);
        Self {
            uv_count,
            color_count,
        }
    }

    /// Byte offset of UV slot `index` within a block of this format.
    ///
    /// `index` must be below `uv_count`; no bounds check is performed here.
    pub const fn uv_offset(&self, index: usize) -> usize {
        HEADER_SIZE + UV_SLOT_SIZE * index
    }

    /// Byte offset of color slot `index` within a block of this format.
    ///
    /// `index` must be below `color_count`; no bounds check is performed here.
    pub const fn color_offset(&self, index: usize) -> usize {
        HEADER_SIZE + UV_SLOT_SIZE * self.uv_count as usize + COLOR_SLOT_SIZE * index
    }

    /// Total size in bytes of one vertex block of this format.
    pub const fn block_size(&self) -> usize {
        HEADER_SIZE
            + UV_SLOT_SIZE * self.uv_count as usize
            + COLOR_SLOT_SIZE * self.color_count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(VertexFormat::new(2, 1), VertexFormat::new(2, 1));
        assert_ne!(VertexFormat::new(2, 1), VertexFormat::new(1, 2));
        assert_ne!(VertexFormat::new(0, 0), VertexFormat::new(0, 1));
    }

    #[test]
    fn test_header_offsets() {
        assert_eq!(POSITION_OFFSET, 0);
        assert_eq!(NORMAL_OFFSET, 12);
        assert_eq!(TANGENT_OFFSET, 24);
        assert_eq!(HEADER_SIZE, 40);
    }

    #[test]
    fn test_slot_offsets() {
        let f = VertexFormat::new(2, 1);
        assert_eq!(f.uv_offset(0), 40);
        assert_eq!(f.uv_offset(1), 48);
        assert_eq!(f.color_offset(0), 56);
        assert_eq!(f.block_size(), 60);
    }

    #[test]
    fn test_block_size_header_only() {
        assert_eq!(VertexFormat::new(0, 0).block_size(), HEADER_SIZE);
    }

    #[test]
    fn test_block_size_max_channels() {
        let f = VertexFormat::new(MAX_CHANNELS, MAX_CHANNELS);
        assert_eq!(f.block_size(), 40 + 8 * 8 + 4 * 8);
    }
}
