//! Per-vertex bookkeeping stored outside the packed attribute block.
//!
//! [`VertexInfo`] changes on a different schedule than the render attributes
//! (it is written during mesh building and physics setup, never during
//! per-frame transforms), so it lives in an array parallel to the packed
//! blocks instead of inside them.

use bitflags::bitflags;

bitflags! {
    /// Per-vertex flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexFlags: u8 {
        /// The vertex belongs to a flat-shaded face; its normal is not
        /// interpolated across the face.
        const FLAT = 1;
    }
}

/// Sentinel value for a vertex with no associated simulation vertex.
pub const SIMULATION_INDEX_NONE: i16 = -1;

/// Bookkeeping for one logical vertex.
///
/// One instance exists per emitted vertex, including each copy produced when
/// a shared vertex is split over differing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexInfo {
    original_index: u32,
    simulation_index: i16,
    flags: VertexFlags,
}

impl VertexInfo {
    /// Create info for a vertex emitted from source vertex `original_index`.
    pub fn new(original_index: u32, flat: bool) -> Self {
        Self {
            original_index,
            simulation_index: SIMULATION_INDEX_NONE,
            flags: if flat {
                VertexFlags::FLAT
            } else {
                VertexFlags::empty()
            },
        }
    }

    /// Index into the source mesh vertex array before any splitting.
    pub fn original_index(&self) -> u32 {
        self.original_index
    }

    /// Index into the external simulation (soft body) vertex array, or
    /// [`SIMULATION_INDEX_NONE`].
    pub fn simulation_index(&self) -> i16 {
        self.simulation_index
    }

    /// Set the simulation vertex index. The caller owns the index space;
    /// no validation is performed.
    pub fn set_simulation_index(&mut self, index: i16) {
        self.simulation_index = index;
    }

    /// Current flags.
    pub fn flags(&self) -> VertexFlags {
        self.flags
    }

    /// Replace the flags. This overwrites the whole set; to add one flag
    /// while keeping the others, read-modify-write:
    ///
    /// ```
    /// # use vertex_core::{VertexInfo, VertexFlags};
    /// # let mut info = VertexInfo::new(0, false);
    /// info.set_flags(info.flags() | VertexFlags::FLAT);
    /// ```
    pub fn set_flags(&mut self, flags: VertexFlags) {
        self.flags = flags;
    }
}
