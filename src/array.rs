//! Contiguous storage for packed vertex blocks.
//!
//! [`VertexArray`] owns one byte pool holding `len * block_size` bytes plus
//! a parallel [`VertexInfo`] vec indexed identically. The accessor views in
//! [`crate::vertex`] borrow individual blocks from it by index; the array
//! itself is the only type in the crate that allocates.

use crate::format::VertexFormat;
use crate::info::VertexInfo;
use crate::vertex::{VertexView, VertexViewMut};

/// Errors raised when adopting externally produced vertex data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexArrayError {
    /// The raw data length is not a whole number of blocks.
    DataSizeMismatch {
        /// Block size implied by the format, in bytes.
        block_size: usize,
        /// Actual data length, in bytes.
        actual: usize,
    },
    /// The info count disagrees with the vertex count implied by the data.
    InfoCountMismatch {
        /// Vertex count implied by the data length.
        vertices: usize,
        /// Number of supplied infos.
        infos: usize,
    },
}

impl std::fmt::Display for VertexArrayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataSizeMismatch { block_size, actual } => {
                write!(
                    f,
                    "vertex data length {actual} is not a multiple of block size {block_size}"
                )
            }
            Self::InfoCountMismatch { vertices, infos } => {
                write!(f, "{infos} vertex infos supplied for {vertices} vertices")
            }
        }
    }
}

impl std::error::Error for VertexArrayError {}

/// A pool of packed vertex blocks sharing one [`VertexFormat`].
///
/// Blocks are stored contiguously, so [`vertex_bytes`](Self::vertex_bytes)
/// is directly uploadable: the GPU layer describes the layout with the
/// offset formulas in [`crate::format`] and the stride
/// [`VertexFormat::block_size`].
#[derive(Clone)]
pub struct VertexArray {
    format: VertexFormat,
    data: Vec<u8>,
    infos: Vec<VertexInfo>,
}

impl VertexArray {
    /// Create an empty array for blocks of the given format.
    pub fn new(format: VertexFormat) -> Self {
        Self {
            format,
            data: Vec::new(),
            infos: Vec::new(),
        }
    }

    /// Create an empty array with room for `capacity` vertices.
    pub fn with_capacity(format: VertexFormat, capacity: usize) -> Self {
        Self {
            format,
            data: Vec::with_capacity(capacity * format.block_size()),
            infos: Vec::with_capacity(capacity),
        }
    }

    /// Adopt raw vertex bytes and their parallel infos.
    ///
    /// `data` must hold a whole number of blocks and `infos` must have one
    /// entry per block.
    pub fn from_raw_parts(
        format: VertexFormat,
        data: Vec<u8>,
        infos: Vec<VertexInfo>,
    ) -> Result<Self, VertexArrayError> {
        let block_size = format.block_size();
        if data.len() % block_size != 0 {
            return Err(VertexArrayError::DataSizeMismatch {
                block_size,
                actual: data.len(),
            });
        }
        let vertices = data.len() / block_size;
        if infos.len() != vertices {
            return Err(VertexArrayError::InfoCountMismatch {
                vertices,
                infos: infos.len(),
            });
        }
        Ok(Self {
            format,
            data,
            infos,
        })
    }

    /// Adopt raw vertex bytes produced by an importer, assigning each block
    /// a sequential original index and no flags.
    pub fn from_vertex_data(format: VertexFormat, data: Vec<u8>) -> Result<Self, VertexArrayError> {
        let block_size = format.block_size();
        if data.len() % block_size != 0 {
            return Err(VertexArrayError::DataSizeMismatch {
                block_size,
                actual: data.len(),
            });
        }
        let vertices = data.len() / block_size;
        if vertices == 0 {
            log::warn!("adopted empty vertex data for format {format:?}");
        }
        let infos = (0..vertices as u32)
            .map(|i| VertexInfo::new(i, false))
            .collect();
        Ok(Self {
            format,
            data,
            infos,
        })
    }

    /// The shared format of every block in this array.
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether the array holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Append one zero-initialized block with its info; returns the new
    /// vertex's index.
    pub fn push(&mut self, info: VertexInfo) -> usize {
        let index = self.infos.len();
        self.data.resize(self.data.len() + self.format.block_size(), 0);
        self.infos.push(info);
        index
    }

    /// Read-only view over vertex `index`.
    pub fn vertex(&self, index: usize) -> VertexView<'_> {
        let range = self.block_range(index);
        VertexView::new(&self.data[range], self.format)
    }

    /// Mutable view over vertex `index`.
    pub fn vertex_mut(&mut self, index: usize) -> VertexViewMut<'_> {
        let range = self.block_range(index);
        VertexViewMut::new(&mut self.data[range], self.format)
    }

    /// Bookkeeping for vertex `index`.
    pub fn info(&self, index: usize) -> &VertexInfo {
        &self.infos[index]
    }

    /// Mutable bookkeeping for vertex `index`.
    pub fn info_mut(&mut self, index: usize) -> &mut VertexInfo {
        &mut self.infos[index]
    }

    /// All packed vertex bytes, ready for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.data
    }

    fn block_range(&self, index: usize) -> std::ops::Range<usize> {
        let size = self.format.block_size();
        let start = index * size;
        start..start + size
    }
}

impl std::fmt::Debug for VertexArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexArray")
            .field("format", &self.format)
            .field("len", &self.infos.len())
            .finish()
    }
}
