//! Access to the host's voxel world.
//!
//! The simulation never owns the world's storage. It reads and writes voxels
//! through [`VoxelGrid`], which the host implements over its chunk storage.
//! [`crate::grid::ChunkedGrid`] is the in-process implementation used by the
//! demo, the FFI layer and the tests.

use std::fmt;

use crate::core_types::block::{BlockType, FireFaces, Voxel};
use crate::core_types::position::{BlockPos, Direction};
use crate::grid::ChunkPos;

/// Errors returned by voxel grid access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The chunk holding the voxel isn't resident
    ChunkNotLoaded { chunk: ChunkPos },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::ChunkNotLoaded { chunk } => {
                write!(f, "Unloaded chunk at {}, {}, {}", chunk.x, chunk.y, chunk.z)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Read/write access to voxels.
///
/// Only [`VoxelGrid::voxel`] and [`VoxelGrid::set_voxel`] are required; the
/// rest are derived from them.
pub trait VoxelGrid {
    /// Read the voxel at `pos`.
    ///
    /// # Errors
    /// Returns [`GridError::ChunkNotLoaded`] when the voxel's chunk isn't resident.
    fn voxel(&self, pos: BlockPos) -> Result<Voxel, GridError>;

    /// Overwrite the voxel at `pos`.
    ///
    /// # Errors
    /// Returns [`GridError::ChunkNotLoaded`] when the voxel's chunk isn't resident.
    fn set_voxel(&mut self, pos: BlockPos, voxel: Voxel) -> Result<(), GridError>;

    /// Block type at `pos`.
    ///
    /// # Errors
    /// Returns [`GridError::ChunkNotLoaded`] when the voxel's chunk isn't resident.
    fn block_type(&self, pos: BlockPos) -> Result<BlockType, GridError> {
        self.voxel(pos).map(|voxel| voxel.block)
    }

    /// Set the block at `pos` together with its fire faces.
    ///
    /// # Errors
    /// Returns [`GridError::ChunkNotLoaded`] when the voxel's chunk isn't resident.
    fn set_block_type(
        &mut self,
        pos: BlockPos,
        block: BlockType,
        faces: FireFaces,
    ) -> Result<(), GridError> {
        self.set_voxel(pos, Voxel { block, faces })
    }

    /// Whether the block at `pos` fully covers its `face`.
    ///
    /// # Errors
    /// Returns [`GridError::ChunkNotLoaded`] when the voxel's chunk isn't resident.
    fn has_full_face(&self, pos: BlockPos, face: Direction) -> Result<bool, GridError> {
        self.block_type(pos).map(|block| block.is_face_full(face))
    }

    /// Block type at `pos`, reading unloaded voxels as air.
    ///
    /// Fire rules use this: nothing burns, spreads into, or supports fire
    /// from a chunk that isn't resident.
    fn block_or_air(&self, pos: BlockPos) -> BlockType {
        self.block_type(pos).unwrap_or(BlockType::Air)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_not_loaded_message() {
        let err = GridError::ChunkNotLoaded {
            chunk: ChunkPos::new(1, -2, 3),
        };
        assert_eq!(err.to_string(), "Unloaded chunk at 1, -2, 3");
    }
}
