//! In-memory chunked voxel storage.
//!
//! The world is split into 16×16×16 chunks that are loaded and unloaded
//! independently, so region scans see the same partial residency a live
//! server does.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core_types::block::Voxel;
use crate::core_types::position::{BlockBox, BlockPos};
use crate::grid::{GridError, VoxelGrid};

/// Edge length of a chunk in voxels
pub const CHUNK_SIZE: i32 = 16;

const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Chunk coordinate (voxel coordinate divided by [`CHUNK_SIZE`], rounded down)
pub type ChunkPos = BlockPos;

/// Chunk containing `pos`
pub fn chunk_of(pos: BlockPos) -> ChunkPos {
    pos.map(|c| c.div_euclid(CHUNK_SIZE))
}

fn local_index(pos: BlockPos) -> usize {
    let local = pos.map(|c| c.rem_euclid(CHUNK_SIZE) as usize);
    let size = CHUNK_SIZE as usize;
    (local.y * size + local.z) * size + local.x
}

/// One resident chunk
#[derive(Debug, Clone)]
struct Chunk {
    voxels: Vec<Voxel>,
}

impl Chunk {
    fn empty() -> Self {
        Chunk {
            voxels: vec![Voxel::AIR; CHUNK_VOLUME],
        }
    }
}

/// Voxel world made of independently loaded chunks
#[derive(Debug, Clone, Default)]
pub struct ChunkedGrid {
    chunks: FxHashMap<ChunkPos, Chunk>,
}

impl ChunkedGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a chunk resident, filled with air. Already loaded chunks keep their contents.
    pub fn load_chunk(&mut self, chunk: ChunkPos) {
        self.chunks.entry(chunk).or_insert_with(|| {
            debug!(x = chunk.x, y = chunk.y, z = chunk.z, "Loaded chunk");
            Chunk::empty()
        });
    }

    /// Drop a chunk and everything in it. Returns whether it was loaded.
    pub fn unload_chunk(&mut self, chunk: ChunkPos) -> bool {
        let removed = self.chunks.remove(&chunk).is_some();
        if removed {
            debug!(x = chunk.x, y = chunk.y, z = chunk.z, "Unloaded chunk");
        }
        removed
    }

    pub fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
        self.chunks.contains_key(&chunk)
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Load every chunk the box touches
    pub fn load_box(&mut self, bounds: &BlockBox) {
        let low = chunk_of(bounds.minimum());
        let high = chunk_of(bounds.maximum());
        for chunk in BlockBox::new(low, high) {
            self.load_chunk(chunk);
        }
    }

    /// Set every voxel in the box.
    ///
    /// # Errors
    /// Returns [`GridError::ChunkNotLoaded`] before writing anything if part
    /// of the box isn't resident.
    pub fn fill_box(&mut self, bounds: &BlockBox, voxel: impl Into<Voxel>) -> Result<(), GridError> {
        let low = chunk_of(bounds.minimum());
        let high = chunk_of(bounds.maximum());
        if let Some(chunk) = BlockBox::new(low, high)
            .iter()
            .find(|chunk| !self.is_chunk_loaded(*chunk))
        {
            return Err(GridError::ChunkNotLoaded { chunk });
        }

        let voxel = voxel.into();
        for pos in bounds {
            self.set_voxel(pos, voxel)?;
        }
        Ok(())
    }
}

impl VoxelGrid for ChunkedGrid {
    fn voxel(&self, pos: BlockPos) -> Result<Voxel, GridError> {
        let chunk = chunk_of(pos);
        self.chunks
            .get(&chunk)
            .map(|c| c.voxels[local_index(pos)])
            .ok_or(GridError::ChunkNotLoaded { chunk })
    }

    fn set_voxel(&mut self, pos: BlockPos, voxel: Voxel) -> Result<(), GridError> {
        let chunk = chunk_of(pos);
        let c = self
            .chunks
            .get_mut(&chunk)
            .ok_or(GridError::ChunkNotLoaded { chunk })?;
        c.voxels[local_index(pos)] = voxel;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::block::BlockType;

    #[test]
    fn test_chunk_of_negative_coordinates() {
        assert_eq!(chunk_of(BlockPos::new(0, 0, 0)), ChunkPos::new(0, 0, 0));
        assert_eq!(chunk_of(BlockPos::new(15, 16, -1)), ChunkPos::new(0, 1, -1));
        assert_eq!(chunk_of(BlockPos::new(-16, -17, 31)), ChunkPos::new(-1, -2, 1));
    }

    #[test]
    fn test_local_index_unique_within_chunk() {
        let bounds = BlockBox::new(BlockPos::new(-16, -16, -16), BlockPos::new(-1, -1, -1));
        let mut seen = vec![false; CHUNK_VOLUME];
        for pos in bounds {
            let idx = local_index(pos);
            assert!(!seen[idx]);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_unloaded_access_fails() {
        let mut grid = ChunkedGrid::new();
        let pos = BlockPos::new(3, 4, 5);
        assert_eq!(
            grid.voxel(pos),
            Err(GridError::ChunkNotLoaded {
                chunk: ChunkPos::zeros()
            })
        );
        assert!(grid.set_voxel(pos, Voxel::new(BlockType::Stone)).is_err());
        assert_eq!(grid.block_or_air(pos), BlockType::Air);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = ChunkedGrid::new();
        grid.load_chunk(ChunkPos::new(-1, 0, 0));
        let pos = BlockPos::new(-5, 2, 7);
        grid.set_voxel(pos, Voxel::new(BlockType::OakLog)).unwrap();
        assert_eq!(grid.block_type(pos), Ok(BlockType::OakLog));
        assert_eq!(grid.block_type(pos + BlockPos::new(1, 0, 0)), Ok(BlockType::Air));
    }

    #[test]
    fn test_load_keeps_contents_and_unload_drops_them() {
        let mut grid = ChunkedGrid::new();
        let pos = BlockPos::new(1, 1, 1);
        grid.load_chunk(chunk_of(pos));
        grid.set_voxel(pos, Voxel::new(BlockType::Wool)).unwrap();
        grid.load_chunk(chunk_of(pos));
        assert_eq!(grid.block_type(pos), Ok(BlockType::Wool));

        assert!(grid.unload_chunk(chunk_of(pos)));
        assert!(!grid.unload_chunk(chunk_of(pos)));
        assert!(grid.voxel(pos).is_err());
    }

    #[test]
    fn test_fill_box_requires_every_chunk() {
        let mut grid = ChunkedGrid::new();
        let bounds = BlockBox::new(BlockPos::new(10, 0, 0), BlockPos::new(20, 2, 2));
        grid.load_chunk(ChunkPos::zeros());
        let err = grid.fill_box(&bounds, BlockType::Stone).unwrap_err();
        assert_eq!(
            err,
            GridError::ChunkNotLoaded {
                chunk: ChunkPos::new(1, 0, 0)
            }
        );
        // Nothing was written to the loaded half
        assert_eq!(grid.block_type(BlockPos::new(10, 0, 0)), Ok(BlockType::Air));

        grid.load_box(&bounds);
        assert_eq!(grid.loaded_chunk_count(), 2);
        grid.fill_box(&bounds, BlockType::Stone).unwrap();
        assert_eq!(grid.block_type(BlockPos::new(20, 2, 2)), Ok(BlockType::Stone));
    }
}
