//! Core types: positions, blocks and flammability

pub mod block;
pub mod flammability;
pub mod position;

// Re-export main types
pub use block::{BlockType, FireFaces, Voxel};
pub use flammability::{FlammabilityEntry, FlammabilityTable};
pub use position::{
    face_neighbors, rotated_neighbors, BlockBox, BlockBoxIter, BlockPos, Direction,
    NEIGHBOR_OFFSETS,
};
