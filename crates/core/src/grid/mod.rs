//! Voxel world access

pub mod chunked_grid;
pub mod voxel_grid;

// Re-export main types
pub use chunked_grid::*;
pub use voxel_grid::*;
