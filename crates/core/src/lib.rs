//! Fire Spread Core Library
//!
//! Tick-driven fire propagation over a chunked voxel world, and burn progress
//! tracking for named regions of that world.
//!
//! ## Fire
//!
//! Every burning voxel carries a small [`FireCell`] record owned by the
//! [`FireEngine`]. Once per tick each cell may:
//! - burn out after its lifetime, or earlier when it floats without fuel
//! - re-attach to the faces of its neighbours
//! - spread to a nearby air voxel touching fuel
//! - turn neighbouring flammable blocks into fire
//!
//! Changes that add or remove cells are queued and applied at the start of
//! the next tick, so the tick loop never mutates the set it is walking.
//!
//! ## Regions
//!
//! A [`BurnableRegionTracker`] counts flammable blocks inside configured boxes
//! on a fixed cadence. The first complete count is the region's baseline; the
//! burn proportion is measured against it.
//!
//! ## Example
//!
//! ```
//! use fire_spread_core::{BlockBox, BlockPos, BlockType, ChunkedGrid, FireSimulation, SimulationConfig};
//!
//! let mut grid = ChunkedGrid::new();
//! let floor = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(7, 0, 7));
//! grid.load_box(&floor);
//! grid.fill_box(&floor, BlockType::OakPlanks)?;
//!
//! let mut sim = FireSimulation::new(grid, SimulationConfig::default());
//! assert!(sim.ignite(BlockPos::new(3, 1, 3)));
//! let stats = sim.tick();
//! assert_eq!(stats.world_age, 1);
//! # Ok::<(), fire_spread_core::GridError>(())
//! ```

pub mod config;
pub mod core_types;
pub mod fire;
pub mod grid;
pub mod regions;
pub mod simulation;

// Re-export main types
pub use config::{ConfigError, FireConfig, RegionConfig, SimulationConfig, TICKS_PER_SECOND};
pub use core_types::{
    BlockBox, BlockPos, BlockType, Direction, FireFaces, FlammabilityEntry, FlammabilityTable,
    Voxel,
};
pub use fire::{CommandQueue, FireCell, FireCommand, FireEngine, TickReport};
pub use grid::{ChunkPos, ChunkedGrid, GridError, VoxelGrid, CHUNK_SIZE};
pub use regions::{
    BurnableRegion, BurnableRegionTracker, RegionDefinition, RegionSource, RegionState,
    RegionSummary, ScanReport,
};
pub use simulation::{FireSimulation, SimulationStats};
