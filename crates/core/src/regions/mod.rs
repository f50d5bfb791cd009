//! Burnable regions and the tracker that turns them into stage progress

pub mod region;
pub mod source;
pub mod tracker;

pub use region::{BurnableRegion, RegionState, RegionUpdate};
pub use source::{RegionDefinition, RegionSource};
pub use tracker::{BurnableRegionTracker, RegionSet, RegionSummary, ScanReport};
