//! A named box of voxels whose flammable blocks are counted to measure burn progress.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core_types::flammability::FlammabilityTable;
use crate::core_types::position::BlockBox;
use crate::grid::{GridError, VoxelGrid};

/// Whether a region has been counted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegionState {
    /// No scan has completed; part of the region may not be loaded yet
    Pending,
    /// Baseline captured by the first complete scan
    Baselined {
        /// Flammable blocks when the baseline was taken; never changes afterwards
        total: u32,
        /// Flammable blocks seen by the latest scan, `0..=total`
        current: u32,
    },
}

/// Outcome of one [`BurnableRegion::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionUpdate {
    /// First complete scan; the baseline is now fixed
    Baselined { total: u32 },
    /// The current count was refreshed
    Updated { current: u32 },
    /// A chunk wasn't loaded, nothing changed; retried next interval
    Deferred(GridError),
}

/// Named box tracked for burn progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnableRegion {
    name: String,
    bounds: BlockBox,
    state: RegionState,
}

impl BurnableRegion {
    /// New region with no baseline
    pub fn new(name: impl Into<String>, bounds: BlockBox) -> Self {
        Self {
            name: name.into(),
            bounds,
            state: RegionState::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> BlockBox {
        self.bounds
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    /// Count flammable voxels inside the box.
    ///
    /// # Errors
    /// Fails with [`GridError::ChunkNotLoaded`] as soon as a voxel of the
    /// region isn't resident.
    pub fn count_flammable_blocks<G: VoxelGrid + ?Sized>(
        &self,
        grid: &G,
        table: &FlammabilityTable,
    ) -> Result<u32, GridError> {
        let mut count = 0u32;
        for pos in &self.bounds {
            if table.is_flammable(grid.block_type(pos)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// State this region would move to if it were baselined now.
    ///
    /// Returns `None` while any part of the region is unloaded. An already
    /// baselined region keeps its total.
    pub fn try_baseline<G: VoxelGrid + ?Sized>(
        &self,
        grid: &G,
        table: &FlammabilityTable,
    ) -> Option<RegionState> {
        let observed = self.count_flammable_blocks(grid, table).ok()?;
        Some(self.state_after(observed))
    }

    /// Rescan the region.
    ///
    /// The first complete scan fixes the total. Later scans can only lower
    /// the current count, so the burn proportion never goes backwards until
    /// the region set is reloaded.
    pub fn update<G: VoxelGrid + ?Sized>(
        &mut self,
        grid: &G,
        table: &FlammabilityTable,
    ) -> RegionUpdate {
        let observed = match self.count_flammable_blocks(grid, table) {
            Ok(observed) => observed,
            Err(err) => return RegionUpdate::Deferred(err),
        };

        let was_pending = self.state == RegionState::Pending;
        self.state = self.state_after(observed);
        match self.state {
            RegionState::Baselined { total, .. } if was_pending => {
                info!(region = %self.name, total, "Region baselined");
                RegionUpdate::Baselined { total }
            }
            _ => RegionUpdate::Updated {
                current: self.current_flammable_blocks(),
            },
        }
    }

    fn state_after(&self, observed: u32) -> RegionState {
        let (total, current) = match self.state {
            RegionState::Pending => (observed, observed),
            RegionState::Baselined { total, current } => (total, current.min(observed)),
        };
        RegionState::Baselined {
            total,
            current: current.min(total),
        }
    }

    /// Baseline flammable count, `None` until the first complete scan
    pub fn total_flammable_blocks(&self) -> Option<u32> {
        match self.state {
            RegionState::Pending => None,
            RegionState::Baselined { total, .. } => Some(total),
        }
    }

    /// Flammable blocks left, `0` while pending
    pub fn current_flammable_blocks(&self) -> u32 {
        match self.state {
            RegionState::Pending => 0,
            RegionState::Baselined { current, .. } => current,
        }
    }

    /// Fraction of the baseline that has burned, in `[0, 1]`.
    ///
    /// `0.0` while the total is unknown, `1.0` for a region that never had
    /// anything to burn.
    pub fn proportion_burned(&self) -> f64 {
        match self.state {
            RegionState::Pending => 0.0,
            RegionState::Baselined { total: 0, .. } => 1.0,
            RegionState::Baselined { total, current } => {
                1.0 - f64::from(current) / f64::from(total)
            }
        }
    }
}
