//! The active set of burnable regions and the aggregate burn state read by
//! the stage controller.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RegionConfig;
use crate::core_types::flammability::FlammabilityTable;
use crate::grid::VoxelGrid;
use crate::regions::region::{BurnableRegion, RegionUpdate};
use crate::regions::source::{RegionDefinition, RegionSource};

/// Ordered regions loaded under one configuration key
pub type RegionSet = Vec<BurnableRegion>;

/// Burn progress of one region, for a host scoreboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub proportion_burned: f64,
    pub total: Option<u32>,
    pub current: u32,
    /// Past the fully burned threshold
    pub burned: bool,
}

impl RegionSummary {
    /// Burn proportion as a whole percentage
    pub fn percent(&self) -> u32 {
        (self.proportion_burned * 100.0).round() as u32
    }
}

/// Counts from one scan of every region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub baselined: usize,
    pub updated: usize,
    pub deferred: usize,
}

/// Owns the active region set and rescans it on a fixed cadence
#[derive(Debug, Clone, Default)]
pub struct BurnableRegionTracker {
    key: Option<String>,
    regions: RegionSet,
    config: RegionConfig,
}

impl BurnableRegionTracker {
    pub fn new(config: RegionConfig) -> Self {
        Self {
            key: None,
            regions: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Configuration key of the active set
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn regions(&self) -> &[BurnableRegion] {
        &self.regions
    }

    pub fn region(&self, index: usize) -> Option<&BurnableRegion> {
        self.regions.get(index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Replace the active set with the regions under `key`.
    ///
    /// Statistics of the previous set are discarded. Returns the number of
    /// regions loaded.
    pub fn load_from(&mut self, source: &RegionSource, key: &str) -> usize {
        let definitions = source.definitions(key);
        self.replace(key, &definitions)
    }

    /// Replace the active set with explicit definitions
    pub fn replace(&mut self, key: &str, definitions: &[RegionDefinition]) -> usize {
        self.regions = definitions.iter().map(RegionDefinition::to_region).collect();
        self.key = Some(key.to_string());
        info!(key, regions = self.regions.len(), "Loaded region set");
        self.regions.len()
    }

    /// Rescan every region when `world_age` falls on the update interval.
    ///
    /// Returns the scan counts when a scan ran.
    pub fn on_tick<G: VoxelGrid + Sync + ?Sized>(
        &mut self,
        world_age: u64,
        grid: &G,
        table: &FlammabilityTable,
    ) -> Option<ScanReport> {
        let interval = u64::from(self.config.update_interval_ticks.max(1));
        (world_age % interval == 0).then(|| self.update_all(grid, table))
    }

    /// Rescan every region now. Regions are scanned in parallel; the grid is only read.
    pub fn update_all<G: VoxelGrid + Sync + ?Sized>(
        &mut self,
        grid: &G,
        table: &FlammabilityTable,
    ) -> ScanReport {
        let updates: Vec<RegionUpdate> = self
            .regions
            .par_iter_mut()
            .map(|region| region.update(grid, table))
            .collect();

        let mut report = ScanReport::default();
        for update in updates {
            match update {
                RegionUpdate::Baselined { .. } => report.baselined += 1,
                RegionUpdate::Updated { .. } => report.updated += 1,
                RegionUpdate::Deferred(err) => {
                    debug!(error = %err, "Region scan deferred");
                    report.deferred += 1;
                }
            }
        }
        report
    }

    /// Flammable blocks left across all regions, or `-1` while any region
    /// has no baseline yet.
    ///
    /// Check for the sentinel before treating `0` as completion, or use
    /// [`BurnableRegionTracker::remaining_if_known`].
    pub fn flammable_blocks_remaining(&self) -> i64 {
        self.remaining_if_known()
            .map_or(-1, |remaining| remaining as i64)
    }

    /// Flammable blocks left, `None` while any region has no baseline
    pub fn remaining_if_known(&self) -> Option<u64> {
        self.regions
            .iter()
            .map(|region| {
                region
                    .total_flammable_blocks()
                    .map(|_| u64::from(region.current_flammable_blocks()))
            })
            .sum()
    }

    /// Whether the region at `index` is past the fully burned threshold
    pub fn is_burned(&self, index: usize) -> bool {
        self.regions
            .get(index)
            .is_some_and(|region| self.is_region_burned(region))
    }

    fn is_region_burned(&self, region: &BurnableRegion) -> bool {
        region.total_flammable_blocks().is_some()
            && region.proportion_burned() >= self.config.fully_burned_threshold
    }

    /// Regions past the fully burned threshold
    pub fn burned_regions(&self) -> impl Iterator<Item = &BurnableRegion> + '_ {
        self.regions
            .iter()
            .filter(move |region| self.is_region_burned(region))
    }

    /// Every region known and nothing flammable left, the stage-advance condition
    pub fn is_complete(&self) -> bool {
        self.remaining_if_known() == Some(0)
    }

    pub fn summaries(&self) -> Vec<RegionSummary> {
        self.regions
            .iter()
            .map(|region| RegionSummary {
                name: region.name().to_string(),
                proportion_burned: region.proportion_burned(),
                total: region.total_flammable_blocks(),
                current: region.current_flammable_blocks(),
                burned: self.is_region_burned(region),
            })
            .collect()
    }
}
