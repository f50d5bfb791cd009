//! Host-facing simulation driver.
//!
//! `FireSimulation` bundles the pieces a game server needs each tick:
//! - the voxel grid (any [`VoxelGrid`] implementation)
//! - the flammability table
//! - the fire engine with its deferred command queue
//! - the burnable region tracker
//! - a seeded RNG, so a run can be replayed exactly
//!
//! One call to [`FireSimulation::tick`] is one server tick: pending fire
//! commands are applied, every fire cell runs, the world ages by one tick and
//! the regions are rescanned whenever the age lands on the scan interval.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::core_types::block::{FireFaces, Voxel};
use crate::core_types::flammability::FlammabilityTable;
use crate::core_types::position::BlockPos;
use crate::fire::engine::{FireEngine, TickReport};
use crate::fire::ignition::can_place_fire;
use crate::grid::VoxelGrid;
use crate::regions::{BurnableRegionTracker, RegionDefinition, RegionSource, ScanReport};

/// Fire simulation over a host-provided voxel grid
pub struct FireSimulation<G> {
    grid: G,
    table: FlammabilityTable,
    engine: FireEngine,
    tracker: BurnableRegionTracker,
    rng: StdRng,
    config: SimulationConfig,

    /// Ticks run so far
    world_age: u64,

    // Running totals
    total_ignited: u64,
    total_burned: u64,
    total_extinguished: u64,
    last_tick: TickReport,
    last_scan: Option<ScanReport>,
}

impl<G: VoxelGrid + Sync> FireSimulation<G> {
    /// Create a simulation with the default flammability table
    pub fn new(grid: G, config: SimulationConfig) -> Self {
        Self::with_table(grid, FlammabilityTable::default(), config)
    }

    /// Create a simulation with a custom flammability table
    pub fn with_table(grid: G, table: FlammabilityTable, config: SimulationConfig) -> Self {
        info!(
            seed = config.seed,
            flammable_types = table.len(),
            "Created fire simulation"
        );
        Self {
            grid,
            table,
            engine: FireEngine::new(config.fire),
            tracker: BurnableRegionTracker::new(config.regions),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            world_age: 0,
            total_ignited: 0,
            total_burned: 0,
            total_extinguished: 0,
            last_tick: TickReport::default(),
            last_scan: None,
        }
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> SimulationStats {
        let report = self.engine.tick(&mut self.grid, &self.table, &mut self.rng);
        self.world_age += 1;

        self.total_ignited += report.ignited as u64;
        self.total_burned += report.burned as u64;
        self.total_extinguished += report.extinguished as u64;
        self.last_tick = report;

        if let Some(scan) = self.tracker.on_tick(self.world_age, &self.grid, &self.table) {
            debug!(
                world_age = self.world_age,
                baselined = scan.baselined,
                deferred = scan.deferred,
                remaining = self.tracker.flammable_blocks_remaining(),
                "Scanned regions"
            );
            self.last_scan = Some(scan);
        }

        self.get_stats()
    }

    /// Start a fire in the air voxel at `pos` right away
    pub fn ignite(&mut self, pos: BlockPos) -> bool {
        let ignited = self.engine.ignite(&mut self.grid, pos);
        self.total_ignited += u64::from(ignited);
        ignited
    }

    /// Place raw fire the way a player's fire-starting tool does, then let
    /// the engine pick it up.
    ///
    /// Refused unless the voxel is air touching a full face.
    pub fn place_fire(&mut self, pos: BlockPos) -> bool {
        if !can_place_fire(&self.grid, pos)
            || self.grid.set_voxel(pos, Voxel::fire(FireFaces::NONE)).is_err()
        {
            return false;
        }
        let attached = self.engine.on_block_changed(&mut self.grid, pos);
        self.total_ignited += u64::from(attached);
        attached
    }

    /// Forward the host's "voxel changed" notification to the engine
    pub fn notify_block_changed(&mut self, pos: BlockPos) -> bool {
        self.engine.on_block_changed(&mut self.grid, pos)
    }

    pub fn extinguish(&mut self, pos: BlockPos) -> bool {
        let put_out = self.engine.extinguish(&mut self.grid, pos);
        self.total_extinguished += u64::from(put_out);
        put_out
    }

    /// Put out every fire within `radius` of `center` (a cube)
    pub fn extinguish_within(&mut self, center: BlockPos, radius: u32) -> usize {
        let count = self.engine.extinguish_within(&mut self.grid, center, radius);
        self.total_extinguished += count as u64;
        count
    }

    /// Put out every fire, e.g. between stages
    pub fn extinguish_all(&mut self) -> usize {
        let count = self.engine.extinguish_all(&mut self.grid);
        self.total_extinguished += count as u64;
        count
    }

    /// Switch the active region set to the one under `key`
    pub fn load_regions(&mut self, source: &RegionSource, key: &str) -> usize {
        self.last_scan = None;
        self.tracker.load_from(source, key)
    }

    /// Switch the active region set to definitions the host built itself
    pub fn replace_regions(&mut self, key: &str, definitions: &[RegionDefinition]) -> usize {
        self.last_scan = None;
        self.tracker.replace(key, definitions)
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    /// Mutable access for the host's own edits. Report fire placed this way
    /// through [`FireSimulation::notify_block_changed`].
    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn engine(&self) -> &FireEngine {
        &self.engine
    }

    pub fn tracker(&self) -> &BurnableRegionTracker {
        &self.tracker
    }

    pub fn table(&self) -> &FlammabilityTable {
        &self.table
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world_age(&self) -> u64 {
        self.world_age
    }

    pub fn get_stats(&self) -> SimulationStats {
        SimulationStats {
            world_age: self.world_age,
            active_fires: self.engine.active_cell_count(),
            pending_commands: self.engine.queue().pending().len(),
            total_ignited: self.total_ignited,
            total_burned: self.total_burned,
            total_extinguished: self.total_extinguished,
            last_tick: self.last_tick,
            last_scan: self.last_scan,
            flammable_blocks_remaining: self.tracker.flammable_blocks_remaining(),
        }
    }
}

/// Statistics for the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub world_age: u64,
    pub active_fires: usize,
    pub pending_commands: usize,
    pub total_ignited: u64,
    pub total_burned: u64,
    pub total_extinguished: u64,
    pub last_tick: TickReport,
    pub last_scan: Option<ScanReport>,
    /// `-1` until every region has a baseline
    pub flammable_blocks_remaining: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FireConfig;
    use crate::core_types::block::BlockType;
    use crate::core_types::position::BlockBox;
    use crate::grid::ChunkedGrid;
    use serde_json::json;

    fn yard() -> ChunkedGrid {
        let mut grid = ChunkedGrid::new();
        let area = BlockBox::new(BlockPos::new(-8, -8, -8), BlockPos::new(8, 8, 8));
        grid.load_box(&area);
        let floor = BlockBox::new(BlockPos::new(-6, 0, -6), BlockPos::new(6, 0, 6));
        grid.fill_box(&floor, BlockType::Dirt).unwrap();
        grid
    }

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            fire: FireConfig {
                base_spread_chance: 0.0,
                base_burn_chance: 0.0,
                max_lifetime_ticks: 40,
            },
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_world_age_and_region_cadence() {
        let mut sim = FireSimulation::new(yard(), quiet_config());
        let source = RegionSource::new(json!({
            "stage1": [{ "name": "Yard", "start": [-6, 0, -6], "end": [6, 1, 6] }]
        }));
        assert_eq!(sim.load_regions(&source, "stage1"), 1);

        for _ in 0..19 {
            let stats = sim.tick();
            assert_eq!(stats.flammable_blocks_remaining, -1);
            assert!(stats.last_scan.is_none());
        }
        let stats = sim.tick();
        assert_eq!(stats.world_age, 20);
        assert_eq!(stats.flammable_blocks_remaining, 0);
        assert_eq!(stats.last_scan.unwrap().baselined, 1);
    }

    #[test]
    fn test_place_fire_requires_support() {
        let mut sim = FireSimulation::new(yard(), quiet_config());
        assert!(!sim.place_fire(BlockPos::new(0, 4, 0)));
        assert_eq!(sim.grid().block_type(BlockPos::new(0, 4, 0)), Ok(BlockType::Air));

        assert!(sim.place_fire(BlockPos::new(0, 1, 0)));
        assert!(sim.engine().is_burning(BlockPos::new(0, 1, 0)));
        // Already fire
        assert!(!sim.place_fire(BlockPos::new(0, 1, 0)));
        assert_eq!(sim.get_stats().total_ignited, 1);
    }

    #[test]
    fn test_fires_burn_out() {
        let mut sim = FireSimulation::new(yard(), quiet_config());
        assert!(sim.ignite(BlockPos::new(1, 1, 1)));
        assert!(sim.ignite(BlockPos::new(2, 1, 1)));

        let mut stats = sim.get_stats();
        for _ in 0..42 {
            stats = sim.tick();
        }
        assert_eq!(stats.active_fires, 0);
        assert_eq!(stats.total_extinguished, 2);
        assert_eq!(sim.grid().block_type(BlockPos::new(1, 1, 1)), Ok(BlockType::Air));
    }

    #[test]
    fn test_host_placed_fire_is_tracked() {
        let mut sim = FireSimulation::new(yard(), quiet_config());
        let pos = BlockPos::new(-2, 1, 3);
        sim.grid_mut()
            .set_voxel(pos, Voxel::fire(FireFaces::NONE))
            .unwrap();
        assert!(sim.notify_block_changed(pos));
        assert_eq!(sim.extinguish_within(pos, 3), 1);
        assert!(!sim.extinguish(pos));
    }
}
