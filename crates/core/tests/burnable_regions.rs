//! Integration tests for region baselines, burn proportions and the remaining-blocks sentinel

use approx::assert_relative_eq;
use fire_spread_core::grid::chunk_of;
use fire_spread_core::{
    BlockBox, BlockPos, BlockType, BurnableRegion, BurnableRegionTracker, ChunkedGrid,
    FireConfig, FireSimulation, FlammabilityTable, RegionConfig, RegionSource, SimulationConfig,
    VoxelGrid, Voxel,
};
use serde_json::json;

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn quiet() -> SimulationConfig {
    SimulationConfig {
        fire: FireConfig {
            base_spread_chance: 0.0,
            base_burn_chance: 0.0,
            max_lifetime_ticks: 300,
        },
        ..SimulationConfig::default()
    }
}

#[test]
fn test_wooden_cube_with_lit_corner() {
    let cube = BlockBox::new(BlockPos::new(0, 1, 0), BlockPos::new(2, 3, 2));
    let mut grid = ChunkedGrid::new();
    grid.load_box(&BlockBox::new(BlockPos::new(-1, 0, -1), BlockPos::new(3, 4, 3)));
    grid.fill_box(&cube, BlockType::OakPlanks).unwrap();

    // Light the top corner
    let corner = BlockPos::new(2, 3, 2);
    grid.set_voxel(corner, Voxel::AIR).unwrap();

    let mut sim = FireSimulation::new(grid, quiet());
    assert!(sim.ignite(corner));
    let source = RegionSource::new(json!({
        "stage1": [{ "name": "Crate", "start": [0, 1, 0], "end": [2, 3, 2] }]
    }));
    sim.load_regions(&source, "stage1");

    for _ in 0..20 {
        sim.tick();
    }
    let region = sim.tracker().region(0).unwrap();
    assert_eq!(region.total_flammable_blocks(), Some(26));
    assert_relative_eq!(region.proportion_burned(), 0.0);
    assert_eq!(sim.tracker().flammable_blocks_remaining(), 26);
}

#[test]
fn test_unloaded_middle_chunk_defers_baseline() {
    let table = FlammabilityTable::default();
    let bounds = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(47, 2, 2));
    let mut grid = ChunkedGrid::new();
    grid.load_box(&bounds);
    grid.fill_box(&bounds, BlockType::OakLog).unwrap();
    let middle = chunk_of(BlockPos::new(20, 0, 0));
    grid.unload_chunk(middle);

    let mut region = BurnableRegion::new("Long house", bounds);
    region.update(&grid, &table);
    assert_eq!(region.total_flammable_blocks(), None);
    assert_relative_eq!(region.proportion_burned(), 0.0);

    // The chunk comes back empty; whatever is there now is the baseline
    grid.load_chunk(middle);
    region.update(&grid, &table);
    assert_eq!(region.total_flammable_blocks(), Some(32 * 3 * 3));
}

#[test]
fn test_sentinel_iff_a_total_is_unknown() {
    let table = FlammabilityTable::default();
    let near = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(3, 3, 3));
    let far = BlockBox::new(BlockPos::new(100, 0, 0), BlockPos::new(103, 3, 3));
    let mut grid = ChunkedGrid::new();
    grid.load_box(&near);
    grid.fill_box(&near, BlockType::Bookshelf).unwrap();

    let source = RegionSource::new(json!({
        "stage1": [
            { "name": "Library", "start": [0, 0, 0], "end": [3, 3, 3] },
            { "name": "Annex", "start": { "x": 100, "y": 0, "z": 0 }, "end": { "x": 103, "y": 3, "z": 3 } }
        ]
    }));
    let mut tracker = BurnableRegionTracker::new(RegionConfig::default());
    tracker.load_from(&source, "stage1");

    tracker.update_all(&grid, &table);
    assert_eq!(tracker.region(0).unwrap().total_flammable_blocks(), Some(64));
    assert_eq!(tracker.flammable_blocks_remaining(), -1);
    assert_eq!(tracker.remaining_if_known(), None);

    grid.load_box(&far);
    tracker.update_all(&grid, &table);
    assert_eq!(tracker.flammable_blocks_remaining(), 64);
    assert_relative_eq!(tracker.region(1).unwrap().proportion_burned(), 1.0);
    assert!(tracker.is_burned(1));
    assert!(!tracker.is_complete());
}

#[test]
fn test_house_burns_down_monotonically() {
    let house = BlockBox::new(BlockPos::new(2, 1, 2), BlockPos::new(9, 5, 9));
    let inside = BlockBox::new(BlockPos::new(3, 1, 3), BlockPos::new(8, 4, 8));
    let world = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(12, 8, 12));
    let mut grid = ChunkedGrid::new();
    grid.load_box(&world);
    grid.fill_box(&BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(12, 0, 12)), BlockType::Stone)
        .unwrap();
    grid.fill_box(&house, BlockType::OakPlanks).unwrap();
    grid.fill_box(&inside, Voxel::AIR).unwrap();

    let config = SimulationConfig {
        seed: 2024,
        fire: FireConfig {
            base_spread_chance: 0.01,
            base_burn_chance: 0.01,
            max_lifetime_ticks: 300,
        },
        ..SimulationConfig::default()
    };
    let mut sim = FireSimulation::new(grid, config);
    let source = RegionSource::new(json!({
        "stage1": [{ "name": "House", "start": [2, 1, 2], "end": [9, 5, 9] }]
    }));
    sim.load_regions(&source, "stage1");
    assert!(sim.ignite(BlockPos::new(3, 1, 5)));

    let mut last = 0.0;
    for _ in 0..3000 {
        sim.tick();
        let burned = sim.tracker().region(0).unwrap().proportion_burned();
        assert!(burned >= last);
        last = burned;
    }

    assert!(sim.tracker().is_burned(0));
    assert!(sim.tracker().is_complete());
    assert_eq!(sim.tracker().flammable_blocks_remaining(), 0);
    assert_eq!(sim.get_stats().active_fires, 0);
}
