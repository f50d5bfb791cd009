//! Integration tests for fire placement, spread and burn-out over a chunked grid

use fire_spread_core::fire::ignition::{has_full_adjacent_face, supported_from_below, try_ignite};
use fire_spread_core::{
    BlockBox, BlockPos, BlockType, ChunkedGrid, FireConfig, FireEngine, FireSimulation,
    FlammabilityTable, SimulationConfig, VoxelGrid, Voxel,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn loaded(bounds: &BlockBox) -> ChunkedGrid {
    let mut grid = ChunkedGrid::new();
    grid.load_box(bounds);
    grid
}

#[test]
fn test_isolated_ignition_fails_without_mutation() {
    let bounds = BlockBox::new(BlockPos::new(-20, -20, -20), BlockPos::new(20, 20, 20));
    let mut grid = loaded(&bounds);
    let pos = BlockPos::new(3, 7, -9);

    assert!(!try_ignite(&mut grid, pos));
    assert!(bounds
        .iter()
        .all(|p| grid.block_type(p) == Ok(BlockType::Air)));
}

#[test]
fn test_successful_ignition_never_floats() {
    let bounds = BlockBox::new(BlockPos::new(-4, -4, -4), BlockPos::new(4, 4, 4));
    let mut grid = loaded(&bounds);

    // A scattered mix of full and partial blocks
    let blocks = [
        BlockType::Stone,
        BlockType::OakSlab,
        BlockType::OakFence,
        BlockType::Glass,
        BlockType::Carpet,
        BlockType::OakLog,
    ];
    for (i, pos) in bounds.iter().enumerate() {
        if i % 7 == 0 {
            grid.set_voxel(pos, Voxel::new(blocks[i % blocks.len()]))
                .unwrap();
        }
    }

    let mut ignited = 0;
    for pos in &bounds {
        if try_ignite(&mut grid, pos) {
            ignited += 1;
            assert!(supported_from_below(&grid, pos) || has_full_adjacent_face(&grid, pos));
        }
    }
    assert!(ignited > 0);
}

#[test]
fn test_two_spreads_to_one_voxel_create_one_cell() {
    // Two fires sealed in stone, sharing a single air gap between them
    let bounds = BlockBox::new(BlockPos::new(-3, -3, -3), BlockPos::new(3, 3, 3));
    let mut grid = loaded(&bounds);
    grid.fill_box(&bounds, BlockType::Stone).unwrap();
    let fuel = BlockBox::new(BlockPos::new(0, -1, 0), BlockPos::new(2, -1, 0));
    grid.fill_box(&fuel, BlockType::Wool).unwrap();
    let pocket = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(2, 0, 0));
    grid.fill_box(&pocket, Voxel::AIR).unwrap();

    let table = FlammabilityTable::default();
    let mut rng = StdRng::seed_from_u64(11);
    let mut engine = FireEngine::new(FireConfig {
        base_spread_chance: 1.0,
        base_burn_chance: 0.0,
        max_lifetime_ticks: 100,
    });
    let gap = BlockPos::new(1, 0, 0);
    assert!(engine.ignite(&mut grid, BlockPos::new(0, 0, 0)));
    assert!(engine.ignite(&mut grid, BlockPos::new(2, 0, 0)));

    let report = engine.tick(&mut grid, &table, &mut rng);
    assert_eq!(report.spread_scheduled, 2);
    assert!(engine.queue().pending().iter().all(|c| c.position() == gap));

    let report = engine.tick(&mut grid, &table, &mut rng);
    assert_eq!(report.ignited, 1);
    assert_eq!(report.active, 3);
    assert_eq!(engine.queue().applied_this_tick().len(), 1);
    assert_eq!(grid.block_type(gap), Ok(BlockType::Fire));
}

#[test]
fn test_expired_fire_does_not_come_back() {
    let bounds = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(4, 1, 4));
    let mut grid = loaded(&bounds);
    let floor = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(4, 0, 4));
    grid.fill_box(&floor, BlockType::Stone).unwrap();

    let config = SimulationConfig {
        fire: FireConfig {
            base_spread_chance: 0.0,
            base_burn_chance: 0.0,
            max_lifetime_ticks: 10,
        },
        ..SimulationConfig::default()
    };
    let mut sim = FireSimulation::new(grid, config);
    let pos = BlockPos::new(2, 1, 2);
    assert!(sim.ignite(pos));

    // Eleven ticks age the cell to the limit; the twelfth removes it
    for _ in 0..11 {
        sim.tick();
    }
    assert!(sim.engine().is_burning(pos));
    let stats = sim.tick();
    assert_eq!(stats.active_fires, 0);
    assert_eq!(sim.grid().block_type(pos), Ok(BlockType::Air));

    for _ in 0..50 {
        assert_eq!(sim.tick().active_fires, 0);
    }
    assert_eq!(sim.grid().block_type(pos), Ok(BlockType::Air));
}

#[test]
fn test_every_fire_voxel_has_exactly_one_cell() {
    let bounds = BlockBox::new(BlockPos::new(-8, 0, -8), BlockPos::new(8, 6, 8));
    let mut grid = loaded(&bounds);
    let floor = BlockBox::new(BlockPos::new(-8, 0, -8), BlockPos::new(8, 0, 8));
    grid.fill_box(&floor, BlockType::Grass).unwrap();
    for x in [-5, 0, 5] {
        let wall = BlockBox::new(BlockPos::new(x, 1, -6), BlockPos::new(x, 4, 6));
        grid.fill_box(&wall, BlockType::OakPlanks).unwrap();
    }

    let config = SimulationConfig {
        seed: 7,
        fire: FireConfig {
            base_spread_chance: 0.02,
            base_burn_chance: 0.002,
            max_lifetime_ticks: 120,
        },
        ..SimulationConfig::default()
    };
    let mut sim = FireSimulation::new(grid, config);
    assert!(sim.ignite(BlockPos::new(1, 1, 0)));

    for _ in 0..200 {
        sim.tick();
        let fire_voxels: Vec<BlockPos> = bounds
            .iter()
            .filter(|&p| sim.grid().block_type(p) == Ok(BlockType::Fire))
            .collect();
        assert_eq!(fire_voxels, sim.engine().active_cells());
    }
}

#[test]
fn test_seeded_simulations_match() {
    fn run(seed: u64) -> Vec<BlockPos> {
        let bounds = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(12, 6, 12));
        let mut grid = ChunkedGrid::new();
        grid.load_box(&bounds);
        let floor = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(12, 0, 12));
        grid.fill_box(&floor, BlockType::Stone).unwrap();
        let stack = BlockBox::new(BlockPos::new(3, 1, 3), BlockPos::new(9, 4, 9));
        grid.fill_box(&stack, BlockType::HayBale).unwrap();

        let config = SimulationConfig {
            seed,
            fire: FireConfig {
                base_spread_chance: 0.001,
                base_burn_chance: 0.001,
                max_lifetime_ticks: 100,
            },
            ..SimulationConfig::default()
        };
        let mut sim = FireSimulation::new(grid, config);
        assert!(sim.ignite(BlockPos::new(2, 1, 6)));
        for _ in 0..150 {
            sim.tick();
        }
        sim.engine().active_cells()
    }

    assert_eq!(run(99), run(99));
}
