//! Fire cell lifecycle and the per-tick fire loop.
//!
//! Every fire voxel has exactly one [`FireCell`] in the engine's arena, keyed
//! by position. Each tick the engine first applies the commands deferred by
//! the previous tick, then walks a snapshot of the arena and runs every cell:
//!
//! 1. **Lifetime** - a cell that reached its maximum age schedules its own
//!    removal and stops.
//! 2. **Support** - fire without a full face below it that has outlived a
//!    third of its lifetime dies unless a flammable block touches it.
//! 3. **Connectivity** - fire faces are recomputed from the neighbours and
//!    rewritten when they changed. Age is kept.
//! 4. **Spread** - with probability `base_spread_chance × weight` the cell
//!    schedules ignition of the first nearby air voxel that fire could cling
//!    to and that touches fuel.
//! 5. **Burn** - every neighbouring flammable block is independently turned
//!    into fire with probability `base_burn_chance × its burn weight`.
//!
//! Steps 1, 2 and 4 add or remove cells and are deferred to the next tick
//! boundary. Step 5 only converts neighbours; the new cells join the arena
//! immediately but are not part of the snapshot being walked.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FireConfig;
use crate::core_types::block::{FireFaces, Voxel};
use crate::core_types::flammability::FlammabilityTable;
use crate::core_types::position::{
    face_neighbors, rotated_neighbors, BlockBox, BlockPos, Direction,
};
use crate::fire::command_queue::{CommandQueue, FireCommand};
use crate::fire::ignition::{
    fire_faces, has_adjacent_flammable, has_full_adjacent_face, supported_from_below, try_ignite,
};
use crate::grid::VoxelGrid;

/// State of one burning voxel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireCell {
    pub(crate) alive_ticks: u32,
}

impl FireCell {
    /// Ticks this cell has been processed
    pub fn alive_ticks(&self) -> u32 {
        self.alive_ticks
    }
}

/// What happened during one engine tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Deferred ignitions that produced fire
    pub ignited: usize,
    /// Deferred extinguishes that removed fire
    pub extinguished: usize,
    /// Flammable neighbours converted to fire
    pub burned: usize,
    /// Cells that scheduled their own removal (old age or no support)
    pub expired: usize,
    /// Spread attempts scheduled for the next tick
    pub spread_scheduled: usize,
    /// Cells dropped because the host replaced their fire
    pub detached: usize,
    /// Cells in the arena after the tick
    pub active: usize,
}

/// Owns every fire cell and runs them once per tick
#[derive(Debug, Default)]
pub struct FireEngine {
    cells: FxHashMap<BlockPos, FireCell>,
    queue: CommandQueue,
    config: FireConfig,
}

impl FireEngine {
    pub fn new(config: FireConfig) -> Self {
        Self {
            cells: FxHashMap::default(),
            queue: CommandQueue::default(),
            config,
        }
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn cell(&self, pos: BlockPos) -> Option<&FireCell> {
        self.cells.get(&pos)
    }

    pub fn is_burning(&self, pos: BlockPos) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn active_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Positions of every active cell, sorted
    pub fn active_cells(&self) -> Vec<BlockPos> {
        let mut positions: Vec<BlockPos> = self.cells.keys().copied().collect();
        positions.sort_unstable_by_key(|p| (p.x, p.y, p.z));
        positions
    }

    /// Schedule an ignition attempt for the next tick boundary
    pub fn schedule_ignite(&mut self, pos: BlockPos) {
        self.queue.submit(FireCommand::Ignite(pos));
    }

    /// Schedule removal of the fire at `pos` for the next tick boundary
    pub fn schedule_extinguish(&mut self, pos: BlockPos) {
        if !self.queue.is_extinguish_pending(pos) {
            self.queue.submit(FireCommand::Extinguish(pos));
        }
    }

    /// Start a fire right away (between ticks).
    ///
    /// Returns `false` without changes when the voxel isn't air or can't hold fire.
    pub fn ignite<G: VoxelGrid + ?Sized>(&mut self, grid: &mut G, pos: BlockPos) -> bool {
        if !try_ignite(grid, pos) {
            return false;
        }
        self.attach(pos);
        true
    }

    /// Handle the host's notification that the voxel at `pos` changed.
    ///
    /// Untracked fire gets its faces normalised and a fresh cell; fire with
    /// nothing to cling to is cleared. A cell whose fire was overwritten is
    /// dropped. Returns whether a cell was attached.
    pub fn on_block_changed<G: VoxelGrid + ?Sized>(&mut self, grid: &mut G, pos: BlockPos) -> bool {
        let Ok(voxel) = grid.voxel(pos) else {
            return false;
        };

        if !voxel.block.is_fire() {
            if self.cells.remove(&pos).is_some() {
                debug!(x = pos.x, y = pos.y, z = pos.z, block = %voxel.block, "Fire overwritten");
            }
            return false;
        }
        if self.cells.contains_key(&pos) {
            return false;
        }

        match fire_faces(grid, pos) {
            Some(faces) => {
                if faces != voxel.faces && grid.set_voxel(pos, Voxel::fire(faces)).is_err() {
                    return false;
                }
                self.attach(pos);
                true
            }
            None => {
                debug!(x = pos.x, y = pos.y, z = pos.z, "Cleared unsupported fire");
                // Same chunk was just read, so the write can't fail
                let _ = grid.set_voxel(pos, Voxel::AIR);
                false
            }
        }
    }

    /// Put out the fire at `pos` right away (between ticks).
    ///
    /// Returns whether a fire voxel was turned into air.
    ///
    /// A cell whose voxel can't be read or written is kept, so the fire
    /// resumes once its chunk is back.
    pub fn extinguish<G: VoxelGrid + ?Sized>(&mut self, grid: &mut G, pos: BlockPos) -> bool {
        match grid.voxel(pos) {
            Ok(voxel) if voxel.block.is_fire() => {
                if grid.set_voxel(pos, Voxel::AIR).is_err() {
                    return false;
                }
                self.cells.remove(&pos);
                debug!(x = pos.x, y = pos.y, z = pos.z, "Extinguished fire");
                true
            }
            Ok(_) => {
                self.cells.remove(&pos);
                false
            }
            Err(_) => false,
        }
    }

    /// Put out every fire in the cube of side `2 * radius + 1` around `center`.
    ///
    /// Only tracked cells are visited, so the cost doesn't grow with the radius.
    pub fn extinguish_within<G: VoxelGrid + ?Sized>(
        &mut self,
        grid: &mut G,
        center: BlockPos,
        radius: u32,
    ) -> usize {
        let bounds = BlockBox::around(center, radius);
        self.active_cells()
            .into_iter()
            .filter(|&pos| bounds.contains(pos) && self.extinguish(grid, pos))
            .count()
    }

    /// Put out every tracked fire and forget pending commands. Cells in
    /// unreachable chunks are kept, see [`FireEngine::extinguish`].
    pub fn extinguish_all<G: VoxelGrid + ?Sized>(&mut self, grid: &mut G) -> usize {
        let count = self
            .active_cells()
            .into_iter()
            .filter(|&pos| self.extinguish(grid, pos))
            .count();
        self.queue.clear();
        count
    }

    /// Forget every cell and command without touching the grid
    pub fn clear(&mut self) {
        self.cells.clear();
        self.queue.clear();
    }

    /// Run one simulation step
    pub fn tick<G, R>(&mut self, grid: &mut G, table: &FlammabilityTable, rng: &mut R) -> TickReport
    where
        G: VoxelGrid + ?Sized,
        R: Rng,
    {
        let mut report = TickReport::default();

        self.queue.begin_tick();
        self.apply_pending(grid, &mut report);

        for pos in self.active_cells() {
            self.tick_cell(grid, table, rng, pos, &mut report);
        }

        report.active = self.cells.len();
        report
    }

    fn attach(&mut self, pos: BlockPos) {
        self.cells.insert(pos, FireCell::default());
        debug!(x = pos.x, y = pos.y, z = pos.z, "Fire started");
    }

    fn apply_pending<G: VoxelGrid + ?Sized>(&mut self, grid: &mut G, report: &mut TickReport) {
        for command in self.queue.take_pending() {
            let applied = match command {
                FireCommand::Ignite(pos) => {
                    let ignited = self.ignite(grid, pos);
                    report.ignited += usize::from(ignited);
                    ignited
                }
                FireCommand::Extinguish(pos) => {
                    let extinguished = self.extinguish(grid, pos);
                    report.extinguished += usize::from(extinguished);
                    extinguished
                }
            };
            if applied {
                self.queue.mark_applied(command);
            }
        }
    }

    fn tick_cell<G, R>(
        &mut self,
        grid: &mut G,
        table: &FlammabilityTable,
        rng: &mut R,
        pos: BlockPos,
        report: &mut TickReport,
    ) where
        G: VoxelGrid + ?Sized,
        R: Rng,
    {
        let Some(cell) = self.cells.get_mut(&pos) else {
            return;
        };
        // Unloaded fire neither ages nor acts
        let Ok(voxel) = grid.voxel(pos) else {
            return;
        };
        if !voxel.block.is_fire() {
            self.cells.remove(&pos);
            report.detached += 1;
            return;
        }

        let age = cell.alive_ticks;
        cell.alive_ticks = age.saturating_add(1);

        if age >= self.config.max_lifetime_ticks {
            self.schedule_extinguish(pos);
            report.expired += 1;
            return;
        }

        if age > self.config.unsupported_grace_ticks()
            && !supported_from_below(grid, pos)
            && !has_adjacent_flammable(grid, table, pos)
        {
            debug!(x = pos.x, y = pos.y, z = pos.z, age, "Unsupported fire starved");
            self.schedule_extinguish(pos);
            report.expired += 1;
            return;
        }

        // Fire that lost every hold keeps burning without faces until it starves
        let faces = fire_faces(grid, pos).unwrap_or(FireFaces::NONE);
        if faces != voxel.faces {
            // Fails only if the chunk vanished, which was just ruled out
            let _ = grid.set_voxel(pos, Voxel::fire(faces));
        }

        if let Some(weight) = fuel_spread_weight(grid, table, pos) {
            if rng.random::<f64>() < self.config.base_spread_chance * weight {
                if let Some(target) = spread_target(grid, table, pos) {
                    self.schedule_ignite(target);
                    report.spread_scheduled += 1;
                }
            }
        }

        for neighbor in rotated_neighbors(pos) {
            let Ok(block) = grid.block_type(neighbor) else {
                continue;
            };
            let Some(weight) = table.burn_weight(block) else {
                continue;
            };
            if rng.random::<f64>() < self.config.base_burn_chance * weight {
                let faces = fire_faces(grid, neighbor).unwrap_or(FireFaces::NONE);
                if grid.set_voxel(neighbor, Voxel::fire(faces)).is_ok() {
                    debug!(x = neighbor.x, y = neighbor.y, z = neighbor.z, %block, "Block burned");
                    self.cells.insert(neighbor, FireCell::default());
                    report.burned += 1;
                }
            }
        }
    }
}

/// Spread weight of the fuel feeding the fire at `pos`.
///
/// Fire itself isn't flammable, so the weight comes from the block it burns
/// on: the block below when that is flammable, otherwise the most eager
/// flammable face neighbour. `None` when nothing around it burns.
pub fn fuel_spread_weight<G: VoxelGrid + ?Sized>(
    grid: &G,
    table: &FlammabilityTable,
    pos: BlockPos,
) -> Option<f64> {
    table
        .spread_weight(grid.block_or_air(pos + Direction::Down.offset()))
        .or_else(|| {
            face_neighbors(pos)
                .filter_map(|(_, neighbor)| table.spread_weight(grid.block_or_air(neighbor)))
                .reduce(f64::max)
        })
}

/// First voxel around `pos`, in rotated neighbour order, that fire could
/// spread to: loaded air, touching a full face, next to fuel.
pub fn spread_target<G: VoxelGrid + ?Sized>(
    grid: &G,
    table: &FlammabilityTable,
    pos: BlockPos,
) -> Option<BlockPos> {
    rotated_neighbors(pos).find(|&candidate| {
        matches!(grid.block_type(candidate), Ok(block) if block.is_air())
            && has_full_adjacent_face(grid, candidate)
            && has_adjacent_flammable(grid, table, candidate)
    })
}
