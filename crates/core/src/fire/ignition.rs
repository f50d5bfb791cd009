//! Where fire may exist, and placing it.
//!
//! Fire needs something to hold on to: either a full top face below it, or
//! at least one full face beside or above it. Fire that would float in the
//! air is never placed.

use tracing::debug;

use crate::core_types::block::{FireFaces, Voxel};
use crate::core_types::flammability::FlammabilityTable;
use crate::core_types::position::{face_neighbors, BlockPos, Direction};
use crate::grid::VoxelGrid;

/// Whether the block below `pos` presents a full top face
pub fn supported_from_below<G: VoxelGrid + ?Sized>(grid: &G, pos: BlockPos) -> bool {
    grid.block_or_air(pos + Direction::Down.offset())
        .is_face_full(Direction::Up)
}

/// Connectivity faces fire at `pos` would have.
///
/// Fire resting on a full top face gets no faces. Otherwise it clings to
/// every neighbour (sides and above) whose facing side is full. Returns
/// `None` when there is nothing to cling to.
pub fn fire_faces<G: VoxelGrid + ?Sized>(grid: &G, pos: BlockPos) -> Option<FireFaces> {
    if supported_from_below(grid, pos) {
        return Some(FireFaces::NONE);
    }

    let faces: FireFaces = Direction::LATERAL_AND_UP
        .into_iter()
        .filter(|&direction| {
            grid.block_or_air(pos + direction.offset())
                .is_face_full(direction.opposite())
        })
        .collect();

    if faces.is_empty() {
        None
    } else {
        Some(faces)
    }
}

/// Whether any of the six neighbours presents a full face towards `pos`
pub fn has_full_adjacent_face<G: VoxelGrid + ?Sized>(grid: &G, pos: BlockPos) -> bool {
    face_neighbors(pos).any(|(direction, neighbor)| {
        grid.block_or_air(neighbor)
            .is_face_full(direction.opposite())
    })
}

/// Whether any of the six neighbours of `pos` is flammable
pub fn has_adjacent_flammable<G: VoxelGrid + ?Sized>(
    grid: &G,
    table: &FlammabilityTable,
    pos: BlockPos,
) -> bool {
    face_neighbors(pos).any(|(_, neighbor)| table.is_flammable(grid.block_or_air(neighbor)))
}

/// Whether a player tool may put raw fire at `pos`: the voxel is air and
/// something solid touches it.
pub fn can_place_fire<G: VoxelGrid + ?Sized>(grid: &G, pos: BlockPos) -> bool {
    matches!(grid.block_type(pos), Ok(block) if block.is_air()) && has_full_adjacent_face(grid, pos)
}

/// Turn the air voxel at `pos` into fire.
///
/// Returns `false` without touching the grid when the voxel isn't air (this
/// includes existing fire), isn't loaded, or has nothing to hold the fire.
/// The caller attaches the fire cell on success.
pub fn try_ignite<G: VoxelGrid + ?Sized>(grid: &mut G, pos: BlockPos) -> bool {
    match grid.block_type(pos) {
        Ok(block) if block.is_air() => {}
        _ => return false,
    }

    let Some(faces) = fire_faces(grid, pos) else {
        debug!(x = pos.x, y = pos.y, z = pos.z, "Refused to ignite floating fire");
        return false;
    };

    grid.set_voxel(pos, Voxel::fire(faces)).is_ok()
}
