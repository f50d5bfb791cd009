use fire_spread_core::grid::ChunkPos;
use fire_spread_core::{BlockPos, BlockType, Voxel, VoxelGrid};

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{ffi_call, instance_from_ptr, with_fire_spread, with_fire_spread_mut, write_out};
use crate::instance::FireSpreadInstance;

fn block_from_id(block: u8) -> Result<BlockType, DefaultFireSpreadError> {
    BlockType::from_u8(block)
        .ok_or_else(|| DefaultFireSpreadError::invalid_parameter(format!("Unknown block id {block}")))
}

/// Make the chunk at chunk coordinates `(cx, cy, cz)` resident, filled with air.
///
/// A chunk covers 16×16×16 voxels. Loading an already loaded chunk keeps its contents.
///
/// # Safety
/// `ptr` must be null or a live instance from `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_load_chunk(
    ptr: *const FireSpreadInstance,
    cx: i32,
    cy: i32,
    cz: i32,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        with_fire_spread_mut(instance, |sim| {
            sim.grid_mut().load_chunk(ChunkPos::new(cx, cy, cz));
        })
    })
}

/// Drop the chunk at chunk coordinates `(cx, cy, cz)` and everything in it.
///
/// Fire in an unloaded chunk pauses; region scans touching it are deferred.
///
/// # Safety
/// `ptr` must be null or a live instance from `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_unload_chunk(
    ptr: *const FireSpreadInstance,
    cx: i32,
    cy: i32,
    cz: i32,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        with_fire_spread_mut(instance, |sim| {
            sim.grid_mut().unload_chunk(ChunkPos::new(cx, cy, cz));
        })
    })
}

/// Set the block at `(x, y, z)`.
///
/// Placing fire this way hands it to the fire engine, which clears it when
/// nothing supports it. Overwriting fire stops its cell.
///
/// Returns `InvalidParameter` for an unknown block id and `ChunkNotLoaded`
/// when the voxel's chunk isn't resident.
///
/// # Safety
/// `ptr` must be null or a live instance from `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_set_block(
    ptr: *const FireSpreadInstance,
    x: i32,
    y: i32,
    z: i32,
    block: u8,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let block = block_from_id(block)?;
        let pos = BlockPos::new(x, y, z);
        with_fire_spread_mut(instance, |sim| -> Result<(), DefaultFireSpreadError> {
            sim.grid_mut().set_voxel(pos, Voxel::new(block))?;
            sim.notify_block_changed(pos);
            Ok(())
        })?
    })
}

/// Read the block id at `(x, y, z)` into `out_block`.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_block` must be valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_get_block(
    ptr: *const FireSpreadInstance,
    x: i32,
    y: i32,
    z: i32,
    out_block: *mut u8,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let block = with_fire_spread(instance, |sim| sim.grid().block_type(BlockPos::new(x, y, z)))??;
        unsafe { write_out(out_block, block.as_u8(), "out_block") }
    })
}

/// Start a fire in the air voxel at `(x, y, z)`.
///
/// `out_ignited` is set to false (with `Ok`) when the voxel isn't air or
/// nothing would hold the fire.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_ignited` must be valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_ignite(
    ptr: *const FireSpreadInstance,
    x: i32,
    y: i32,
    z: i32,
    out_ignited: *mut bool,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let ignited = with_fire_spread_mut(instance, |sim| sim.ignite(BlockPos::new(x, y, z)))?;
        unsafe { write_out(out_ignited, ignited, "out_ignited") }
    })
}

/// Place fire the way a player's fire-starting item does: only into air
/// touching a full face.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_placed` must be valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_place_fire(
    ptr: *const FireSpreadInstance,
    x: i32,
    y: i32,
    z: i32,
    out_placed: *mut bool,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let placed = with_fire_spread_mut(instance, |sim| sim.place_fire(BlockPos::new(x, y, z)))?;
        unsafe { write_out(out_placed, placed, "out_placed") }
    })
}

/// Put out every fire in the cube of side `2 * radius + 1` around `(x, y, z)`.
///
/// `out_count` may be null when the caller doesn't need the count.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_count` must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_extinguish_within(
    ptr: *const FireSpreadInstance,
    x: i32,
    y: i32,
    z: i32,
    radius: u32,
    out_count: *mut u32,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let count = with_fire_spread_mut(instance, |sim| {
            sim.extinguish_within(BlockPos::new(x, y, z), radius)
        })?;
        if out_count.is_null() {
            return Ok(());
        }
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        unsafe { write_out(out_count, count, "out_count") }
    })
}
