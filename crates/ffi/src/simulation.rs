use fire_spread_core::SimulationStats;

use crate::error::FireSpreadErrorCode;
use crate::helpers::{ffi_call, instance_from_ptr, with_fire_spread_mut, write_out};
use crate::instance::FireSpreadInstance;

/// FFI-friendly snapshot of the simulation after a tick.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireSpreadStats {
    /// Ticks run so far.
    pub world_age: u64,
    /// Burning voxels.
    pub active_fires: u32,
    /// Fires started by deferred spread this tick.
    pub ignited: u32,
    /// Flammable blocks turned into fire this tick.
    pub burned: u32,
    /// Fires put out this tick.
    pub extinguished: u32,
    /// Fires that reached the end of their life this tick.
    pub expired: u32,
    /// Flammable blocks left in the active regions, `-1` while any region has no baseline.
    pub flammable_blocks_remaining: i64,
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

impl From<SimulationStats> for FireSpreadStats {
    fn from(stats: SimulationStats) -> Self {
        Self {
            world_age: stats.world_age,
            active_fires: saturate(stats.active_fires),
            ignited: saturate(stats.last_tick.ignited),
            burned: saturate(stats.last_tick.burned),
            extinguished: saturate(stats.last_tick.extinguished),
            expired: saturate(stats.last_tick.expired),
            flammable_blocks_remaining: stats.flammable_blocks_remaining,
        }
    }
}

/// Advance the simulation by one server tick.
///
/// Call once per tick (20 per second). `out_stats` may be null.
///
/// Thread-safe: takes the write lock for the duration of the tick.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_stats` must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_tick(
    ptr: *const FireSpreadInstance,
    out_stats: *mut FireSpreadStats,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let stats = with_fire_spread_mut(instance, |sim| sim.tick())?;
        if out_stats.is_null() {
            return Ok(());
        }
        unsafe { write_out(out_stats, stats.into(), "out_stats") }
    })
}
