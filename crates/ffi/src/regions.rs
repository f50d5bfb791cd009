use std::os::raw::c_char;

use fire_spread_core::RegionSource;

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{
    ffi_call, instance_from_ptr, str_from_ptr, with_fire_spread, with_fire_spread_mut, write_out,
};
use crate::instance::FireSpreadInstance;

/// Replace the active region set with the list under `key` in `regions_json`.
///
/// Each entry is `{"name": ..., "start": ..., "end": ...}` with corners as
/// `{x, y, z}` objects or `[x, y, z]` arrays. Malformed entries are skipped,
/// so `out_count` can be smaller than the list. A missing key loads an empty set.
///
/// Returns `InvalidConfig` when the document itself isn't JSON.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `regions_json` and `key` must be null-terminated strings.
/// - `out_count` must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_load_regions_json(
    ptr: *const FireSpreadInstance,
    regions_json: *const c_char,
    key: *const c_char,
    out_count: *mut u32,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let json = unsafe { str_from_ptr(regions_json, "regions_json")? };
        let key = unsafe { str_from_ptr(key, "key")? };
        let source = RegionSource::from_json(json)?;

        let count = with_fire_spread_mut(instance, |sim| sim.load_regions(&source, key))?;
        if out_count.is_null() {
            return Ok(());
        }
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        unsafe { write_out(out_count, count, "out_count") }
    })
}

/// Flammable blocks left across the active regions.
///
/// Writes `-1` while any region hasn't completed its first scan; check for
/// it before treating `0` as "everything burned".
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_remaining` must be valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_flammable_blocks_remaining(
    ptr: *const FireSpreadInstance,
    out_remaining: *mut i64,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let remaining =
            with_fire_spread(instance, |sim| sim.tracker().flammable_blocks_remaining())?;
        unsafe { write_out(out_remaining, remaining, "out_remaining") }
    })
}

/// Number of regions in the active set.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_count` must be valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_region_count(
    ptr: *const FireSpreadInstance,
    out_count: *mut u32,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let count = with_fire_spread(instance, |sim| sim.tracker().len())?;
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        unsafe { write_out(out_count, count, "out_count") }
    })
}

/// Fraction of region `index` that has burned, in `[0, 1]`.
///
/// `0` until the region's first complete scan; `1` for a region with
/// nothing flammable in it. `out_burned` (may be null) reports whether the
/// region is past the configured fully burned threshold.
///
/// Returns `InvalidParameter` when `index` is out of range.
///
/// # Safety
/// - `ptr` must be null or a live instance from `fire_spread_new`.
/// - `out_proportion` must be valid for a write.
/// - `out_burned` must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_region_proportion_burned(
    ptr: *const FireSpreadInstance,
    index: u32,
    out_proportion: *mut f64,
    out_burned: *mut bool,
) -> FireSpreadErrorCode {
    ffi_call(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let index = index as usize;
        let (proportion, burned) = with_fire_spread(instance, |sim| {
            let tracker = sim.tracker();
            tracker
                .region(index)
                .map(|region| (region.proportion_burned(), tracker.is_burned(index)))
        })?
        .ok_or_else(|| {
            DefaultFireSpreadError::invalid_parameter(format!("No region at index {index}"))
        })?;

        unsafe { write_out(out_proportion, proportion, "out_proportion")? };
        if !out_burned.is_null() {
            unsafe { write_out(out_burned, burned, "out_burned")? };
        }
        Ok(())
    })
}
