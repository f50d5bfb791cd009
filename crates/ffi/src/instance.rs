use std::os::raw::c_char;
use std::ptr;
use std::sync::RwLock;

use fire_spread_core::{ChunkedGrid, FireSimulation, SimulationConfig};

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{str_from_ptr, track_error, track_result};

/// The fire spread context handed to the host.
///
/// Owns a chunked voxel world, the fire engine and the region tracker.
///
/// # Thread Safety
/// The simulation sits behind an `RwLock`: queries take a read lock, anything
/// that edits the world or ticks takes the write lock. A game server can
/// read region progress from a scoreboard thread while the main thread ticks.
pub struct FireSpreadInstance {
    pub(crate) sim: RwLock<FireSimulation<ChunkedGrid>>,
}

impl FireSpreadInstance {
    pub(crate) fn new(config: SimulationConfig) -> Box<Self> {
        Box::new(Self {
            sim: RwLock::new(FireSimulation::new(ChunkedGrid::new(), config)),
        })
    }
}

/// Hand a new instance to the caller, or null it out on failure.
///
/// # Safety
/// `out_instance` must be non-null and valid for writes.
unsafe fn publish(
    result: Result<Box<FireSpreadInstance>, DefaultFireSpreadError>,
    out_instance: *mut *mut FireSpreadInstance,
) -> FireSpreadErrorCode {
    match track_result(result) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FireSpreadErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Create an instance with default tunables and the given RNG seed.
///
/// The world starts empty: load chunks with `fire_spread_load_chunk` before
/// placing blocks.
///
/// Returns
/// - `Ok` with a valid pointer in `out_instance`
/// - `NullPointer` when `out_instance` is null
///
/// # Safety
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the instance and MUST call `fire_spread_destroy` exactly once.
///
/// Example (C)
/// ```c
/// FireSpreadInstance *sim = NULL;
/// if (fire_spread_new(1234, &sim) != Ok) {
///     fprintf(stderr, "%s\n", fire_spread_get_last_error());
///     return;
/// }
/// // ... use sim ...
/// fire_spread_destroy(sim);
/// ```
#[no_mangle]
pub unsafe extern "C" fn fire_spread_new(
    seed: u64,
    out_instance: *mut *mut FireSpreadInstance,
) -> FireSpreadErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_instance"));
    }

    let config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };
    unsafe { publish(Ok(FireSpreadInstance::new(config)), out_instance) }
}

/// Create an instance from a JSON configuration document.
///
/// Missing fields take their defaults, so `"{}"` is valid.
///
/// Returns
/// - `Ok` with a valid pointer in `out_instance`
/// - `NullPointer` when either pointer is null
/// - `InvalidParameter` when `config_json` is not UTF-8
/// - `InvalidConfig` when the document can't be parsed or a value is out of range
///
/// # Safety
/// - `config_json` must be a null-terminated string.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the instance and MUST call `fire_spread_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_new_with_config(
    config_json: *const c_char,
    out_instance: *mut *mut FireSpreadInstance,
) -> FireSpreadErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_instance"));
    }

    let result = unsafe { str_from_ptr(config_json, "config_json") }
        .and_then(|json| SimulationConfig::from_json(json).map_err(DefaultFireSpreadError::from))
        .map(FireSpreadInstance::new);
    unsafe { publish(result, out_instance) }
}

/// Destroy an instance created by `fire_spread_new` or `fire_spread_new_with_config`.
///
/// Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by one of the constructors above.
/// - It MUST NOT have been destroyed already; it must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_destroy(ptr: *mut FireSpreadInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: the pointer came from `Box::into_raw` in `publish` and has not
    // been freed (caller contract). Dropping the box frees the simulation.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
