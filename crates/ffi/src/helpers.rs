use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};

use fire_spread_core::{ChunkedGrid, FireSimulation};
use tracing::warn;

use crate::error::{
    with_last_error_mut, DefaultFireSpreadError, FireSpreadError, FireSpreadErrorCode,
};
use crate::instance::FireSpreadInstance;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl FireSpreadError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error and return its code.
#[inline]
pub(crate) fn track_error(error: &impl FireSpreadError) -> FireSpreadErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireSpreadErrorCode::Ok;
    });
}

/// Record the outcome of a fallible operation, keeping the value on success.
pub(crate) fn track_result<T>(
    result: Result<T, DefaultFireSpreadError>,
) -> Result<T, FireSpreadErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run the body of an FFI entry point and turn its outcome into an error code.
///
/// Panics are caught here and never unwind into the caller.
pub(crate) fn ffi_call<F>(body: F) -> FireSpreadErrorCode
where
    F: FnOnce() -> Result<(), DefaultFireSpreadError>,
{
    let result = catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|_| {
        warn!("Caught panic at the FFI boundary");
        Err(DefaultFireSpreadError::panicked())
    });
    match track_result(result) {
        Ok(()) => FireSpreadErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind `ptr`.
///
/// # Safety
/// `ptr` must be null or a pointer returned by `fire_spread_new` that has not
/// been destroyed.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const FireSpreadInstance,
) -> Result<&'a FireSpreadInstance, DefaultFireSpreadError> {
    // SAFETY: upheld by the caller; null is rejected by `as_ref`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFireSpreadError::null_pointer("ptr"))
}

/// Write `value` through an out-parameter.
///
/// # Safety
/// `out` must be null or valid for a write of `T`.
pub(crate) unsafe fn write_out<T>(
    out: *mut T,
    value: T,
    param_name: &str,
) -> Result<(), DefaultFireSpreadError> {
    if out.is_null() {
        return Err(DefaultFireSpreadError::null_pointer(param_name));
    }
    // SAFETY: non-null checked above, validity upheld by the caller.
    unsafe {
        out.write(value);
    }
    Ok(())
}

/// Read a UTF-8 C string argument.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated string that outlives `'a`.
pub(crate) unsafe fn str_from_ptr<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultFireSpreadError> {
    if ptr.is_null() {
        return Err(DefaultFireSpreadError::null_pointer(param_name));
    }
    // SAFETY: non-null checked above, termination upheld by the caller.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| DefaultFireSpreadError::invalid_utf8(param_name))
}

/// Run `f` with shared access to the simulation.
pub(crate) fn with_fire_spread<T>(
    instance: &FireSpreadInstance,
    f: impl FnOnce(&FireSimulation<ChunkedGrid>) -> T,
) -> Result<T, DefaultFireSpreadError> {
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultFireSpreadError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` with exclusive access to the simulation.
pub(crate) fn with_fire_spread_mut<T>(
    instance: &FireSpreadInstance,
    f: impl FnOnce(&mut FireSimulation<ChunkedGrid>) -> T,
) -> Result<T, DefaultFireSpreadError> {
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultFireSpreadError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}
