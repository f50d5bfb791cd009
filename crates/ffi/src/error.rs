use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use fire_spread_core::{ConfigError, GridError};

/// Common interface for FFI error types.
///
/// - `code()` - the error code passed across the FFI boundary
/// - `msg()` - the message kept for `fire_spread_get_last_error`
pub(crate) trait FireSpreadError {
    fn code(&self) -> FireSpreadErrorCode;

    fn msg(&self) -> &str;
}

/// Default implementation of `FireSpreadError` for every failure the FFI layer reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFireSpreadError {
    code: FireSpreadErrorCode,
    msg: String,
}

impl DefaultFireSpreadError {
    /// Create error for null pointer passed where non-null required.
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireSpreadErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: FireSpreadErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: FireSpreadErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for a C string that isn't valid UTF-8.
    pub fn invalid_utf8(param_name: &str) -> Self {
        Self::invalid_parameter(format!("Parameter '{param_name}' is not valid UTF-8"))
    }

    /// Create error for a panic caught at the boundary.
    pub fn panicked() -> Self {
        Self {
            code: FireSpreadErrorCode::Panic,
            msg: "Fire simulation panicked; the instance may be inconsistent".to_string(),
        }
    }
}

impl From<GridError> for DefaultFireSpreadError {
    fn from(error: GridError) -> Self {
        Self {
            code: FireSpreadErrorCode::ChunkNotLoaded,
            msg: error.to_string(),
        }
    }
}

impl From<ConfigError> for DefaultFireSpreadError {
    fn from(error: ConfigError) -> Self {
        Self {
            code: FireSpreadErrorCode::InvalidConfig,
            msg: error.to_string(),
        }
    }
}

impl FireSpreadError for DefaultFireSpreadError {
    fn code(&self) -> FireSpreadErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by fire spread functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireSpreadErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid parameter passed to function (unknown block id, region index out of range).
    InvalidParameter = 3,

    /// The voxel's chunk is not loaded.
    ChunkNotLoaded = 4,

    /// Configuration JSON could not be parsed or holds out of range values.
    InvalidConfig = 5,

    /// A panic was caught before it could cross the boundary.
    Panic = 6,
}

impl From<DefaultFireSpreadError> for FireSpreadErrorCode {
    fn from(error: DefaultFireSpreadError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The CString is stored here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, FireSpreadErrorCode)> = const { RefCell::new((None, FireSpreadErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireSpreadErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireSpreadErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns null when the last call on this thread succeeded.
///
/// The pointer stays valid until the next FFI call on this thread.
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// FireSpreadInstance *sim = NULL;
/// if (fire_spread_new(42, &sim) != Ok) {
///     const char *error = fire_spread_get_last_error();
///     if (error) {
///         printf("Fire spread creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_spread_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` when the last call succeeded).
#[no_mangle]
pub extern "C" fn fire_spread_get_last_error_code() -> FireSpreadErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
