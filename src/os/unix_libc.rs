//! Unsynchronized forwards to `<dlfcn.h>`.
//!
//! Every function here touches the loader's process-wide error slot, so callers must hold the
//! loader lock for the whole call.

use crate::Result;
use crate::error::{find_symbol_error, load_error, unload_error};
use alloc::string::String;
use core::ffi::{CStr, c_int, c_void};
use core::ptr::null;

const UNKNOWN_ERROR: &str = "unknown dynamic loader error";

/// Discards whatever a previous call left in the error slot.
#[inline]
fn clear_error() {
    unsafe { libc::dlerror() };
}

/// Reads and clears the error slot.
fn take_error() -> Option<String> {
    let err = unsafe { libc::dlerror() };
    if err.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned())
    }
}

/// `dlopen(path, flags)`; `None` opens the running program.
pub(crate) fn open(path: Option<&CStr>, flags: c_int) -> Result<*mut c_void> {
    clear_error();
    let handle = unsafe { libc::dlopen(path.map_or(null(), CStr::as_ptr), flags) };
    if handle.is_null() {
        let msg = take_error().unwrap_or_else(|| UNKNOWN_ERROR.into());
        log::debug!("dlopen: [{:?}] failed: {}", path, msg);
        return Err(load_error(msg));
    }
    Ok(handle)
}

/// # Safety
/// `handle` must come from a successful [`open`] that has not been closed yet.
pub(crate) unsafe fn close(handle: *mut c_void) -> Result<()> {
    clear_error();
    if unsafe { libc::dlclose(handle) } != 0 {
        let msg = take_error().unwrap_or_else(|| UNKNOWN_ERROR.into());
        log::debug!("dlclose: [{:p}] failed: {}", handle, msg);
        return Err(unload_error(msg));
    }
    Ok(())
}

/// Looks up `name`. A null result with an empty error slot is a symbol whose value is null, and
/// is returned as `Ok(null)`.
///
/// # Safety
/// `handle` must come from a successful [`open`] that has not been closed yet.
pub(crate) unsafe fn symbol(handle: *mut c_void, name: &CStr) -> Result<*mut c_void> {
    clear_error();
    let sym = unsafe { libc::dlsym(handle, name.as_ptr()) };
    if sym.is_null() {
        if let Some(msg) = take_error() {
            log::debug!("dlsym: [{:?}] failed: {}", name, msg);
            return Err(find_symbol_error(msg));
        }
        log::trace!("dlsym: [{:?}] resolves to null", name);
    }
    Ok(sym)
}
