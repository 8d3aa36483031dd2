//! c interface
//!
//! Entry points for hosts that can only reach native code through a C ABI. Handles cross the
//! boundary as `uintptr_t`. Every function returns `0` on success and `-1` on failure; on failure
//! the loader's message is stored in `*err` (if `err` is non-null) and must be released with
//! [`dlsync_error_free`].

use crate::core_impl::loader::open_impl;
use crate::{Error, Handle, OpenFlags, Symbol};
use alloc::{ffi::CString, string::ToString};
use core::{
    ffi::{CStr, c_char, c_int, c_void},
    ptr::null_mut,
};

const OK: c_int = 0;
const FAILED: c_int = -1;

#[cold]
fn report(err: Error, out: *mut *mut c_char) -> c_int {
    if !out.is_null() {
        let msg = CString::new(err.to_string()).unwrap_or_default();
        unsafe { *out = msg.into_raw() };
    }
    FAILED
}

#[inline]
unsafe fn name_bytes<'a>(name: *const c_char) -> Option<&'a [u8]> {
    if name.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(name) }.to_bytes())
    }
}

/// # Safety
/// `path` must be null or a valid C string, `handle` must be valid for writes, and `err` must be
/// null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dlsync_open(
    path: *const c_char,
    flags: c_int,
    handle: *mut usize,
    err: *mut *mut c_char,
) -> c_int {
    let Some(path) = (unsafe { name_bytes(path) }) else {
        return report(Error::InvalidName, err);
    };
    match open_impl(path, OpenFlags::from_bits_retain(flags)) {
        Ok(lib) => {
            unsafe { *handle = lib.into_raw() };
            OK
        }
        Err(e) => report(e, err),
    }
}

/// # Safety
/// `handle` must be valid for writes, and `err` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dlsync_open_self(
    flags: c_int,
    handle: *mut usize,
    err: *mut *mut c_char,
) -> c_int {
    match Handle::open_self(OpenFlags::from_bits_retain(flags)) {
        Ok(lib) => {
            unsafe { *handle = lib.into_raw() };
            OK
        }
        Err(e) => report(e, err),
    }
}

/// # Safety
/// `handle` must come from [`dlsync_open`] or [`dlsync_open_self`] and not be closed yet.
/// `err` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dlsync_close(handle: usize, err: *mut *mut c_char) -> c_int {
    match unsafe { Handle::from_raw(handle) }.close() {
        Ok(()) => OK,
        Err(e) => report(e, err),
    }
}

/// A return of `0` with `*addr == NULL` means the symbol exists and its value is null.
///
/// # Safety
/// `handle` must come from [`dlsync_open`] or [`dlsync_open_self`] and not be closed yet.
/// `name` must be null or a valid C string, `addr` must be valid for writes, and `err` must be
/// null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dlsync_symbol(
    handle: usize,
    name: *const c_char,
    addr: *mut *mut c_void,
    err: *mut *mut c_char,
) -> c_int {
    unsafe { *addr = null_mut() };
    let Some(name) = (unsafe { name_bytes(name) }) else {
        return report(Error::InvalidName, err);
    };
    let handle = unsafe { Handle::from_raw(handle) };
    match handle.symbol_impl(name) {
        Ok(sym) => {
            unsafe { *addr = sym.map_or(null_mut(), Symbol::into_raw) };
            OK
        }
        Err(e) => report(e, err),
    }
}

/// # Safety
/// `err` must be null or a message stored by one of the functions above, freed at most once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dlsync_error_free(err: *mut c_char) {
    if !err.is_null() {
        drop(unsafe { CString::from_raw(err) });
    }
}
