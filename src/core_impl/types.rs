use core::{
    ffi::c_void,
    fmt::Debug,
    marker::PhantomData,
    ptr::NonNull,
};

/// An opaque handle to a library opened by the platform loader.
///
/// The value is the word returned by `dlopen`, stored as an integer; this crate never dereferences it.
/// A `Handle` only exists for a successful open, and it is consumed by [`Handle::close`].
/// Dropping a `Handle` without closing it leaves the library loaded; use [`crate::Library`] to close on drop.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) raw: usize,
}

impl Handle {
    #[inline]
    pub(crate) fn from_ptr(ptr: *mut c_void) -> Handle {
        Handle {
            raw: ptr.expose_provenance(),
        }
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut c_void {
        core::ptr::with_exposed_provenance_mut(self.raw)
    }

    /// Get the raw loader handle without giving up ownership.
    #[inline]
    pub fn as_raw(&self) -> usize {
        self.raw
    }

    /// Give up ownership and return the raw loader handle.
    ///
    /// The library stays open; pass the value back to [`Handle::from_raw`] to close it later.
    #[inline]
    pub fn into_raw(self) -> usize {
        self.raw
    }

    /// Rebuild a handle from a raw loader handle.
    ///
    /// # Safety
    /// `raw` must have been produced by [`Handle::into_raw`] (or be a value `dlopen` returned) for a
    /// library that has not been closed since. Nothing else can be detected by this crate.
    #[inline]
    pub unsafe fn from_raw(raw: usize) -> Handle {
        Handle { raw }
    }
}

/// The address of a symbol resolved from an open library.
///
/// The address carries no type; cast it to whatever the caller knows it to be. It borrows the
/// [`Handle`] it was resolved from, so it cannot outlive the `close` of that handle.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Symbol<'lib> {
    ptr: NonNull<c_void>,
    _marker: PhantomData<&'lib Handle>,
}

unsafe impl Send for Symbol<'_> {}
unsafe impl Sync for Symbol<'_> {}

impl Debug for Symbol<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Symbol").field(&self.ptr).finish()
    }
}

impl<'lib> Symbol<'lib> {
    #[inline]
    pub(crate) fn new(ptr: NonNull<c_void>) -> Symbol<'lib> {
        Symbol {
            ptr,
            _marker: PhantomData,
        }
    }

    /// The symbol's address.
    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr()
    }

    /// The symbol's address as an integer.
    #[inline]
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr().addr()
    }

    /// Detach the address from the handle's lifetime.
    ///
    /// The address is still only valid while the library stays open.
    #[inline]
    pub fn into_raw(self) -> *mut c_void {
        self.ptr.as_ptr()
    }
}
