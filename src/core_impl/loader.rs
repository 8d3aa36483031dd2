use crate::core_impl::lock::serialized;
use crate::core_impl::types::{Handle, Symbol};
use crate::{Error, OpenFlags, Result, os};
use alloc::ffi::CString;
use core::{
    fmt::Debug,
    mem::ManuallyDrop,
    ops::Deref,
    ptr::NonNull,
};

#[inline]
fn to_cstring(name: &[u8]) -> Result<CString> {
    CString::new(name).map_err(|_| Error::InvalidName)
}

pub(crate) fn open_impl(path: &[u8], flags: OpenFlags) -> Result<Handle> {
    let c_path = to_cstring(path)?;
    let ptr = serialized("dlopen", || os::open(Some(c_path.as_c_str()), flags.bits()))?;
    let handle = Handle::from_ptr(ptr);
    log::debug!(
        "dlopen: Opened [{}] as [{:#x}] with {:?}",
        c_path.to_string_lossy(),
        handle.as_raw(),
        flags
    );
    Ok(handle)
}

impl Handle {
    /// Open a shared library. It is the same as `dlopen`.
    ///
    /// The path is handed to the platform unchanged, so its own rules for absolute and relative
    /// names apply. Opening a library that is already loaded returns a handle to the existing
    /// mapping, reference-counted by the platform.
    ///
    /// The library's initializers run while the loader lock is held. An initializer that calls
    /// back into this crate deadlocks, and other threads using the crate spin until it returns.
    ///
    /// # Example
    /// ```no_run
    /// # use dlsync::{Handle, OpenFlags};
    /// let handle = Handle::open("libz.so.1", OpenFlags::RTLD_NOW | OpenFlags::RTLD_LOCAL)?;
    /// handle.close()?;
    /// # Ok::<(), dlsync::Error>(())
    /// ```
    #[inline]
    pub fn open(path: impl AsRef<str>, flags: OpenFlags) -> Result<Handle> {
        open_impl(path.as_ref().as_bytes(), flags)
    }

    /// Open a shared library from a filesystem path that need not be valid UTF-8.
    #[cfg(feature = "std")]
    #[inline]
    pub fn open_path(path: impl AsRef<std::path::Path>, flags: OpenFlags) -> Result<Handle> {
        use std::os::unix::ffi::OsStrExt;
        open_impl(path.as_ref().as_os_str().as_bytes(), flags)
    }

    /// Open the running program itself. It is the same as `dlopen(NULL, flags)`.
    pub fn open_self(flags: OpenFlags) -> Result<Handle> {
        let ptr = serialized("dlopen", || os::open(None, flags.bits()))?;
        let handle = Handle::from_ptr(ptr);
        log::debug!("dlopen: Opened the main program as [{:#x}]", handle.as_raw());
        Ok(handle)
    }

    /// Close the library. It is the same as `dlclose`.
    ///
    /// Finalizers run while the loader lock is held and must not call back into this crate.
    ///
    /// Symbols resolved from this handle must not be used afterwards, even if the library stays
    /// mapped because of other open handles. The borrow checker enforces this:
    /// ```compile_fail
    /// # use dlsync::{Handle, OpenFlags};
    /// let handle = Handle::open_self(OpenFlags::RTLD_NOW).unwrap();
    /// let malloc = handle.symbol("malloc").unwrap();
    /// handle.close().unwrap();
    /// let _ = malloc.map(|sym| sym.as_ptr());
    /// ```
    pub fn close(self) -> Result<()> {
        let raw = self.raw;
        let ptr = self.as_ptr();
        serialized("dlclose", || unsafe { os::close(ptr) })?;
        log::debug!("dlclose: Closed [{:#x}]", raw);
        Ok(())
    }

    /// Look up a symbol by name. It is the same as `dlsym`.
    ///
    /// The name is used as-is; no mangling is done.
    ///
    /// * `Ok(Some(sym))`: the symbol was found at a non-null address.
    /// * `Ok(None)`: the symbol was found and its value is the null address.
    /// * `Err(_)`: the loader could not find the symbol.
    ///
    /// Checking the address for null is therefore not a way to detect a missing symbol.
    ///
    /// # Examples
    /// ```no_run
    /// # use dlsync::{Handle, OpenFlags};
    /// let libm = Handle::open("libm.so.6", OpenFlags::RTLD_LAZY)?;
    /// if let Some(sym) = libm.symbol("cos")? {
    ///     let cos: extern "C" fn(f64) -> f64 = unsafe { core::mem::transmute(sym.as_ptr()) };
    ///     assert_eq!(cos(0.0), 1.0);
    /// }
    /// # Ok::<(), dlsync::Error>(())
    /// ```
    #[inline]
    pub fn symbol(&self, name: impl AsRef<str>) -> Result<Option<Symbol<'_>>> {
        self.symbol_impl(name.as_ref().as_bytes())
    }

    pub(crate) fn symbol_impl(&self, name: &[u8]) -> Result<Option<Symbol<'_>>> {
        let c_name = to_cstring(name)?;
        let ptr = self.as_ptr();
        let sym = serialized("dlsym", || unsafe { os::symbol(ptr, &c_name) })?;
        log::trace!(
            "dlsym: [{}] in [{:#x}] is at [{:p}]",
            c_name.to_string_lossy(),
            self.raw,
            sym
        );
        Ok(NonNull::new(sym).map(Symbol::new))
    }
}

/// A library that is closed when dropped.
///
/// Derefs to [`Handle`] for symbol lookup. A failure to close during `drop` is logged and
/// otherwise ignored; call [`Library::close`] to observe it.
pub struct Library {
    handle: Handle,
}

impl Debug for Library {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Library")
            .field("handle", &format_args!("{:#x}", self.handle.raw))
            .finish()
    }
}

impl Library {
    /// Open a shared library. See [`Handle::open`].
    #[inline]
    pub fn open(path: impl AsRef<str>, flags: OpenFlags) -> Result<Library> {
        Handle::open(path, flags).map(Library::from)
    }

    /// Open a shared library from a filesystem path. See [`Handle::open_path`].
    #[cfg(feature = "std")]
    #[inline]
    pub fn open_path(path: impl AsRef<std::path::Path>, flags: OpenFlags) -> Result<Library> {
        Handle::open_path(path, flags).map(Library::from)
    }

    /// Open the running program itself. See [`Handle::open_self`].
    #[inline]
    pub fn open_self(flags: OpenFlags) -> Result<Library> {
        Handle::open_self(flags).map(Library::from)
    }

    /// Close the library and report the loader's verdict.
    #[inline]
    pub fn close(self) -> Result<()> {
        self.into_handle().close()
    }

    /// Stop closing on drop and hand back the bare handle.
    #[inline]
    pub fn into_handle(self) -> Handle {
        let this = ManuallyDrop::new(self);
        Handle {
            raw: this.handle.raw,
        }
    }
}

impl From<Handle> for Library {
    #[inline]
    fn from(handle: Handle) -> Self {
        Library { handle }
    }
}

impl Deref for Library {
    type Target = Handle;

    #[inline]
    fn deref(&self) -> &Handle {
        &self.handle
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        let ptr = self.handle.as_ptr();
        match serialized("dlclose", || unsafe { os::close(ptr) }) {
            Ok(()) => log::debug!("dlclose: Closed [{:#x}] on drop", self.handle.raw),
            Err(err) => log::warn!(
                "dlclose: Failed to close [{:#x}] on drop: {}",
                self.handle.raw,
                err
            ),
        }
    }
}
