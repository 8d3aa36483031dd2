//!A thin, thread-safe binding to the platform's dynamic-library loader (`dlopen`, `dlsym`, `dlclose`).
//!
//!The loader reports failures through a single process-wide last-error slot (`dlerror`), so two threads
//!loading libraries at the same time can read each other's errors. Every operation in this crate takes
//!one global lock for the span "clear stale error, issue the call, read the error", which makes each
//!reported error belong to the call that produced it.
//!
//!Only the subset of behavior guaranteed by the Single Unix Specification is exposed.
//!
//! # Examples
//! ```no_run
//! # use dlsync::{Handle, OpenFlags};
//!
//! fn main() -> dlsync::Result<()> {
//!     let libm = Handle::open("libm.so.6", OpenFlags::RTLD_LAZY)?;
//!     match libm.symbol("sqrt")? {
//!         Some(sqrt) => {
//!             let sqrt: extern "C" fn(f64) -> f64 = unsafe { core::mem::transmute(sqrt.as_ptr()) };
//!             println!("{}", sqrt(4.0));
//!         }
//!         None => println!("sqrt resolves to the null address"),
//!     }
//!     libm.close()
//! }
//! ```
#![warn(
    clippy::unnecessary_lazy_evaluations,
    clippy::collapsible_if,
    clippy::explicit_iter_loop,
    clippy::manual_assert,
    clippy::needless_question_mark,
    clippy::needless_return,
    clippy::needless_update,
    clippy::redundant_clone,
    clippy::redundant_else,
    clippy::redundant_static_lifetimes
)]
#![no_std]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(feature = "c-api")]
pub mod api;
mod core_impl;
mod error;
mod os;

use bitflags::bitflags;
use core::ffi::c_int;

pub use crate::core_impl::loader::Library;
pub use crate::core_impl::types::{Handle, Symbol};
pub use crate::error::Error;

bitflags! {
    /// Flags that control how dynamic libraries are loaded and resolved.
    ///
    /// The values are the platform's own `RTLD_*` constants and are passed to `dlopen` unchanged.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OpenFlags: c_int {
        /// Perform lazy binding: resolve symbols only as they are executed.
        const RTLD_LAZY = libc::RTLD_LAZY;
        /// Resolve all symbols before `open` returns.
        const RTLD_NOW = libc::RTLD_NOW;
        /// Make symbols in this library available for symbol resolution in subsequently loaded libraries.
        const RTLD_GLOBAL = libc::RTLD_GLOBAL;
        /// Symbols in this library are not made available to resolve references in subsequently loaded libraries.
        const RTLD_LOCAL = libc::RTLD_LOCAL;
    }
}

pub type Result<T> = core::result::Result<T, Error>;
