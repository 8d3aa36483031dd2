use spin::Mutex;

/// Guards the loader's process-wide error slot.
///
/// Held for exactly one forwarded call plus its error check, never across a return to the caller.
/// `dlopen` and `dlclose` run library initializers and finalizers inside that call, so the lock is
/// held while they run; other callers spin until they finish.
pub(crate) static LOADER_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` while holding the loader lock. `f` must not call back into this crate.
#[inline]
pub(crate) fn serialized<R>(op: &str, f: impl FnOnce() -> R) -> R {
    let _guard = LOADER_LOCK.lock();
    log::trace!("{}: holding loader lock", op);
    f()
}
