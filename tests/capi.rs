mod common;

use dlsync::api::{dlsync_close, dlsync_error_free, dlsync_open, dlsync_open_self, dlsync_symbol};
use std::ffi::{CStr, CString, c_char, c_void};
use std::ptr::{null, null_mut};

#[test]
fn test_c_round_trip() {
    let path = CString::new(common::fixture_path()).unwrap();
    let mut handle = 0usize;
    let mut err: *mut c_char = null_mut();
    unsafe {
        assert_eq!(dlsync_open(path.as_ptr(), libc::RTLD_NOW, &mut handle, &mut err), 0);
        assert!(err.is_null());
        assert_ne!(handle, 0);

        let mut addr: *mut c_void = null_mut();
        assert_eq!(dlsync_symbol(handle, c"dlsync_answer".as_ptr(), &mut addr, &mut err), 0);
        assert_eq!(*addr.cast::<i32>(), 42);

        #[cfg(target_env = "gnu")]
        {
            addr = std::ptr::NonNull::dangling().as_ptr();
            assert_eq!(dlsync_symbol(handle, c"dlsync_zero".as_ptr(), &mut addr, &mut err), 0);
            assert!(addr.is_null());
            assert!(err.is_null());
        }

        assert_eq!(dlsync_close(handle, &mut err), 0);
        assert!(err.is_null());
    }
}

#[test]
fn test_c_errors() {
    let missing = CString::new(common::missing_path("capi")).unwrap();
    let mut handle = 0usize;
    let mut err: *mut c_char = null_mut();
    unsafe {
        assert_eq!(dlsync_open(missing.as_ptr(), libc::RTLD_NOW, &mut handle, &mut err), -1);
        assert!(!err.is_null());
        let msg = CStr::from_ptr(err).to_str().unwrap();
        assert!(msg.contains(missing.to_str().unwrap()), "unexpected message: {msg}");
        dlsync_error_free(err);

        err = null_mut();
        assert_eq!(dlsync_open(null(), libc::RTLD_NOW, &mut handle, &mut err), -1);
        assert_eq!(CStr::from_ptr(err).to_str().unwrap(), "Invalid name");
        dlsync_error_free(err);

        err = null_mut();
        assert_eq!(dlsync_open_self(libc::RTLD_LAZY, &mut handle, &mut err), 0);
        let mut addr: *mut c_void = null_mut();
        assert_eq!(dlsync_symbol(handle, c"dlsync_nowhere".as_ptr(), &mut addr, &mut err), -1);
        assert!(addr.is_null());
        assert!(CStr::from_ptr(err).to_str().unwrap().ends_with("dlsync_nowhere"));
        dlsync_error_free(err);

        // A null error slot is allowed.
        assert_eq!(dlsync_symbol(handle, c"dlsync_nowhere".as_ptr(), &mut addr, null_mut()), -1);
        assert_eq!(dlsync_close(handle, null_mut()), 0);
        dlsync_error_free(null_mut());
    }
}
