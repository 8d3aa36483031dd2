cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix_libc;
        pub(crate) use unix_libc::*;
    } else {
        compile_error!("dlsync only supports unix targets");
    }
}
