#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

const FIXTURE_SOURCE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fixture.c");

static FIXTURE: OnceLock<PathBuf> = OnceLock::new();

/// Builds the fixture library on first use and returns its path.
///
/// Each test binary gets its own copy so that concurrently running binaries never race on the file.
pub fn fixture_path() -> &'static str {
    let _ = env_logger::try_init();
    FIXTURE
        .get_or_init(|| {
            let out = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
                .join(format!("libdlsync_fixture_{}.so", env!("CARGO_CRATE_NAME")));
            let compiler = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());
            let status = Command::new(compiler)
                .args(["-shared", "-fPIC", "-o"])
                .arg(&out)
                .arg(FIXTURE_SOURCE)
                .status()
                .expect("could not compile the test fixture!");
            assert!(status.success());
            out
        })
        .to_str()
        .unwrap()
}

/// A path that is guaranteed not to exist.
pub fn missing_path(tag: &str) -> String {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
        .join(format!("dlsync-missing-{tag}.so"))
        .to_str()
        .unwrap()
        .to_string()
}
