mod common;

use dlsync::{Error, Handle, Library, OpenFlags};
use std::thread;

const THREADS: usize = 16;
const ROUNDS: usize = 200;

#[test]
fn test_errors_belong_to_their_call() {
    let fixture = common::fixture_path();
    let shared = Handle::open(fixture, OpenFlags::RTLD_NOW).unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            let shared = &shared;
            s.spawn(move || {
                for i in 0..ROUNDS {
                    let path = common::missing_path(&format!("{t}-{i}"));
                    match Handle::open(&path, OpenFlags::RTLD_LAZY) {
                        Err(Error::Load { msg }) => {
                            assert!(msg.contains(&path), "[{path}] got: {msg}")
                        }
                        other => panic!("expected a load error for [{path}], got {other:?}"),
                    }

                    let name = format!("dlsync_missing_{t}_{i}");
                    match shared.symbol(&name) {
                        Err(Error::Symbol { msg }) => {
                            assert!(msg.ends_with(&name), "[{name}] got: {msg}")
                        }
                        other => panic!("expected a symbol error for [{name}], got {other:?}"),
                    }

                    assert!(shared.symbol("dlsync_add").unwrap().is_some());

                    let own = Library::open(fixture, OpenFlags::RTLD_LAZY).unwrap();
                    let answer = own.symbol("dlsync_answer").unwrap().unwrap();
                    assert_eq!(unsafe { *answer.as_ptr().cast::<i32>() }, 42);
                    if i % 2 == 0 {
                        own.close().unwrap();
                    }
                }
            });
        }
    });

    shared.close().unwrap();
}

#[test]
fn test_concurrent_open_self() {
    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    let this = Handle::open_self(OpenFlags::RTLD_NOW).unwrap();
                    let addr = this.symbol("malloc").unwrap().unwrap().addr();
                    this.close().unwrap();
                    addr
                })
            })
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    });
}
