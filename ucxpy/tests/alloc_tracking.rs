//! Building and dropping parameter objects leaves no allocation behind.
//! This file holds a single test so the counters see only its thread.
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use ucxpy::{EndpointParams, ListenerParams};

struct Counting;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

fn bump(delta: isize) {
    let _ = LIVE.try_with(|live| live.set(live.get() + delta));
}

fn live() -> isize {
    LIVE.with(Cell::get)
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            bump(1);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        bump(-1);
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

#[test]
fn build_then_drop_releases_everything() {
    let baseline = live();

    let listener = ListenerParams::<u16>::new(1234, |_| ());
    let endpoint = EndpointParams::new("127.0.0.1", 1234).unwrap();
    let endpoint6 = EndpointParams::new("::1", 4321).unwrap();
    // sockaddr boxes and the handler Arc
    assert!(live() >= baseline + 4);
    assert_eq!(listener.port(), Some(1234));
    assert_eq!(endpoint.port(), Some(1234));
    assert_eq!(endpoint6.port(), Some(4321));

    drop(listener);
    drop(endpoint);
    drop(endpoint6);
    assert_eq!(live(), baseline);

    // A failed build leaves nothing behind either, once the error is gone.
    let err = EndpointParams::new("not-an-ip", 1).unwrap_err();
    drop(err);
    assert_eq!(live(), baseline);
}
