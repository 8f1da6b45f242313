//! Callback wrapping code. Rust closures are passed through the `arg`
//! pointer and called from the C callbacks here.
use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};
use log::{error, trace};
use ucx2_sys::ucp_ep_h;
use super::{AcceptHandler, Endpoint};

/// Callback for ucp_listener_accept_callback_t. `arg` is the
/// `Box<AcceptHandler<Endpoint>>` owned by the `Listener`.
pub unsafe extern "C" fn listener_accept_callback(
    ep: ucp_ep_h,
    arg: *mut c_void,
) {
    trace!("listener_accept_callback()");
    let handler = &*(arg as *const AcceptHandler<Endpoint>);
    // Unwinding into UCX is not an option.
    let res = panic::catch_unwind(AssertUnwindSafe(|| handler(Endpoint::from_raw(ep))));
    if res.is_err() {
        error!("accept handler panicked");
    }
}
