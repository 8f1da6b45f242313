//! Parameter objects describing how to open a listener or an endpoint.
//!
//! These are plain Rust values. The UCX wrappers (feature `ucx`) lower them
//! into `ucp_listener_params_t`/`ucp_ep_params_t` right before the create
//! call, so the objects here own everything the C structs point into.
mod listener;
pub use listener::{
    ListenerParams,
    AcceptHandler,
};
mod endpoint;
pub use endpoint::EndpointParams;

/// Field mask bits of `ucp_listener_params_t`.
///
/// The full set from `ucp.h` is mirrored so raw masks read back from C can
/// be interpreted. [`ListenerParams`] only ever sets `SOCK_ADDR` and
/// `ACCEPT_HANDLER`.
pub struct ListenerField;

impl ListenerField {
    pub const SOCK_ADDR: u64 = 1 << 0;
    pub const ACCEPT_HANDLER: u64 = 1 << 1;
    pub const CONN_HANDLER: u64 = 1 << 2;
}

/// Field mask bits of `ucp_ep_params_t`, mirrored from `ucp.h`.
/// [`EndpointParams`] sets `SOCK_ADDR`, `FLAGS` and `ERR_HANDLING_MODE`.
pub struct EndpointField;

impl EndpointField {
    pub const REMOTE_ADDRESS: u64 = 1 << 0;
    pub const ERR_HANDLING_MODE: u64 = 1 << 1;
    pub const ERR_HANDLER: u64 = 1 << 2;
    pub const USER_DATA: u64 = 1 << 3;
    pub const SOCK_ADDR: u64 = 1 << 4;
    pub const FLAGS: u64 = 1 << 5;
    pub const CONN_REQUEST: u64 = 1 << 6;
    pub const NAME: u64 = 1 << 7;
}

/// Values for `ucp_ep_params_t::flags`.
pub struct EPParamsFlags;

impl EPParamsFlags {
    pub const CLIENT_SERVER: u32 = 1 << 0;
    pub const NO_LOOPBACK: u32 = 1 << 1;
    pub const SEND_CLIENT_ID: u32 = 1 << 2;
}

/// How an endpoint reacts to a failing peer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ErrHandlingMode {
    /// No guarantees on failure; the fastest mode.
    #[default]
    None,
    /// Report peer failures through the error handler.
    Peer,
}

impl ErrHandlingMode {
    /// The `ucp_err_handling_mode_t` value.
    #[inline]
    pub const fn as_raw(self) -> u32 {
        match self {
            ErrHandlingMode::None => 0,
            ErrHandlingMode::Peer => 1,
        }
    }
}
