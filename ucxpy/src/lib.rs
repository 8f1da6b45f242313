//! Listener and endpoint parameters for UCX socket-address connections.
//!
//! [`ListenerParams`] and [`EndpointParams`] describe how to open a passive
//! listener and how to connect to a remote peer. They own everything the
//! corresponding UCX structs point to and release it on drop. [`Config`]
//! gathers UCX options and the `UCX_*` environment, and [`iface`] finds the
//! local address to advertise.
//!
//! With the `ucx` feature the crate links UCX through `ucx2-sys` and the
//! [`ucp`] module also provides `Context`, `Worker`, `Listener` and
//! `Endpoint`, which consume the parameter objects.
pub mod config;
pub use config::{
    Config,
    Transport,
    TransportSelection,
};
mod error;
pub use error::{Error, Result};
pub mod iface;
pub mod sockaddr;
pub use sockaddr::SockAddr;
pub mod ucp;
pub use ucp::{
    ListenerParams,
    AcceptHandler,
    EndpointParams,
};

#[cfg(feature = "ucx")]
pub use ucx2_sys as sys;
#[cfg(feature = "ucx")]
mod status;
#[cfg(feature = "ucx")]
pub use status::Status;
#[cfg(feature = "ucx")]
pub mod ucs;
