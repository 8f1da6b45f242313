mod params;
pub use params::{
    ListenerParams,
    AcceptHandler,
    EndpointParams,
    ListenerField,
    EndpointField,
    EPParamsFlags,
    ErrHandlingMode,
};

#[cfg(feature = "ucx")]
mod callbacks;
#[cfg(feature = "ucx")]
mod memstream;
#[cfg(feature = "ucx")]
mod context;
#[cfg(feature = "ucx")]
pub use context::{Context, Feature, config, version};
#[cfg(feature = "ucx")]
mod worker;
#[cfg(feature = "ucx")]
pub use worker::Worker;
#[cfg(feature = "ucx")]
mod listener;
#[cfg(feature = "ucx")]
pub use listener::Listener;
#[cfg(feature = "ucx")]
mod endpoint;
#[cfg(feature = "ucx")]
pub use endpoint::{Endpoint, EPCloseMode};

// The builders above carry their own copies of the ucp.h bit values.
#[cfg(feature = "ucx")]
const _: () = {
    use ucx2_sys::*;

    assert!(ListenerField::SOCK_ADDR == UCP_LISTENER_PARAM_FIELD_SOCK_ADDR as u64);
    assert!(ListenerField::ACCEPT_HANDLER == UCP_LISTENER_PARAM_FIELD_ACCEPT_HANDLER as u64);
    assert!(ListenerField::CONN_HANDLER == UCP_LISTENER_PARAM_FIELD_CONN_HANDLER as u64);

    assert!(EndpointField::REMOTE_ADDRESS == UCP_EP_PARAM_FIELD_REMOTE_ADDRESS as u64);
    assert!(EndpointField::ERR_HANDLING_MODE == UCP_EP_PARAM_FIELD_ERR_HANDLING_MODE as u64);
    assert!(EndpointField::ERR_HANDLER == UCP_EP_PARAM_FIELD_ERR_HANDLER as u64);
    assert!(EndpointField::USER_DATA == UCP_EP_PARAM_FIELD_USER_DATA as u64);
    assert!(EndpointField::SOCK_ADDR == UCP_EP_PARAM_FIELD_SOCK_ADDR as u64);
    assert!(EndpointField::FLAGS == UCP_EP_PARAM_FIELD_FLAGS as u64);
    assert!(EndpointField::CONN_REQUEST == UCP_EP_PARAM_FIELD_CONN_REQUEST as u64);
    assert!(EndpointField::NAME == UCP_EP_PARAM_FIELD_NAME as u64);

    assert!(EPParamsFlags::CLIENT_SERVER == UCP_EP_PARAMS_FLAGS_CLIENT_SERVER as u32);
    assert!(EPParamsFlags::NO_LOOPBACK == UCP_EP_PARAMS_FLAGS_NO_LOOPBACK as u32);
    assert!(EPParamsFlags::SEND_CLIENT_ID == UCP_EP_PARAMS_FLAGS_SEND_CLIENT_ID as u32);

    assert!(ErrHandlingMode::None.as_raw() == UCP_ERR_HANDLING_MODE_NONE as u32);
    assert!(ErrHandlingMode::Peer.as_raw() == UCP_ERR_HANDLING_MODE_PEER as u32);
};
