use ucx2_sys::{
    ucp_ep_h,
    ucp_ep_params_t,
    ucp_ep_close_mode,
    ucp_ep_create,
    ucp_ep_close_nb,
    ucp_ep_print_info,
    ucp_request_check_status,
    ucp_request_free,
    rust_ucs_ptr_is_err,
    rust_ucs_ptr_status,
    UCP_EP_CLOSE_MODE_FLUSH,
    UCP_EP_CLOSE_MODE_FORCE,
    UCS_INPROGRESS,
};
use std::mem::MaybeUninit;
use log::debug;
use super::{EndpointParams, Worker};
use crate::{
    Result,
    Status,
};

pub struct EPCloseMode;

impl EPCloseMode {
    pub const FLUSH: ucp_ep_close_mode = UCP_EP_CLOSE_MODE_FLUSH;
    pub const FORCE: ucp_ep_close_mode = UCP_EP_CLOSE_MODE_FORCE;
}

/// A connection to a remote peer. Not closed on drop: closing needs the
/// worker to make progress, so call [`Endpoint::close`].
#[repr(transparent)]
#[derive(Debug)]
pub struct Endpoint(ucp_ep_h);

// Moving the handle between threads is fine; calls on it still have to
// respect the worker's thread mode.
unsafe impl Send for Endpoint {}

impl Endpoint {
    pub fn new(worker: &Worker<'_>, params: &EndpointParams) -> Result<Endpoint> {
        let mut raw: ucp_ep_params_t = unsafe { MaybeUninit::zeroed().assume_init() };
        raw.field_mask = params.field_mask();
        raw.flags = params.get_flags();
        if let Some(addr) = params.get_sockaddr() {
            raw.sockaddr.addr = addr.as_ptr() as *const _;
            raw.sockaddr.addrlen = addr.len();
        }
        if let Some(err_mode) = params.get_err_mode() {
            raw.err_mode = err_mode.as_raw() as _;
        }

        let mut ep = MaybeUninit::<ucp_ep_h>::uninit();
        Status::check(unsafe {
            ucp_ep_create(worker.into_raw(), &raw, ep.as_mut_ptr())
        })?;
        debug!("created endpoint to {:?}", params.get_sockaddr());
        Ok(Endpoint(unsafe { ep.assume_init() }))
    }

    #[inline]
    pub fn from_raw(ep: ucp_ep_h) -> Endpoint {
        Endpoint(ep)
    }

    #[inline]
    pub fn into_raw(&self) -> ucp_ep_h {
        self.0
    }

    /// UCX's description of this endpoint (transports, lanes, peer).
    pub fn ucx_info(&self) -> Result<String> {
        super::memstream::capture(|stream| unsafe {
            ucp_ep_print_info(self.0, stream as *mut _);
        })
    }

    /// Close the endpoint, progressing `worker` until UCX is done with it.
    pub fn close(self, worker: &Worker<'_>, mode: ucp_ep_close_mode) -> Result<()> {
        unsafe {
            let req = ucp_ep_close_nb(self.0, mode as _);
            if req.is_null() {
                return Ok(());
            }
            if rust_ucs_ptr_is_err(req) != 0 {
                return Err(Status::from_raw(rust_ucs_ptr_status(req)).into());
            }
            loop {
                worker.progress();
                let status = ucp_request_check_status(req);
                if status != UCS_INPROGRESS {
                    ucp_request_free(req);
                    debug!("endpoint closed");
                    return Ok(Status::check(status)?);
                }
            }
        }
    }
}
