use ucx2_sys::{
    ucp_listener_h,
    ucp_listener_params_t,
    ucp_listener_attr_t,
    ucp_listener_create,
    ucp_listener_destroy,
    ucp_listener_query,
    UCP_LISTENER_ATTR_FIELD_SOCKADDR,
    UCS_ERR_INVALID_ADDR,
};
use std::marker::PhantomData;
use std::mem::{size_of_val, MaybeUninit};
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;
use log::debug;
use nix::libc::{sockaddr, socklen_t};
use super::{
    AcceptHandler,
    Endpoint,
    ListenerParams,
    Worker,
};
use super::callbacks::listener_accept_callback;
use crate::{
    Result,
    SockAddr,
    Status,
};

/// A UCP listener. Listening stops when it is dropped; the accept handler
/// stays alive exactly as long as the listener.
pub struct Listener<'w> {
    handle: ucp_listener_h,
    handler: *mut AcceptHandler<Endpoint>,
    _worker: PhantomData<&'w ()>,
}

impl<'w> Listener<'w> {
    pub fn new(worker: &'w Worker<'_>, params: &ListenerParams<Endpoint>) -> Result<Listener<'w>> {
        let mut raw: ucp_listener_params_t = unsafe { MaybeUninit::zeroed().assume_init() };
        raw.field_mask = params.field_mask();
        if let Some(addr) = params.get_sockaddr() {
            raw.sockaddr.addr = addr.as_ptr() as *const _;
            raw.sockaddr.addrlen = addr.len();
        }
        let handler = match params.get_accept_handler() {
            Some(handler) => {
                let arg = Box::into_raw(Box::new(Arc::clone(handler)));
                raw.accept_handler.cb = Some(listener_accept_callback);
                raw.accept_handler.arg = arg as *mut c_void;
                arg
            }
            None => ptr::null_mut(),
        };

        let mut listener = MaybeUninit::<ucp_listener_h>::uninit();
        let status = unsafe {
            ucp_listener_create(worker.into_raw(), &raw, listener.as_mut_ptr())
        };
        if let Err(status) = Status::check(status) {
            if !handler.is_null() {
                let _ = unsafe { Box::from_raw(handler) };
            }
            return Err(status.into());
        }
        debug!("listening on {:?}", params.get_sockaddr());
        Ok(Listener {
            handle: unsafe { listener.assume_init() },
            handler,
            _worker: PhantomData,
        })
    }

    /// The address actually bound, with the port UCX picked if port 0 was
    /// requested.
    pub fn sockaddr(&self) -> Result<SockAddr> {
        let mut attr: ucp_listener_attr_t = unsafe { MaybeUninit::zeroed().assume_init() };
        attr.field_mask = UCP_LISTENER_ATTR_FIELD_SOCKADDR.into();
        Status::check(unsafe { ucp_listener_query(self.handle, &mut attr) })?;
        let addr = unsafe {
            SockAddr::from_raw(
                &attr.sockaddr as *const _ as *const sockaddr,
                size_of_val(&attr.sockaddr) as socklen_t,
            )
        };
        addr.ok_or_else(|| Status::from_raw(UCS_ERR_INVALID_ADDR).into())
    }

    #[inline]
    pub fn port(&self) -> Result<u16> {
        Ok(self.sockaddr()?.port())
    }

    #[inline]
    pub fn into_raw(&self) -> ucp_listener_h {
        self.handle
    }
}

impl<'w> Drop for Listener<'w> {
    fn drop(&mut self) {
        unsafe {
            ucp_listener_destroy(self.handle);
            if !self.handler.is_null() {
                let _ = Box::from_raw(self.handler);
            }
        }
    }
}
