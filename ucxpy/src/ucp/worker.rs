use ucx2_sys::{
    ucp_worker_h,
    ucp_worker_params_t,
    ucs_thread_mode_t,
    ucp_worker_create,
    ucp_worker_progress,
    ucp_worker_destroy,
    UCP_WORKER_PARAM_FIELD_THREAD_MODE,
};
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use log::debug;
use super::Context;
use crate::{
    Result,
    Status,
};

pub struct Worker<'ctx> {
    handle: ucp_worker_h,
    _context: PhantomData<&'ctx Context>,
}

impl<'ctx> Worker<'ctx> {
    pub fn new(context: &'ctx Context, thread_mode: ucs_thread_mode_t) -> Result<Worker<'ctx>> {
        let mut params: ucp_worker_params_t = unsafe { MaybeUninit::zeroed().assume_init() };
        params.field_mask = UCP_WORKER_PARAM_FIELD_THREAD_MODE.into();
        params.thread_mode = thread_mode;

        let mut worker = MaybeUninit::<ucp_worker_h>::uninit();
        Status::check(unsafe {
            ucp_worker_create(context.into_raw(), &params, worker.as_mut_ptr())
        })?;
        debug!("created worker");
        Ok(Worker {
            handle: unsafe { worker.assume_init() },
            _context: PhantomData,
        })
    }

    #[inline]
    pub fn into_raw(&self) -> ucp_worker_h {
        self.handle
    }

    /// Progress outstanding communication. Returns true if progress was
    /// made.
    #[inline]
    pub fn progress(&self) -> bool {
        unsafe { ucp_worker_progress(self.handle) != 0 }
    }
}

impl<'ctx> Drop for Worker<'ctx> {
    fn drop(&mut self) {
        unsafe {
            ucp_worker_destroy(self.handle);
        }
    }
}
