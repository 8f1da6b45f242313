use ucx2_sys::{
    ucs_thread_mode_t,
    UCS_THREAD_MODE_SINGLE,
    UCS_THREAD_MODE_SERIALIZED,
    UCS_THREAD_MODE_MULTI,
};

/// Worker thread modes.
pub struct ThreadMode;

impl ThreadMode {
    pub const SINGLE: ucs_thread_mode_t = UCS_THREAD_MODE_SINGLE;
    pub const SERIALIZED: ucs_thread_mode_t = UCS_THREAD_MODE_SERIALIZED;
    pub const MULTI: ucs_thread_mode_t = UCS_THREAD_MODE_MULTI;
}
