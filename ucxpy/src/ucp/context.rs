use ucx2_sys::{
    ucp_context_h,
    ucp_config_t,
    ucp_params_t,
    ucp_feature,
    ucp_config_read,
    ucp_config_modify,
    ucp_config_release,
    ucp_config_print,
    ucp_get_version,
    ucp_cleanup,
    rust_ucp_init,
    UCP_PARAM_FIELD_FEATURES,
    UCP_FEATURE_TAG,
    UCP_FEATURE_STREAM,
    UCP_FEATURE_AM,
    UCS_CONFIG_PRINT_CONFIG,
};
use std::collections::BTreeMap;
use std::ffi::CString;
use std::mem::MaybeUninit;
use std::os::raw::c_uint;
use std::ptr;
use log::{debug, info};
use crate::config::parse_option_listing;
use crate::{
    Config,
    Error,
    Result,
    Status,
};

pub struct Feature;

impl Feature {
    pub const TAG: ucp_feature = UCP_FEATURE_TAG;
    pub const STREAM: ucp_feature = UCP_FEATURE_STREAM;
    pub const AM: ucp_feature = UCP_FEATURE_AM;
}

/// Version of the UCX library linked in, e.g. `(1, 14, 0)`. Does not
/// initialize UCX.
pub fn version() -> (u32, u32, u32) {
    let (mut major, mut minor, mut release): (c_uint, c_uint, c_uint) = (0, 0, 0);
    unsafe {
        ucp_get_version(&mut major, &mut minor, &mut release);
    }
    (major, minor, release)
}

/// Owned `ucp_config_t`, released on drop.
struct UcpConfig(*mut ucp_config_t);

impl UcpConfig {
    fn read() -> Result<UcpConfig> {
        let mut config: *mut ucp_config_t = ptr::null_mut();
        Status::check(unsafe {
            ucp_config_read(ptr::null(), ptr::null(), &mut config)
        })?;
        Ok(UcpConfig(config))
    }

    /// Environment as UCX reads it, with `config`'s explicit options applied.
    fn load(config: &Config) -> Result<UcpConfig> {
        let mut ucp_config = UcpConfig::read()?;
        for (key, value) in config.explicit_options() {
            ucp_config.modify(key, value)?;
        }
        Ok(ucp_config)
    }

    fn modify(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidOption { key: key.to_string() };
        let name = CString::new(key).map_err(|_| invalid())?;
        let value_c = CString::new(value).map_err(|_| invalid())?;
        debug!("ucp_config_modify({}, {})", key, value);
        Status::check(unsafe {
            ucp_config_modify(self.0, name.as_ptr(), value_c.as_ptr())
        })?;
        Ok(())
    }
}

impl Drop for UcpConfig {
    fn drop(&mut self) {
        unsafe {
            ucp_config_release(self.0);
        }
    }
}

/// Every UCX option, with the value a context created from `config` right
/// now would use. Does not initialize UCX.
pub fn config(config: &Config) -> Result<BTreeMap<String, String>> {
    let ucp_config = UcpConfig::load(config)?;
    let listing = super::memstream::capture(|stream| unsafe {
        ucp_config_print(ucp_config.0, stream as *mut _, ptr::null(), UCS_CONFIG_PRINT_CONFIG as _);
    })?;
    Ok(parse_option_listing(&listing))
}

/// An initialized UCP application context. Cleaned up on drop, which the
/// borrow on every [`Worker`](super::Worker) orders after the workers.
pub struct Context(ucp_context_h);

impl Context {
    pub fn new(features: ucp_feature, config: &Config) -> Result<Context> {
        let ucp_config = UcpConfig::load(config)?;

        // The docs declare this to be UB, but this seems to be how the C API works
        let mut params: ucp_params_t = unsafe { MaybeUninit::zeroed().assume_init() };
        params.field_mask = UCP_PARAM_FIELD_FEATURES.into();
        params.features = features.into();

        let mut context = MaybeUninit::<ucp_context_h>::uninit();
        Status::check(unsafe {
            rust_ucp_init(&params, ucp_config.0, context.as_mut_ptr())
        })?;
        let (major, minor, release) = version();
        info!("initialized UCX {}.{}.{}", major, minor, release);
        Ok(Context(unsafe { context.assume_init() }))
    }

    #[inline]
    pub fn into_raw(&self) -> ucp_context_h {
        self.0
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe {
            ucp_cleanup(self.0);
        }
    }
}
