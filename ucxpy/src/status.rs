//! UCX Status wrapping code
use std::fmt;
use std::ffi::CStr;
use std::result;
use ucx2_sys::{
    ucs_status_t,
    ucs_status_string,
    UCS_OK,
};

#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Status(ucs_status_t);

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status [\"{}\"]", self)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ucs_status_string() returns a static string for every code,
        // including unknown ones.
        let msg = unsafe { CStr::from_ptr(ucs_status_string(self.0)) };
        f.write_str(&msg.to_string_lossy())
    }
}

impl Status {
    pub const OK: Status = Status(UCS_OK);

    /// Create a status from the raw data type.
    #[inline]
    pub fn from_raw(status: ucs_status_t) -> Status {
        Status(status)
    }

    #[inline]
    pub fn into_raw(self) -> ucs_status_t {
        self.0
    }

    /// `Ok` for `UCS_OK`, the wrapped status otherwise.
    #[inline]
    pub fn check(status: ucs_status_t) -> result::Result<(), Status> {
        if status == UCS_OK {
            Ok(())
        } else {
            Err(Status(status))
        }
    }
}
